use tracing::{debug, info, instrument};

use crate::board::Board;
use crate::color::Color;
use crate::config::SessionConfig;
use crate::error::FenError;
use crate::fen;
use crate::history::{Snapshot, SnapshotHistory};
use crate::notation::{self, MoveEntry, MoveList};
use crate::pieces::{Piece, PieceType};
use crate::position::Position;
use crate::r#move::{MoveFlags, MoveRecord};
use crate::rules::{Context, Destinations, castling_rook_destination, castling_rook_origin};

/// The square currently picked up, with the destinations to highlight for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub square: Position,
    pub highlights: Destinations,
}

/// Result of [`Session::attempt_move`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(MoveRecord),
    Reselected(Position),
    Deselected,
    NoSelection,
}

/// Result of [`Session::click`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(Position),
    NoPiece,
    Move(MoveOutcome),
}

/// Replay navigation moves a cursor over the snapshots and never touches the live board.
#[derive(Clone, Debug)]
pub struct Session {
    board: Board,
    turn: u32,
    selected: Option<Selection>,
    move_log: Vec<MoveRecord>,
    move_list: MoveList,
    snapshots: SnapshotHistory,
    castling_enabled: bool,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, FenError> {
        let board = fen::decode(&config.start_position)?;
        let snapshots = SnapshotHistory::new(Snapshot::capture(&board, None));

        Ok(Session {
            board,
            turn: 1,
            selected: None,
            move_log: Vec::new(),
            move_list: MoveList::new(),
            snapshots,
            castling_enabled: config.castling_enabled,
        })
    }

    pub fn standard() -> Self {
        Self::new(SessionConfig::default()).expect("Failed to create standard session")
    }

    pub fn current_board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn side_to_move(&self) -> Color {
        Color::for_turn(self.turn)
    }

    pub fn castling_enabled(&self) -> bool {
        self.castling_enabled
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected.as_ref().map(|s| s.square)
    }

    pub fn highlights(&self) -> &[Position] {
        self.selected
            .as_ref()
            .map(|s| s.highlights.as_slice())
            .unwrap_or_default()
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.move_log.last()
    }

    pub fn move_log(&self) -> &[MoveRecord] {
        &self.move_log
    }

    pub fn history_entries(&self) -> &[MoveEntry] {
        self.move_list.entries()
    }

    pub fn move_list(&self) -> &MoveList {
        &self.move_list
    }

    pub fn snapshots(&self) -> &SnapshotHistory {
        &self.snapshots
    }

    pub fn to_fen(&self) -> String {
        fen::encode(&self.board)
    }

    fn context(&self) -> Context<'_> {
        Context::new(&self.board, self.last_move()).with_castling(self.castling_enabled)
    }

    /// Where the piece on `pos` may move on the live board, whoever's turn it is.
    pub fn legal_destinations(&self, pos: &Position) -> Destinations {
        self.context().legal_destinations(pos)
    }

    #[instrument(level = "debug", skip_all, fields(square = %pos))]
    pub fn select(&mut self, pos: Position) -> bool {
        if self.selected.is_some() {
            debug!("a square is already selected");
            return false;
        }

        let Some(piece) = self.board.get_piece(&pos) else {
            debug!("no piece on square");
            return false;
        };

        let highlights = if piece.color == self.side_to_move() {
            self.legal_destinations(&pos)
        } else {
            Destinations::new()
        };

        debug!(piece = %piece.piece_type, color = %piece.color, targets = highlights.len(), "selected");
        self.selected = Some(Selection {
            square: pos,
            highlights,
        });
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn click(&mut self, pos: Position) -> ClickOutcome {
        if self.selected.is_some() {
            ClickOutcome::Move(self.attempt_move(pos))
        } else if self.select(pos) {
            ClickOutcome::Selected(pos)
        } else {
            ClickOutcome::NoPiece
        }
    }

    /// Moves the selected piece to `dst` if it is that piece's turn and the move is legal.
    ///
    /// A rejected move never changes the board. The selection then jumps to `dst` if it holds a
    /// piece of the side to move, and is cleared otherwise.
    #[instrument(level = "debug", skip_all, fields(turn = self.turn, dst = %dst))]
    pub fn attempt_move(&mut self, dst: Position) -> MoveOutcome {
        let Some(selection) = self.selected.take() else {
            return MoveOutcome::NoSelection;
        };
        let src = selection.square;
        let mover = self.side_to_move();

        match self.board.get_piece(&src) {
            Some(piece) if piece.color != mover => {
                debug!(%src, color = %piece.color, "not this side's turn");
            }
            Some(piece) if self.context().is_pseudo_legal(&src, &dst) => {
                return MoveOutcome::Moved(self.commit(src, dst, piece));
            }
            Some(piece) => {
                debug!(%src, piece = %piece.piece_type, "illegal destination");
            }
            None => {
                debug!(%src, "selected square is empty");
            }
        }

        if self.board.is_occupied_by(&dst, mover) && self.select(dst) {
            MoveOutcome::Reselected(dst)
        } else {
            MoveOutcome::Deselected
        }
    }

    fn commit(&mut self, src: Position, dst: Position, piece: Piece) -> MoveRecord {
        let before = self.board.clone();
        let last_move = self.last_move().copied();
        let mut flags = MoveFlags::empty();

        if piece.piece_type == PieceType::King && src.col.abs_diff(dst.col) == 2 {
            flags |= MoveFlags::CASTLE;
            let rook_src = castling_rook_origin(&src, &dst);
            let rook = self.board.take_piece(&rook_src);
            assert!(
                rook.is_some_and(|r| r.piece_type == PieceType::Rook),
                "castling from {src} without a rook on {rook_src}"
            );
            self.board
                .set_piece(&castling_rook_destination(&src, &dst), rook.map(Piece::moved));
        } else if piece.piece_type == PieceType::Pawn
            && src.col != dst.col
            && self.board.is_empty(&dst)
        {
            flags |= MoveFlags::CAPTURE | MoveFlags::EN_PASSANT;
            self.board.take_piece(&Position::new(src.row, dst.col));
        } else if self.board.get_piece(&dst).is_some() {
            flags |= MoveFlags::CAPTURE;
        }

        self.board.take_piece(&src);
        self.board.set_piece(&dst, Some(piece.moved()));

        if piece.piece_type == PieceType::Pawn {
            if src.row.abs_diff(dst.row) == 2 {
                flags |= MoveFlags::DOUBLE_PUSH;
            }
            if dst.row == piece.color.promotion_rank() {
                flags |= MoveFlags::PROMOTION;
                self.promote(&dst);
            }
        }

        let record = MoveRecord::new(piece.piece_type, piece.color, src, dst).with_flags(flags);
        let ctx = Context::new(&before, last_move.as_ref()).with_castling(self.castling_enabled);
        let san = notation::algebraic(&ctx, &record);

        self.move_list.push_half_move(self.turn, &san);
        self.move_log.push(record);
        self.snapshots
            .push(Snapshot::capture(&self.board, Some(record)));
        info!(turn = self.turn, %san, lan = %record.to_lan(), "move committed");
        self.turn += 1;

        record
    }

    fn promote(&mut self, pos: &Position) {
        let pawn = self.board.get_piece(pos);
        assert!(
            pawn.is_some_and(|p| p.piece_type == PieceType::Pawn),
            "promotion on {pos} without a pawn"
        );
        if let Some(pawn) = pawn {
            let queen = Piece::new(PieceType::Queen, pawn.color).moved();
            self.board.set_piece(pos, Some(queen));
        }
    }

    /// Moves the replay cursor by `delta` and returns the board there, or `None` at either end.
    pub fn navigate(&mut self, delta: isize) -> Option<&Board> {
        self.snapshots.navigate(delta).map(Snapshot::board)
    }

    /// Board at the replay cursor. Equal to the live board until the cursor is moved back.
    pub fn displayed_board(&self) -> &Board {
        self.snapshots.current().board()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(s: &str) -> Position {
        Position::from_algebraic(s).expect("bad square")
    }

    fn play(session: &mut Session, src: &str, dst: &str) -> MoveOutcome {
        assert!(session.select(square(src)), "nothing to select on {src}");
        session.attempt_move(square(dst))
    }

    #[test]
    fn test_standard_session_creation() {
        let session = Session::standard();
        assert_eq!(session.turn(), 1);
        assert_eq!(session.side_to_move(), Color::White);
        assert_eq!(session.current_board(), &Board::standard());
        assert_eq!(session.snapshots().len(), 1);
        assert!(session.history_entries().is_empty());
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_bad_start_position() {
        let err = Session::new(SessionConfig::from_position("8/8/8")).unwrap_err();
        assert_eq!(err, FenError::WrongRankCount { found: 3 });
    }

    #[test]
    fn test_select_highlights_only_side_to_move() {
        let mut session = Session::standard();
        assert!(session.select(square("g1")));
        assert_eq!(session.highlights(), &[square("f3"), square("h3")]);

        session.deselect();
        assert!(session.select(square("g8")));
        assert!(session.highlights().is_empty());
        assert_eq!(session.legal_destinations(&square("g8")).len(), 2);
    }

    #[test]
    fn test_select_ignores_empty_square_and_second_select() {
        let mut session = Session::standard();
        assert!(!session.select(square("e4")));
        assert!(session.select(square("e2")));
        assert!(!session.select(square("d2")));
        assert_eq!(session.selected(), Some(square("e2")));
    }

    #[test]
    fn test_attempt_move_without_selection() {
        let mut session = Session::standard();
        assert_eq!(
            session.attempt_move(square("e4")),
            MoveOutcome::NoSelection
        );
    }

    #[test]
    fn test_simple_move_commits() {
        let mut session = Session::standard();
        let outcome = play(&mut session, "e2", "e4");

        let MoveOutcome::Moved(record) = outcome else {
            panic!("expected a committed move, got {outcome:?}");
        };
        assert!(record.flags.contains(MoveFlags::DOUBLE_PUSH));
        assert_eq!(session.turn(), 2);
        assert!(session.selected().is_none());
        assert!(session.current_board().is_empty(&square("e2")));
        assert!(
            session
                .current_board()
                .get_piece(&square("e4"))
                .is_some_and(|p| p.has_moved)
        );
        assert_eq!(session.last_move(), Some(&record));
        assert_eq!(session.snapshots().len(), 2);
        assert_eq!(session.history_entries()[0].white, "e4");
    }

    #[test]
    fn test_wrong_side_is_rejected() {
        let mut session = Session::standard();
        assert_eq!(play(&mut session, "e7", "e5"), MoveOutcome::Deselected);
        assert_eq!(session.turn(), 1);
        assert_eq!(session.current_board(), &Board::standard());
    }

    #[test]
    fn test_illegal_move_onto_own_piece_reselects() {
        let mut session = Session::standard();
        assert_eq!(
            play(&mut session, "g1", "e2"),
            MoveOutcome::Reselected(square("e2"))
        );
        assert_eq!(session.selected(), Some(square("e2")));
        assert_eq!(session.highlights(), &[square("e4"), square("e3")]);

        assert!(matches!(
            session.attempt_move(square("e4")),
            MoveOutcome::Moved(_)
        ));
    }

    #[test]
    fn test_illegal_move_onto_empty_square_deselects() {
        let mut session = Session::standard();
        assert_eq!(play(&mut session, "g1", "g3"), MoveOutcome::Deselected);
        assert!(session.selected().is_none());
        assert_eq!(session.turn(), 1);
    }

    #[test]
    fn test_click_dispatch() {
        let mut session = Session::standard();
        assert_eq!(session.click(square("e5")), ClickOutcome::NoPiece);
        assert_eq!(
            session.click(square("d2")),
            ClickOutcome::Selected(square("d2"))
        );
        assert!(matches!(
            session.click(square("d4")),
            ClickOutcome::Move(MoveOutcome::Moved(_))
        ));
    }

    #[test]
    #[should_panic(expected = "promotion on e8 without a pawn")]
    fn test_promotion_without_pawn_panics() {
        let mut session = Session::standard();
        session.promote(&square("e8"));
    }

    #[test]
    fn test_navigation_leaves_live_board_alone() {
        let mut session = Session::standard();
        play(&mut session, "e2", "e4");
        play(&mut session, "e7", "e5");
        let live = session.current_board().clone();

        let back = session.navigate(-1).cloned().expect("one move back");
        assert!(back.is_empty(&square("e5")));
        assert_eq!(session.current_board(), &live);
        assert_eq!(session.turn(), 3);
        assert_eq!(session.move_log().len(), 2);

        assert!(session.navigate(-1).is_some());
        assert!(session.navigate(-1).is_none());
        assert_eq!(session.displayed_board(), &Board::standard());

        play(&mut session, "g1", "f3");
        assert!(session.snapshots().is_at_latest());
        assert_eq!(session.displayed_board(), session.current_board());
    }
}
