use arrayvec::ArrayVec;

use crate::board::Board;
use crate::color::Color;
use crate::r#move::MoveRecord;
use crate::pieces::{Piece, PieceType};
use crate::position::Position;

/// Upper bound on the destinations of a single piece (a centralised queen reaches 27).
pub const MAX_DESTINATIONS: usize = 32;

pub type Destinations = ArrayVec<Position, MAX_DESTINATIONS>;

#[derive(Clone, Copy, Debug)]
pub struct Context<'a> {
    pub board: &'a Board,
    pub last_move: Option<&'a MoveRecord>,
    pub castling_enabled: bool,
}

impl<'a> Context<'a> {
    pub fn new(board: &'a Board, last_move: Option<&'a MoveRecord>) -> Self {
        Context {
            board,
            last_move,
            castling_enabled: true,
        }
    }

    pub fn with_castling(self, castling_enabled: bool) -> Self {
        Context {
            castling_enabled,
            ..self
        }
    }

    pub fn is_pseudo_legal(&self, src: &Position, dst: &Position) -> bool {
        if !src.is_valid() || !dst.is_valid() || src == dst {
            return false;
        }

        let Some(piece) = self.board.get_piece(src) else {
            return false;
        };

        if self.board.is_occupied_by(dst, piece.color) {
            return false;
        }

        match piece.piece_type {
            PieceType::Pawn => self.is_valid_pawn_move(src, &piece, dst),
            PieceType::Knight => self.is_valid_knight_move(src, dst),
            PieceType::Bishop => self.is_valid_bishop_move(src, dst),
            PieceType::Rook => self.is_valid_rook_move(src, dst),
            PieceType::Queen => self.is_valid_queen_move(src, dst),
            PieceType::King => self.is_valid_king_move(src, &piece, dst),
        }
    }

    pub fn legal_destinations(&self, src: &Position) -> Destinations {
        if self.board.is_empty(src) {
            return Destinations::new();
        }
        Position::all()
            .filter(|dst| self.is_pseudo_legal(src, dst))
            .collect()
    }

    fn is_valid_pawn_move(&self, src: &Position, piece: &Piece, dst: &Position) -> bool {
        let forward = piece.color.forward();
        let d_row = dst.row as isize - src.row as isize;
        let d_col = dst.col as isize - src.col as isize;

        if d_row == forward && d_col == 0 {
            return self.board.is_empty(dst);
        }

        if d_row == forward && d_col.abs() == 1 {
            return self.board.is_occupied_by(dst, piece.color.opposite())
                || self.is_en_passant(src, piece.color, dst);
        }

        if d_row == 2 * forward && d_col == 0 {
            let Some(between) = src.offset(forward, 0) else {
                return false;
            };
            return src.row == piece.color.pawn_rank()
                && !piece.has_moved
                && self.board.is_empty(&between)
                && self.board.is_empty(dst);
        }

        false
    }

    /// A diagonal pawn step onto an empty square is an en passant capture when the previous move
    /// was an enemy double push that landed beside the capturer, on the destination file.
    pub fn is_en_passant(&self, src: &Position, color: Color, dst: &Position) -> bool {
        let Some(last) = self.last_move else {
            return false;
        };

        last.color != color
            && last.is_double_push()
            && last.dst.row == src.row
            && last.dst.col == dst.col
            && last.dst.col.abs_diff(src.col) == 1
            && dst.row as isize == src.row as isize + color.forward()
            && self.board.is_empty(dst)
            && self
                .board
                .get_piece(&last.dst)
                .is_some_and(|p| p.piece_type == PieceType::Pawn && p.color != color)
    }

    fn is_valid_knight_move(&self, src: &Position, dst: &Position) -> bool {
        let row_diff = src.row.abs_diff(dst.row);
        let col_diff = src.col.abs_diff(dst.col);

        (row_diff == 2 && col_diff == 1) || (row_diff == 1 && col_diff == 2)
    }

    fn is_valid_bishop_move(&self, src: &Position, dst: &Position) -> bool {
        let row_diff = src.row.abs_diff(dst.row);
        let col_diff = src.col.abs_diff(dst.col);

        if row_diff != col_diff || row_diff == 0 {
            return false;
        }

        let row_dir: isize = if dst.row > src.row { 1 } else { -1 };
        let col_dir: isize = if dst.col > src.col { 1 } else { -1 };

        (1..row_diff as isize).all(|i| {
            src.offset(i * row_dir, i * col_dir)
                .is_some_and(|pos| self.board.is_empty(&pos))
        })
    }

    fn is_valid_rook_move(&self, src: &Position, dst: &Position) -> bool {
        if src.col == dst.col {
            let start_row = src.row.min(dst.row) + 1;
            let end_row = src.row.max(dst.row);
            (start_row..end_row).all(|row| self.board.is_empty(&Position::new(row, src.col)))
        } else if src.row == dst.row {
            let start_col = src.col.min(dst.col) + 1;
            let end_col = src.col.max(dst.col);
            (start_col..end_col).all(|col| self.board.is_empty(&Position::new(src.row, col)))
        } else {
            false
        }
    }

    fn is_valid_queen_move(&self, src: &Position, dst: &Position) -> bool {
        self.is_valid_rook_move(src, dst) || self.is_valid_bishop_move(src, dst)
    }

    fn is_valid_king_move(&self, src: &Position, piece: &Piece, dst: &Position) -> bool {
        let row_diff = src.row.abs_diff(dst.row);
        let col_diff = src.col.abs_diff(dst.col);

        if row_diff <= 1 && col_diff <= 1 {
            return true;
        }

        row_diff == 0 && col_diff == 2 && self.can_castle(src, piece, dst)
    }

    /// Unmoved king, unmoved same-side rook in the corner on the side of travel, and nothing in
    /// between. Attacked squares are not considered.
    fn can_castle(&self, src: &Position, piece: &Piece, dst: &Position) -> bool {
        if !self.castling_enabled || piece.has_moved {
            return false;
        }

        let rook_pos = castling_rook_origin(src, dst);
        let rook_ready = self.board.get_piece(&rook_pos).is_some_and(|rook| {
            rook.piece_type == PieceType::Rook && rook.color == piece.color && !rook.has_moved
        });

        let start_col = src.col.min(rook_pos.col) + 1;
        let end_col = src.col.max(rook_pos.col);

        rook_ready
            && (start_col..end_col).all(|col| self.board.is_empty(&Position::new(src.row, col)))
    }
}

pub fn castling_rook_origin(king_src: &Position, king_dst: &Position) -> Position {
    if king_dst.col > king_src.col {
        Position::new(king_src.row, 7)
    } else {
        Position::new(king_src.row, 0)
    }
}

/// Square the castling rook lands on: the one the king jumped over.
pub fn castling_rook_destination(king_src: &Position, king_dst: &Position) -> Position {
    Position::new(king_src.row, (king_src.col + king_dst.col) / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen;
    use proptest::prelude::*;
    use rstest::rstest;

    fn board(fen: &str) -> Board {
        fen::decode(fen).expect("Failed to decode test board")
    }

    fn legal(board: &Board, src: &str, dst: &str) -> bool {
        let src = Position::from_algebraic(src).expect("bad square");
        let dst = Position::from_algebraic(dst).expect("bad square");
        Context::new(board, None).is_pseudo_legal(&src, &dst)
    }

    #[rstest]
    #[case("e2", "e3", true)]
    #[case("e2", "e4", true)]
    #[case("e2", "e5", false)]
    #[case("e2", "d3", false)]
    #[case("e7", "e5", true)]
    #[case("e7", "e6", true)]
    #[case("e2", "e1", false)]
    #[case("g1", "f3", true)]
    #[case("g1", "e2", false)]
    #[case("a1", "a3", false)]
    #[case("c1", "e3", false)]
    #[case("d1", "d2", false)]
    #[case("e1", "g1", false)]
    fn test_standard_opening_moves(#[case] src: &str, #[case] dst: &str, #[case] expected: bool) {
        assert_eq!(legal(&Board::standard(), src, dst), expected);
    }

    #[test]
    fn test_pawn_double_step_needs_clear_path() {
        let b = board("8/8/8/8/8/4n3/4P3/8");
        assert!(!legal(&b, "e2", "e4"));
        assert!(!legal(&b, "e2", "e3"));

        let b = board("8/8/8/8/4n3/8/4P3/8");
        assert!(!legal(&b, "e2", "e4"));
        assert!(legal(&b, "e2", "e3"));
    }

    #[test]
    fn test_pawn_double_step_only_unmoved_from_start_rank() {
        let mut b = board("8/8/8/8/8/4P3/8/8");
        assert!(!legal(&b, "e3", "e5"));

        b = board("8/8/8/8/8/8/4P3/8");
        let pos = Position::new(6, 4);
        let pawn = b.get_piece(&pos).map(Piece::moved);
        b.set_piece(&pos, pawn);
        assert!(!legal(&b, "e2", "e4"));
        assert!(legal(&b, "e2", "e3"));
    }

    #[test]
    fn test_pawn_captures() {
        let b = board("8/8/8/8/3p1P2/4P3/8/8");
        assert!(legal(&b, "e3", "d4"));
        assert!(!legal(&b, "e3", "f4"));
        assert!(legal(&b, "d4", "e3"));
        assert!(!legal(&b, "d4", "c3"));
    }

    #[test]
    fn test_en_passant_requires_preceding_double_push() {
        let b = board("8/8/8/8/3pP3/8/8/8");
        let src = Position::new(4, 3);
        let dst = Position::new(5, 4);
        let push = MoveRecord::new(
            PieceType::Pawn,
            Color::White,
            Position::new(6, 4),
            Position::new(4, 4),
        );
        assert!(Context::new(&b, Some(&push)).is_pseudo_legal(&src, &dst));
        assert!(!Context::new(&b, None).is_pseudo_legal(&src, &dst));

        let single = MoveRecord::new(
            PieceType::Pawn,
            Color::White,
            Position::new(5, 4),
            Position::new(4, 4),
        );
        assert!(!Context::new(&b, Some(&single)).is_pseudo_legal(&src, &dst));

        let wrong_file = Position::new(5, 2);
        assert!(!Context::new(&b, Some(&push)).is_pseudo_legal(&src, &wrong_file));
    }

    #[test]
    fn test_sliders_blocked() {
        let b = board("8/8/8/3p4/8/1B1R1p2/8/8");
        assert!(legal(&b, "d3", "d5"));
        assert!(!legal(&b, "d3", "d6"));
        assert!(legal(&b, "d3", "f3"));
        assert!(!legal(&b, "d3", "g3"));
        assert!(!legal(&b, "d3", "b3"));
        assert!(!legal(&b, "d3", "e4"));
        assert!(legal(&b, "b3", "d5"));
        assert!(!legal(&b, "b3", "e6"));
        assert!(!legal(&b, "b3", "b4"));
    }

    #[test]
    fn test_queen_composes_rook_and_bishop() {
        let b = board("8/8/8/8/3Q4/8/8/8");
        let src = Position::from_algebraic("d4").expect("bad square");
        let destinations = Context::new(&b, None).legal_destinations(&src);
        assert_eq!(destinations.len(), 27);
        assert!(!legal(&b, "d4", "e6"));
    }

    #[test]
    fn test_king_steps_and_castling() {
        let b = board("r3k2r/8/8/8/8/8/8/R3K2R");
        assert!(legal(&b, "e1", "g1"));
        assert!(legal(&b, "e1", "c1"));
        assert!(legal(&b, "e8", "g8"));
        assert!(legal(&b, "e8", "c8"));
        assert!(legal(&b, "e1", "f2"));
        assert!(!legal(&b, "e1", "e3"));

        let blocked = board("r3k2r/8/8/8/8/8/8/RN2K1NR");
        assert!(!legal(&blocked, "e1", "g1"));
        assert!(!legal(&blocked, "e1", "c1"));

        let no_rook = board("4k3/8/8/8/8/8/8/4K3");
        assert!(!legal(&no_rook, "e1", "g1"));

        let ctx = Context::new(&b, None).with_castling(false);
        assert!(!ctx.is_pseudo_legal(&Position::new(7, 4), &Position::new(7, 6)));
    }

    #[test]
    fn test_castling_needs_unmoved_pieces() {
        let mut b = board("8/8/8/8/8/8/8/R3K2R");
        let rook_pos = Position::new(7, 7);
        let rook = b.get_piece(&rook_pos).map(Piece::moved);
        b.set_piece(&rook_pos, rook);
        assert!(!legal(&b, "e1", "g1"));
        assert!(legal(&b, "e1", "c1"));

        let king_pos = Position::new(7, 4);
        let king = b.get_piece(&king_pos).map(Piece::moved);
        b.set_piece(&king_pos, king);
        assert!(!legal(&b, "e1", "c1"));
    }

    #[test]
    fn test_castling_rook_squares() {
        let king = Position::new(7, 4);
        assert_eq!(
            castling_rook_origin(&king, &Position::new(7, 6)),
            Position::new(7, 7)
        );
        assert_eq!(
            castling_rook_destination(&king, &Position::new(7, 6)),
            Position::new(7, 5)
        );
        assert_eq!(
            castling_rook_origin(&king, &Position::new(7, 2)),
            Position::new(7, 0)
        );
        assert_eq!(
            castling_rook_destination(&king, &Position::new(7, 2)),
            Position::new(7, 3)
        );
    }

    #[test]
    fn test_degenerate_inputs_are_illegal() {
        let b = Board::standard();
        let ctx = Context::new(&b, None);
        let e2 = Position::new(6, 4);
        assert!(!ctx.is_pseudo_legal(&e2, &e2));
        assert!(!ctx.is_pseudo_legal(&e2, &Position::new(9, 4)));
        assert!(!ctx.is_pseudo_legal(&Position::new(4, 4), &Position::new(3, 4)));
        assert!(ctx.legal_destinations(&Position::new(4, 4)).is_empty());
    }

    fn arbitrary_square() -> impl Strategy<Value = Option<Piece>> {
        prop_oneof![
            2 => Just(None),
            1 => (0..6usize, any::<bool>(), any::<bool>()).prop_map(|(kind, white, moved)| {
                let color = if white { Color::White } else { Color::Black };
                let piece = Piece::new(PieceType::ALL[kind], color);
                Some(if moved { piece.moved() } else { piece })
            }),
        ]
    }

    proptest! {
        #[test]
        fn prop_never_lands_on_own_piece(
            squares in proptest::collection::vec(arbitrary_square(), 64),
            src in (0..8usize, 0..8usize),
        ) {
            let mut b = Board::empty();
            for (pos, piece) in Position::all().zip(squares) {
                b.set_piece(&pos, piece);
            }
            let src = Position::new(src.0, src.1);
            let ctx = Context::new(&b, None);

            if let Some(piece) = b.get_piece(&src) {
                for dst in ctx.legal_destinations(&src) {
                    prop_assert!(!b.is_occupied_by(&dst, piece.color));
                }
            }
        }
    }
}
