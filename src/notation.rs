use std::fmt;

use crate::pieces::PieceType;
use crate::position::Position;
use crate::r#move::{MoveFlags, MoveRecord};
use crate::rules::Context;

pub const EN_PASSANT_MARKER: &str = " e.p.";

/// `ctx` must describe the position *before* the move was applied: disambiguation looks for
/// other pieces that could have reached the same square.
pub fn algebraic(ctx: &Context<'_>, mv: &MoveRecord) -> String {
    if mv.flags.contains(MoveFlags::CASTLE) {
        return if mv.is_kingside_castle() {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        };
    }

    let capture = mv.flags.intersects(MoveFlags::CAPTURE | MoveFlags::EN_PASSANT);
    let mut san = String::new();

    if mv.piece_type == PieceType::Pawn {
        if capture {
            san.push(mv.src.file());
            san.push('x');
        }
        san.push_str(&mv.dst.to_algebraic());

        if mv.flags.contains(MoveFlags::PROMOTION) {
            san.push_str("=Q");
        }
        if mv.flags.contains(MoveFlags::EN_PASSANT) {
            san.push_str(EN_PASSANT_MARKER);
        }
        return san;
    }

    san.push(mv.piece_type.letter());
    san.push_str(&disambiguation(ctx, mv));
    if capture {
        san.push('x');
    }
    san.push_str(&mv.dst.to_algebraic());
    san
}

/// Origin file, rank, or both, when another piece of the same kind and side could also have
/// moved to the destination.
pub fn disambiguation(ctx: &Context<'_>, mv: &MoveRecord) -> String {
    let rivals: Vec<Position> = ctx
        .board
        .pieces(mv.color)
        .into_iter()
        .filter(|(pos, piece)| {
            *pos != mv.src
                && piece.piece_type == mv.piece_type
                && ctx.is_pseudo_legal(pos, &mv.dst)
        })
        .map(|(pos, _)| pos)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let shares_file = rivals.iter().any(|pos| pos.col == mv.src.col);
    let shares_rank = rivals.iter().any(|pos| pos.row == mv.src.row);

    match (shares_file, shares_rank) {
        (false, _) => mv.src.file().to_string(),
        (true, false) => mv.src.rank().to_string(),
        (true, true) => mv.src.to_algebraic(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveEntry {
    pub turn_number: u32,
    pub white: String,
    pub black: String,
}

impl fmt::Display for MoveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.turn_number, self.white)?;
        if !self.black.is_empty() {
            write!(f, " {}", self.black)?;
        }
        Ok(())
    }
}

/// Move pairs in play order. White's move opens an entry, Black's completes it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveList {
    entries: Vec<MoveEntry>,
}

impl MoveList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn_number: u32, white: &str, black: &str) {
        match self
            .entries
            .iter_mut()
            .rev()
            .find(|entry| entry.turn_number == turn_number)
        {
            Some(entry) => {
                entry.white = white.to_string();
                entry.black = black.to_string();
            }
            None => self.entries.push(MoveEntry {
                turn_number,
                white: white.to_string(),
                black: black.to_string(),
            }),
        }
    }

    /// Files a half move under the pair it belongs to. `turn` is the engine's turn counter at the
    /// time the move was played.
    pub fn push_half_move(&mut self, turn: u32, san: &str) {
        let turn_number = turn.div_ceil(2);
        if turn % 2 == 1 {
            self.record(turn_number, san, "");
        } else {
            let white = self
                .entries
                .iter()
                .rev()
                .find(|entry| entry.turn_number == turn_number)
                .map(|entry| entry.white.clone())
                .unwrap_or_default();
            self.record(turn_number, &white, san);
        }
    }

    pub fn entries(&self) -> &[MoveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_pgn_movetext(&self) -> String {
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
