use crate::color::Color;
use crate::pieces::PieceType;
use crate::position::Position;
use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        const CAPTURE = 0b00000001;
        const DOUBLE_PUSH = 0b00000010;
        const EN_PASSANT = 0b00000100;
        const CASTLE = 0b00001000;
        const PROMOTION = 0b00010000;
    }
}

/// A committed move, as appended to the move log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    pub piece_type: PieceType,
    pub color: Color,
    pub src: Position,
    pub dst: Position,
    pub flags: MoveFlags,
}

impl MoveRecord {
    pub fn new(piece_type: PieceType, color: Color, src: Position, dst: Position) -> Self {
        MoveRecord {
            piece_type,
            color,
            src,
            dst,
            flags: MoveFlags::empty(),
        }
    }

    pub fn with_flags(self, flags: MoveFlags) -> Self {
        MoveRecord {
            flags: self.flags | flags,
            ..self
        }
    }

    pub fn is_double_push(&self) -> bool {
        self.piece_type == PieceType::Pawn
            && self.src.col == self.dst.col
            && self.src.row.abs_diff(self.dst.row) == 2
    }

    pub fn is_kingside_castle(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE) && self.dst.col > self.src.col
    }

    /// Long algebraic form, e.g. `e2e4` or `e7e8q`.
    pub fn to_lan(&self) -> String {
        let mut lan = format!("{}{}", self.src.to_algebraic(), self.dst.to_algebraic());
        if self.flags.contains(MoveFlags::PROMOTION) {
            lan.push('q');
        }
        lan
    }
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color, self.to_lan())
    }
}
