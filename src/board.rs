use crate::color::Color;
use crate::error::FenError;
use crate::fen;
use crate::pieces::Piece;
use crate::position::{BOARD_SIZE, Position};
use std::fmt;
use std::str::FromStr;

pub const STANDARD_BOARD: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// The 8x8 grid. Each square owns at most one piece; moving a piece transfers it out of its
/// origin square.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE * BOARD_SIZE],
}

impl Board {
    pub fn standard() -> Self {
        fen::decode(STANDARD_BOARD).expect("Failed to create standard board")
    }

    pub fn empty() -> Self {
        Board {
            squares: [None; BOARD_SIZE * BOARD_SIZE],
        }
    }

    fn index(pos: &Position) -> usize {
        pos.row * BOARD_SIZE + pos.col
    }

    pub fn get_piece(&self, pos: &Position) -> Option<Piece> {
        if pos.is_valid() {
            self.squares[Self::index(pos)]
        } else {
            None
        }
    }

    pub fn set_piece(&mut self, pos: &Position, piece: Option<Piece>) {
        if pos.is_valid() {
            self.squares[Self::index(pos)] = piece;
        }
    }

    pub fn take_piece(&mut self, pos: &Position) -> Option<Piece> {
        if pos.is_valid() {
            self.squares[Self::index(pos)].take()
        } else {
            None
        }
    }

    pub fn is_empty(&self, pos: &Position) -> bool {
        self.get_piece(pos).is_none()
    }

    pub fn is_occupied_by(&self, pos: &Position, color: Color) -> bool {
        self.get_piece(pos).is_some_and(|p| p.color == color)
    }

    pub fn pieces(&self, color: Color) -> Vec<(Position, Piece)> {
        Position::all()
            .filter_map(|pos| self.get_piece(&pos).map(|piece| (pos, piece)))
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    pub fn grid(&self) -> [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE] {
        let mut grid = [[None; BOARD_SIZE]; BOARD_SIZE];
        for pos in Position::all() {
            grid[pos.row][pos.col] = self.get_piece(&pos);
        }
        grid
    }

    /// Same kind and side on every square; `has_moved` flags are not compared.
    pub fn occupancy_eq(&self, other: &Board) -> bool {
        self.squares
            .iter()
            .zip(other.squares.iter())
            .all(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => a.same_identity(b),
                (None, None) => true,
                _ => false,
            })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fen::decode(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            write!(f, "{} ", BOARD_SIZE - row)?;
            for col in 0..BOARD_SIZE {
                match self.get_piece(&Position::new(row, col)) {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }

        write!(f, "  ")?;
        for col in 0..BOARD_SIZE {
            write!(f, "{} ", (b'a' + col as u8) as char)?;
        }
        Ok(())
    }
}
