use crate::error::SquareError;
use std::fmt;

pub const BOARD_SIZE: usize = 8;

/// A square on the board, addressed the way the presentation layer clicks it:
/// row 0 is rank 8 (Black's back rank), row 7 is rank 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    pub fn is_valid(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Position> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        let pos = Position::new(row, col);
        pos.is_valid().then_some(pos)
    }

    pub fn file(&self) -> char {
        (b'a' + self.col as u8) as char
    }

    pub fn rank(&self) -> char {
        (b'8' - self.row as u8) as char
    }

    pub fn to_algebraic(&self) -> String {
        self.to_string()
    }

    pub fn from_algebraic(s: &str) -> Result<Self, SquareError> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareError::Malformed(s.to_string()));
        };

        if !('a'..='h').contains(&file) {
            return Err(SquareError::File(file));
        }
        if !('1'..='8').contains(&rank) {
            return Err(SquareError::Rank(rank));
        }

        Ok(Position {
            row: (b'8' - rank as u8) as usize,
            col: (file as u8 - b'a') as usize,
        })
    }

    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position::new(row, col)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}{}", self.file(), self.rank())
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}
