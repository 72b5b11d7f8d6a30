pub mod board;
pub mod color;
pub mod config;
pub mod error;
pub mod fen;
pub mod history;
pub mod r#move;
pub mod notation;
pub mod pieces;
pub mod position;
pub mod rules;
pub mod session;

#[cfg(feature = "serde")]
pub mod serde_support;

pub use board::Board;
pub use color::Color;
pub use config::SessionConfig;
pub use error::{FenError, SquareError};
pub use r#move::{MoveFlags, MoveRecord};
pub use notation::{MoveEntry, MoveList};
pub use pieces::{Piece, PieceType};
pub use position::Position;
pub use session::{ClickOutcome, MoveOutcome, Session};

#[cfg(feature = "python")]
extern crate pyo3;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule(gil_used = false)]
fn chess_rules(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use python_bindings::*;
    m.add_class::<PySession>()?;
    m.add_class::<PyMoveEntry>()?;
    m.add("WHITE", Color::White as i8)?;
    m.add("BLACK", Color::Black as i8)?;
    Ok(())
}

#[cfg(feature = "python")]
mod python_bindings {
    use super::*;

    type PyGrid = Vec<Vec<Option<String>>>;

    fn grid(board: &Board) -> PyGrid {
        board
            .grid()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|square| square.map(|p| p.to_char().to_string()))
                    .collect()
            })
            .collect()
    }

    fn value_error(message: String) -> PyErr {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(message)
    }

    fn position(row: usize, col: usize) -> PyResult<Position> {
        let pos = Position::new(row, col);
        if pos.is_valid() {
            Ok(pos)
        } else {
            Err(value_error(format!(
                "square ({row}, {col}) is outside the 8x8 board"
            )))
        }
    }

    #[pyclass(name = "Session")]
    #[derive(Clone)]
    pub struct PySession {
        session: Session,
    }

    #[pymethods]
    impl PySession {
        #[new]
        #[pyo3(signature = (start_position = None, castling_enabled = true))]
        pub fn new(start_position: Option<String>, castling_enabled: bool) -> PyResult<Self> {
            let config = match start_position {
                Some(fen) => SessionConfig::from_position(fen),
                None => SessionConfig::default(),
            }
            .with_castling(castling_enabled);

            let session = Session::new(config).map_err(|e| value_error(e.to_string()))?;
            Ok(PySession { session })
        }

        pub fn select(&mut self, row: usize, col: usize) -> PyResult<bool> {
            Ok(self.session.select(position(row, col)?))
        }

        /// Returns the long algebraic form of the committed move, or None if nothing moved.
        pub fn attempt_move(&mut self, row: usize, col: usize) -> PyResult<Option<String>> {
            match self.session.attempt_move(position(row, col)?) {
                MoveOutcome::Moved(record) => Ok(Some(record.to_lan())),
                _ => Ok(None),
            }
        }

        pub fn click(&mut self, row: usize, col: usize) -> PyResult<Option<String>> {
            match self.session.click(position(row, col)?) {
                ClickOutcome::Move(MoveOutcome::Moved(record)) => Ok(Some(record.to_lan())),
                _ => Ok(None),
            }
        }

        pub fn selected(&self) -> Option<(usize, usize)> {
            self.session.selected().map(|pos| (pos.row, pos.col))
        }

        pub fn highlights(&self) -> Vec<(usize, usize)> {
            self.session
                .highlights()
                .iter()
                .map(|pos| (pos.row, pos.col))
                .collect()
        }

        pub fn legal_destinations(&self, row: usize, col: usize) -> PyResult<Vec<(usize, usize)>> {
            Ok(self
                .session
                .legal_destinations(&position(row, col)?)
                .iter()
                .map(|pos| (pos.row, pos.col))
                .collect())
        }

        pub fn current_board(&self) -> PyGrid {
            grid(self.session.current_board())
        }

        pub fn displayed_board(&self) -> PyGrid {
            grid(self.session.displayed_board())
        }

        pub fn navigate(&mut self, delta: isize) -> Option<PyGrid> {
            self.session.navigate(delta).map(grid)
        }

        pub fn history_entries(&self) -> Vec<PyMoveEntry> {
            self.session
                .history_entries()
                .iter()
                .cloned()
                .map(|entry| PyMoveEntry { entry })
                .collect()
        }

        pub fn turn(&self) -> u32 {
            self.session.turn()
        }

        pub fn side_to_move(&self) -> i8 {
            self.session.side_to_move() as i8
        }

        pub fn to_fen(&self) -> String {
            self.session.to_fen()
        }

        pub fn pgn_movetext(&self) -> String {
            self.session.move_list().to_pgn_movetext()
        }

        pub fn __str__(&self) -> String {
            self.session.current_board().to_string()
        }

        pub fn __repr__(&self) -> String {
            format!(
                "Session(turn={}, side_to_move={})",
                self.session.turn(),
                self.session.side_to_move()
            )
        }
    }

    #[pyclass(name = "MoveEntry")]
    #[derive(Clone, Debug)]
    pub struct PyMoveEntry {
        entry: MoveEntry,
    }

    #[pymethods]
    impl PyMoveEntry {
        pub fn turn_number(&self) -> u32 {
            self.entry.turn_number
        }

        pub fn white(&self) -> String {
            self.entry.white.clone()
        }

        pub fn black(&self) -> String {
            self.entry.black.clone()
        }

        pub fn __str__(&self) -> String {
            self.entry.to_string()
        }

        pub fn __repr__(&self) -> String {
            format!("MoveEntry({})", self.entry)
        }
    }
}
