use crate::board::STANDARD_BOARD;

/// Options a [`Session`](crate::session::Session) is created with.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Starting placement in the board codec's text form. Decoded pieces count as unmoved.
    pub start_position: String,
    /// When false the king never castles.
    pub castling_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            start_position: STANDARD_BOARD.to_string(),
            castling_enabled: true,
        }
    }
}

impl SessionConfig {
    pub fn from_position(start_position: impl Into<String>) -> Self {
        SessionConfig {
            start_position: start_position.into(),
            ..Self::default()
        }
    }

    pub fn with_castling(self, castling_enabled: bool) -> Self {
        SessionConfig {
            castling_enabled,
            ..self
        }
    }
}
