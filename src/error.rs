use thiserror::Error;

/// The reason a board-field string could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("empty position string")]
    Empty,
    #[error("expected 8 ranks separated by '/', found {found}")]
    WrongRankCount { found: usize },
    #[error("unknown piece character '{0}'")]
    UnknownPiece(char),
    #[error("rank {rank} covers {width} columns instead of 8")]
    RankWidth { rank: usize, width: usize },
}

/// The reason an algebraic square such as `e4` could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquareError {
    #[error("expected a file letter followed by a rank digit, got {0:?}")]
    Malformed(String),
    #[error("file '{0}' is outside a-h")]
    File(char),
    #[error("rank '{0}' is outside 1-8")]
    Rank(char),
}
