use std::fmt;

/// Why a column could not accept a piece
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveRejection {
    OutOfRange,
    ColumnFull,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejection::OutOfRange => write!(f, "out of range"),
            MoveRejection::ColumnFull => write!(f, "full"),
        }
    }
}

/// Errors reported by the game logic and search
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid move, column {column} {reason}")]
    InvalidMove {
        column: usize,
        reason: MoveRejection,
    },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("the game is already over")]
    GameOver,

    #[error("could not parse position: {0}")]
    Parse(String),
}

impl Error {
    pub fn is_invalid_move(&self) -> bool {
        matches!(self, Error::InvalidMove { .. })
    }
}
