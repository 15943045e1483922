use std::path::PathBuf;

use crate::game::tictactoe::TTTAddr;

/// Errors raised while playing and learning
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Out of range, or the cell already holds a marker
    #[error("Illegal move at {addr}: {reason}")]
    IllegalMove { addr: usize, reason: &'static str },

    /// An action was requested for a board where no move is possible
    #[error("No legal actions available from current state")]
    EmptyActionSet,

    /// A stored Q-table could not be read back
    #[error("Could not load Q-table from {path}: {reason}")]
    PersistenceLoad { path: PathBuf, reason: String },

    /// The human input source is exhausted
    #[error("Input closed")]
    InputClosed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn occupied(addr: TTTAddr) -> Self {
        Error::IllegalMove {
            addr: addr.0,
            reason: "there is already a marker there",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
