//! Error types for the plank solver.

use thiserror::Error;

use crate::action::Action;

/// Main error type for the solver crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An action was applied that the action generator could never have produced.
    #[error("invariant violation applying '{action}': {reason}")]
    InvariantViolation { action: Action, reason: String },

    #[error("no solution found within bound {bound}")]
    NoSolutionWithinBound { bound: u32 },

    #[error("search exhausted every reachable state without reaching the goal")]
    NoSolution,

    #[error("invalid board: {message}")]
    InvalidBoard { message: String },

    #[error("line {line}: {message} in '{content}'")]
    InvalidLine {
        line: usize,
        content: String,
        message: String,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invariant(action: &Action, reason: impl Into<String>) -> Self {
        Error::InvariantViolation {
            action: action.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_board(message: impl Into<String>) -> Self {
        Error::InvalidBoard {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
