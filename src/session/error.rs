use std::error::Error;
use std::fmt;

use crate::chess::MoveError;

/// Everything that can go wrong while processing one client command.
/// Converted to an ERROR wire message at the dispatch boundary; never
/// propagates past the originating connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Unauthorized,
    NotFound,
    RuleViolation(String),
    Malformed(String),
    Internal(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Unauthorized => write!(f, "Error: unauthorized"),
            SessionError::NotFound => write!(f, "Error: game does not exist"),
            SessionError::RuleViolation(message) => write!(f, "Error: {}", message),
            SessionError::Malformed(message) => write!(f, "Error: malformed command: {}", message),
            SessionError::Internal(message) => write!(f, "Error: internal failure: {}", message),
        }
    }
}

impl Error for SessionError {}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        SessionError::RuleViolation(err.to_string())
    }
}
