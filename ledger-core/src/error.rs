//! Error types for the ledger analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Input file unreadable, malformed, or empty after cleaning
    #[error("Load error: {0}")]
    Load(String),

    /// Operation invoked before its precondition holds
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Requested period_index={requested} is out of range. Only {available} available.")]
    Range { requested: usize, available: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn load(msg: impl Into<String>) -> Self {
        Error::Load(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
