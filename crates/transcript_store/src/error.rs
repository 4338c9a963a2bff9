//! Transcript store error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transcript not found")]
    NotFound,

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
