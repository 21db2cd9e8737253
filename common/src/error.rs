//! Error type definitions

use thiserror::Error;

/// Common error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;
