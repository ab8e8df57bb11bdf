//! Error types for ringtimer app services
//!
//! Wraps engine errors and adds storage and lookup failures.

use ringtimer::error::TimerError;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] TimerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Config(format!("I/O error: {}", e))
    }
}

/// Result type alias for ringtimer app services
pub type Result<T> = std::result::Result<T, AppError>;
