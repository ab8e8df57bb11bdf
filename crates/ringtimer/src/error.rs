//! Error types for ringtimer
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for the ringtimer engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("Invalid timer configuration: {0}")]
    InvalidConfig(String),

    #[error("Audio error: {0}")]
    Audio(String),
}

/// Result type alias for ringtimer
pub type Result<T> = std::result::Result<T, TimerError>;
