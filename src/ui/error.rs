//! UI error types

use thiserror::Error;

/// Errors that can occur while driving the terminal UI.
#[derive(Debug, Error)]
pub enum UiError {
    /// IO error from the terminal backend
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid palette configuration
    #[error("palette error: {0}")]
    Palette(String),
}

/// Result type for UI operations
pub type Result<T> = std::result::Result<T, UiError>;
