//! Crate-level error type

use thiserror::Error;

use crate::config::ConfigError;
use crate::format::FormatError;
use crate::refresh::TriggerError;

/// Errors surfaced by the page controller and its collaborators
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Trigger error: {0}")]
    Trigger(#[from] TriggerError),

    /// Refresh interval of zero seconds
    #[error("Refresh interval must be greater than zero")]
    InvalidInterval,

    /// Operation attempted after shutdown
    #[error("Page controller has been shut down")]
    ShutDown,

    #[error("Event error: {0}")]
    Event(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for page operations
pub type PageResult<T> = Result<T, PageError>;
