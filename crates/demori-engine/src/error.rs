//! Error types for the engine surface.

use demori_core::DemoriError;
use thiserror::Error;

/// Errors raised by the engine's message envelope and export surface.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Request named an action the engine does not handle
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    /// Request payload did not match the action's expected shape
    #[error("invalid request payload: {0}")]
    InvalidPayload(String),

    /// Export format tag was not recognized
    #[error("unsupported export format '{0}'")]
    UnsupportedFormat(String),

    /// Error from the core engine
    #[error(transparent)]
    Core(#[from] DemoriError),
}

impl From<EngineError> for DemoriError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Core(e) => e,
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
