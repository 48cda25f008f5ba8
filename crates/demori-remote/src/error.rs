//! Error types for the remote client.

use thiserror::Error;

/// Errors that can occur talking to the remote contact store.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The store could not be reached after exhausting retries.
    ///
    /// Callers must treat this as "no remote data", never as fatal.
    #[error("remote store unavailable after {attempts} attempts: {endpoint}")]
    Unavailable {
        /// Endpoint that was being called
        endpoint: String,
        /// How many attempts were made
        attempts: u32,
    },

    /// Non-retryable API error (4xx other than 429)
    #[error("remote API error ({endpoint}): status {status}, {message}")]
    Api {
        /// Endpoint that was being called
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Network-class transport failure (retryable)
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape
    #[error("failed to parse remote response: {0}")]
    Parse(String),

    /// Serialization error building a request
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local queue access failed while falling back
    #[error("pending-write queue error: {0}")]
    Queue(#[from] demori_store::StoreError),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<RemoteError> for demori_core::DemoriError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Unavailable { .. } | RemoteError::Network(_) => {
                Self::RemoteUnavailable(err.to_string())
            }
            RemoteError::Queue(e) => Self::Persistence(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;
