//! Error types for source adapters.

use demori_core::SourceId;
use thiserror::Error;

/// Errors produced by a single source adapter invocation.
///
/// Adapter errors are always isolated by the caller: a failing adapter
/// contributes nothing to the aggregate, it never aborts its siblings.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The adapter cannot work with the given query (e.g. no company)
    #[error("source {source_id} cannot serve this query: {reason}")]
    Unsupported {
        /// Which adapter rejected the query
        source_id: SourceId,
        /// Why it cannot serve the query
        reason: String,
    },

    /// The search was cancelled while this adapter was running
    #[error("source {source_id} cancelled")]
    Cancelled {
        /// Which adapter was cancelled
        source_id: SourceId,
    },

    /// A requested source id is not registered
    #[error("source not found: {source_id}")]
    NotFound {
        /// The unknown source id
        source_id: String,
    },

    /// Internal adapter failure
    #[error("source error: {0}")]
    Internal(String),
}

impl From<SourceError> for demori_core::DemoriError {
    fn from(err: SourceError) -> Self {
        Self::Adapter(err.to_string())
    }
}

/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
