//! Core error types for the Demori contact engine.
//!
//! This module defines the central error type used across all subsystems.
//! The taxonomy mirrors the engine's recovery rules: only `InvalidQuery`
//! surfaces to callers immediately; everything else is recovered from
//! (isolation, backoff, queueing) before it can become fatal.

use thiserror::Error;

/// Central error type for all Demori operations.
///
/// Each variant represents an error from a specific subsystem, allowing
/// for clear error propagation and handling across module boundaries.
#[derive(Error, Debug)]
pub enum DemoriError {
    /// The submitted query is unusable (surfaced immediately to the caller)
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A single source adapter failed (isolated, contributes nothing)
    #[error("source adapter error: {0}")]
    Adapter(String),

    /// The remote contact store could not be reached after retries
    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote store is rate limiting us (recovered via backoff)
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Local persistence failed (queued or logged, never blocks a search)
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors (invalid input, constraints)
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize settings
    #[error("failed to serialize settings: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing settings
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid setting for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `DemoriError`.
pub type Result<T> = std::result::Result<T, DemoriError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
