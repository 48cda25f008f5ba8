//! Demori Core
//!
//! Shared types, errors, and configuration for the Demori contact engine.
//! Every other crate in the workspace depends on this one; it defines the
//! domain vocabulary (queries, per-source results, aggregated profiles)
//! and the central error taxonomy.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod settings;
pub mod types;

pub use error::{ConfigError, ConfigResult, DemoriError, Result};
pub use settings::EngineSettings;
pub use types::{
    AggregatedProfile, ContactQuery, EmailCandidate, PhoneCandidate, SearchOrigin, SocialProfile,
    SourceId, SourceResult, Timestamp,
};
