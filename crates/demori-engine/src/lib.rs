//! Demori Contact Engine
//!
//! The engine discovers professional contact details (emails, phones,
//! social profiles) for a person. A search flows through a fixed
//! pipeline: local cache, remote contact store, concurrent fan-out to
//! the enabled source adapters, aggregation into one ranked profile,
//! persistence, and a predicted fallback profile when nothing else
//! produced data.
//!
//! [`SearchOrchestrator`] is the public entry point; [`api::handle`]
//! wraps it in a JSON message envelope for embedding applications.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod aggregator;
pub mod api;
pub mod error;
pub mod export;
pub mod fallback;
pub mod orchestrator;

pub use aggregator::aggregate;
pub use api::{handle, Request, Response};
pub use error::{EngineError, Result};
pub use export::{render, ExportFormat};
pub use fallback::fallback_profile;
pub use orchestrator::{SearchOrchestrator, SearchOutcome};
