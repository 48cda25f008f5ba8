//! Demori Remote Client
//!
//! Resilient client for the hosted contact store. Handles retry with
//! exponential backoff on rate limits and network failures, falls back
//! to a durable local queue when the store is unreachable, and drains
//! that queue idempotently once connectivity returns.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod client;
pub mod error;
pub mod transport;

pub use client::{RemoteClient, SaveOutcome, SearchRecord, SyncReport};
pub use error::{RemoteError, Result};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};
