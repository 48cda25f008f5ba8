//! Demori Source Adapters
//!
//! Independent, parallel-callable units that each attempt to produce
//! partial contact data (emails, phones, social profiles) for a query.
//! The orchestrator selects adapters through the [`SourceRegistry`] using
//! the enabled-set from settings and fans the query out to all of them.
//!
//! Adapter failures are isolated by contract: a rejected adapter
//! contributes nothing, never an error to the search caller.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod adapters;
pub mod error;
pub mod registry;
pub mod source;

pub use adapters::{
    CompanyWebsiteSource, DirectorySource, EmailVerificationSource, PhoneValidationSource,
    SocialPlatformsSource,
};
pub use error::{Result, SourceError};
pub use registry::SourceRegistry;
pub use source::ContactSource;
