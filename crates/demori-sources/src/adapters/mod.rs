//! Built-in source adapters.
//!
//! Each adapter is a synthetic stand-in for a real lookup (scraping a
//! company site, querying a directory, SMTP probing). The data is
//! pattern-generated with a declared confidence distribution, but the
//! interface, latency profile, and cancellation behavior match what a
//! real implementation would have, so one can be swapped in without
//! touching the aggregation contract.

pub mod company_website;
pub mod directory;
pub mod email_verification;
pub mod phone_validation;
pub mod social;

pub use company_website::CompanyWebsiteSource;
pub use directory::DirectorySource;
pub use email_verification::EmailVerificationSource;
pub use phone_validation::PhoneValidationSource;
pub use social::SocialPlatformsSource;

use crate::error::{Result, SourceError};
use demori_core::SourceId;
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Lower bound of the simulated lookup latency in milliseconds.
const MIN_LATENCY_MS: u64 = 20;

/// Upper bound of the simulated lookup latency in milliseconds.
const MAX_LATENCY_MS: u64 = 120;

/// Sleep for a randomized lookup latency, honoring cancellation.
///
/// This is the adapters' main suspension point; a cancelled search
/// returns here instead of producing late data.
pub(crate) async fn simulate_latency(
    source: &SourceId,
    cancel: &CancellationToken,
) -> Result<()> {
    let delay_ms = rand::thread_rng().gen_range(MIN_LATENCY_MS..=MAX_LATENCY_MS);

    tokio::select! {
        () = cancel.cancelled() => Err(SourceError::Cancelled {
            source_id: source.clone(),
        }),
        () = tokio::time::sleep(Duration::from_millis(delay_ms)) => Ok(()),
    }
}

/// Apply random jitter around a base confidence, clamped to [0,1].
pub(crate) fn jitter(base: f64, spread: f64) -> f64 {
    let delta = rand::thread_rng().gen_range(-spread..=spread);
    (base + delta).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_stays_in_range() {
        for _ in 0..200 {
            let value = jitter(0.9, 0.2);
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[tokio::test]
    async fn test_simulate_latency_cancelled() {
        let source = SourceId::new("company-website").expect("valid id");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = simulate_latency(&source, &cancel).await;
        assert!(matches!(result, Err(SourceError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn test_simulate_latency_completes() {
        let source = SourceId::new("company-website").expect("valid id");
        let cancel = CancellationToken::new();

        simulate_latency(&source, &cancel)
            .await
            .expect("latency completes without cancellation");
    }
}
