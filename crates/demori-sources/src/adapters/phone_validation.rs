//! Phone format guessing by region.

use crate::adapters::{jitter, simulate_latency};
use crate::error::Result;
use crate::source::ContactSource;
use async_trait::async_trait;
use demori_core::{ContactQuery, PhoneCandidate, SourceId, SourceResult};
use rand::Rng;
use tokio_util::sync::CancellationToken;

/// Guesses a plausibly formatted number for the query's region.
///
/// Stands in for a carrier/format validation service; the region is
/// inferred from the location field with a US fallback.
pub struct PhoneValidationSource {
    id: SourceId,
    validate: bool,
}

impl PhoneValidationSource {
    /// Stable identifier of this source.
    pub const ID: &'static str = "phone-validation";

    /// Create the source. `validate` mirrors the `phone_validation`
    /// setting; when false the confidence is reduced since the format was
    /// never checked.
    #[must_use]
    pub fn new(validate: bool) -> Self {
        Self {
            id: SourceId::new(Self::ID).expect("valid source id"),
            validate,
        }
    }

    fn format_for_region(location: &str) -> String {
        let mut rng = rand::thread_rng();
        let location = location.to_lowercase();

        if location.contains("united kingdom") || location.contains("london") {
            format!("+44 20 7{:03} {:04}", rng.gen_range(0..1000), rng.gen_range(0..10000))
        } else if location.contains("germany") || location.contains("berlin") {
            format!("+49 30 {:07}", rng.gen_range(0..10_000_000))
        } else if location.contains("india") || location.contains("mumbai") {
            format!("+91 {:05} {:05}", rng.gen_range(70000..100_000), rng.gen_range(0..100_000))
        } else {
            // North American numbering plan fallback
            format!(
                "+1 ({:03}) {:03}-{:04}",
                rng.gen_range(200..1000),
                rng.gen_range(200..1000),
                rng.gen_range(0..10000)
            )
        }
    }
}

#[async_trait]
impl ContactSource for PhoneValidationSource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    fn display_name(&self) -> &'static str {
        "Phone Validation"
    }

    async fn lookup(
        &self,
        query: &ContactQuery,
        cancel: &CancellationToken,
    ) -> Result<SourceResult> {
        simulate_latency(&self.id, cancel).await?;

        if !query.has_location() {
            tracing::debug!(source = %self.id, "no location, skipping region guess");
            return Ok(SourceResult::not_found(self.id.clone()));
        }

        let base = if self.validate { 0.45 } else { 0.3 };
        let phones = vec![PhoneCandidate::new(
            Self::format_for_region(&query.location),
            jitter(base, 0.05),
        )];

        Ok(SourceResult {
            source: self.id.clone(),
            emails: Vec::new(),
            phones,
            social_profiles: Vec::new(),
            found: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_region_format_us() {
        let source = PhoneValidationSource::new(true);
        let query = ContactQuery::new("Ada Lovelace").with_location("San Francisco, USA");
        let cancel = CancellationToken::new();

        let result = source.lookup(&query, &cancel).await.expect("lookup");
        assert!(result.found);
        assert_eq!(result.phones.len(), 1);
        assert!(result.phones[0].number.starts_with("+1 ("));
    }

    #[tokio::test]
    async fn test_region_format_uk() {
        let source = PhoneValidationSource::new(true);
        let query = ContactQuery::new("Ada Lovelace").with_location("London, United Kingdom");
        let cancel = CancellationToken::new();

        let result = source.lookup(&query, &cancel).await.expect("lookup");
        assert!(result.phones[0].number.starts_with("+44"));
    }

    #[tokio::test]
    async fn test_not_found_without_location() {
        let source = PhoneValidationSource::new(true);
        let query = ContactQuery::new("Ada Lovelace");
        let cancel = CancellationToken::new();

        let result = source.lookup(&query, &cancel).await.expect("lookup");
        assert!(!result.found);
        assert!(result.phones.is_empty());
    }
}
