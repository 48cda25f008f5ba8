//! Company website email pattern guessing.

use crate::adapters::{jitter, simulate_latency};
use crate::error::Result;
use crate::source::{company_domain, name_tokens, ContactSource};
use async_trait::async_trait;
use demori_core::{ContactQuery, EmailCandidate, SourceId, SourceResult};
use tokio_util::sync::CancellationToken;

/// Email patterns derived from corporate address conventions, most common
/// first. Each entry is (formatter, base confidence).
type Pattern = (fn(&str, &str, &str) -> String, f64);

const PATTERNS: [Pattern; 4] = [
    (|first, last, domain| format!("{first}.{last}@{domain}"), 0.9),
    (
        |first, last, domain| {
            let initial = first.chars().next().unwrap_or('x');
            format!("{initial}.{last}@{domain}")
        },
        0.7,
    ),
    (|first, last, domain| format!("{first}{last}@{domain}"), 0.55),
    (|first, _last, domain| format!("{first}@{domain}"), 0.4),
];

/// Guesses corporate email addresses from the company's likely domain.
///
/// A real implementation would crawl the company site for a published
/// address format; this one applies the common conventions directly.
pub struct CompanyWebsiteSource {
    id: SourceId,
    search_depth: u8,
}

impl CompanyWebsiteSource {
    /// Stable identifier of this source.
    pub const ID: &'static str = "company-website";

    /// Create the source. `search_depth` (1-3) controls how many pattern
    /// variants are emitted.
    #[must_use]
    pub fn new(search_depth: u8) -> Self {
        Self {
            id: SourceId::new(Self::ID).expect("valid source id"),
            search_depth,
        }
    }
}

#[async_trait]
impl ContactSource for CompanyWebsiteSource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    fn display_name(&self) -> &'static str {
        "Company Websites"
    }

    async fn lookup(
        &self,
        query: &ContactQuery,
        cancel: &CancellationToken,
    ) -> Result<SourceResult> {
        simulate_latency(&self.id, cancel).await?;

        let (Some((first, last)), Some(domain)) = (name_tokens(query), company_domain(query))
        else {
            tracing::debug!(source = %self.id, "no usable name/company, skipping");
            return Ok(SourceResult::not_found(self.id.clone()));
        };

        let variant_count = (usize::from(self.search_depth) + 1).min(PATTERNS.len());
        let emails: Vec<EmailCandidate> = PATTERNS[..variant_count]
            .iter()
            .map(|(format, base)| {
                EmailCandidate::new(format(&first, &last, &domain), jitter(*base, 0.03))
            })
            .collect();

        Ok(SourceResult {
            source: self.id.clone(),
            emails,
            phones: Vec::new(),
            social_profiles: Vec::new(),
            found: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pattern_emails_for_known_company() {
        let source = CompanyWebsiteSource::new(2);
        let query = ContactQuery::new("Ahmed Rashid").with_company("Acme Corp");
        let cancel = CancellationToken::new();

        let result = source.lookup(&query, &cancel).await.expect("lookup");

        assert!(result.found);
        assert_eq!(result.emails.len(), 3);
        assert_eq!(result.emails[0].address, "ahmed.rashid@acmecorp.com");
        assert_eq!(result.emails[1].address, "a.rashid@acmecorp.com");
        assert!(result.emails.iter().all(|e| (0.0..=1.0).contains(&e.confidence)));
        assert!(result.phones.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_without_company() {
        let source = CompanyWebsiteSource::new(2);
        let query = ContactQuery::new("Ahmed Rashid");
        let cancel = CancellationToken::new();

        let result = source.lookup(&query, &cancel).await.expect("lookup");
        assert!(!result.found);
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_depth_caps_variants() {
        let source = CompanyWebsiteSource::new(9);
        let query = ContactQuery::new("Ada Lovelace").with_company("Acme");
        let cancel = CancellationToken::new();

        let result = source.lookup(&query, &cancel).await.expect("lookup");
        assert_eq!(result.emails.len(), PATTERNS.len());
    }
}
