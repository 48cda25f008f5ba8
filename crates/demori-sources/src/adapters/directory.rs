//! Professional directory lookups.

use crate::adapters::{jitter, simulate_latency};
use crate::error::Result;
use crate::source::{company_domain, name_tokens, ContactSource};
use async_trait::async_trait;
use demori_core::{ContactQuery, EmailCandidate, SocialProfile, SourceId, SourceResult};
use rand::Rng;
use tokio_util::sync::CancellationToken;

/// Simulated hit rate of a directory listing lookup.
const LISTING_HIT_RATE: f64 = 0.7;

/// Looks the person up in professional directory listings.
///
/// Directories index by name and employer, so a listing yields both a
/// profile URL and a lower-confidence work email.
pub struct DirectorySource {
    id: SourceId,
}

impl DirectorySource {
    /// Stable identifier of this source.
    pub const ID: &'static str = "professional-directory";

    /// Create the source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SourceId::new(Self::ID).expect("valid source id"),
        }
    }
}

impl Default for DirectorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactSource for DirectorySource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    fn display_name(&self) -> &'static str {
        "Professional Directories"
    }

    async fn lookup(
        &self,
        query: &ContactQuery,
        cancel: &CancellationToken,
    ) -> Result<SourceResult> {
        simulate_latency(&self.id, cancel).await?;

        let Some((first, last)) = name_tokens(query) else {
            return Ok(SourceResult::not_found(self.id.clone()));
        };

        if !rand::thread_rng().gen_bool(LISTING_HIT_RATE) {
            tracing::debug!(source = %self.id, "no directory listing");
            return Ok(SourceResult::not_found(self.id.clone()));
        }

        // Listings that carry a matching job title are better matches
        let title_boost = if query.title == demori_core::types::UNKNOWN_FIELD {
            0.0
        } else {
            0.05
        };

        let social_profiles = vec![SocialProfile::new(
            "directory",
            format!("https://directory.demori.app/p/{first}-{last}"),
            jitter(0.65 + title_boost, 0.05),
        )];

        let emails = company_domain(query)
            .map(|domain| {
                vec![EmailCandidate::new(
                    format!("{first}{last}@{domain}"),
                    jitter(0.6 + title_boost, 0.05),
                )]
            })
            .unwrap_or_default();

        Ok(SourceResult {
            source: self.id.clone(),
            emails,
            phones: Vec::new(),
            social_profiles,
            found: true,
        })
    }
}
