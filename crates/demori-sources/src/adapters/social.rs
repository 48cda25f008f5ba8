//! Social platform handle guessing.

use crate::adapters::{jitter, simulate_latency};
use crate::error::Result;
use crate::source::{name_tokens, ContactSource};
use async_trait::async_trait;
use demori_core::{ContactQuery, SocialProfile, SourceId, SourceResult};
use tokio_util::sync::CancellationToken;

/// Guesses profile URLs from common handle conventions per platform.
pub struct SocialPlatformsSource {
    id: SourceId,
}

impl SocialPlatformsSource {
    /// Stable identifier of this source.
    pub const ID: &'static str = "social-platforms";

    /// Create the source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SourceId::new(Self::ID).expect("valid source id"),
        }
    }
}

impl Default for SocialPlatformsSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactSource for SocialPlatformsSource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    fn display_name(&self) -> &'static str {
        "Social Platforms"
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

        let social_profiles = vec![
            SocialProfile::new(
                "linkedin",
                format!("https://www.linkedin.com/in/{first}-{last}"),
                jitter(0.75, 0.05),
            ),
            SocialProfile::new(
                "x",
                format!("https://x.com/{first}{last}"),
                jitter(0.5, 0.05),
            ),
            SocialProfile::new(
                "github",
                format!("https://github.com/{first}{last}"),
                jitter(0.45, 0.05),
            ),
        ];

        Ok(SourceResult {
            source: self.id.clone(),
            emails: Vec::new(),
            phones: Vec::new(),
            social_profiles,
            found: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_guesses() {
        let source = SocialPlatformsSource::new();
        let query = ContactQuery::new("Ahmed Rashid");
        let cancel = CancellationToken::new();

        let result = source.lookup(&query, &cancel).await.expect("lookup");

        assert!(result.found);
        assert_eq!(result.social_profiles.len(), 3);
        assert_eq!(
            result.social_profiles[0].url,
            "https://www.linkedin.com/in/ahmed-rashid"
        );
        assert!(result
            .social_profiles
            .iter()
            .all(|p| (0.0..=1.0).contains(&p.confidence)));
    }

    #[tokio::test]
    async fn test_cancelled_lookup() {
        let source = SocialPlatformsSource::new();
        let query = ContactQuery::new("Ahmed Rashid");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = source.lookup(&query, &cancel).await;
        assert!(result.is_err());
    }
}
