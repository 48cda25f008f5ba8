//! Email verification.

use crate::adapters::{jitter, simulate_latency};
use crate::error::Result;
use crate::source::{company_domain, name_tokens, ContactSource};
use async_trait::async_trait;
use demori_core::{ContactQuery, EmailCandidate, SourceId, SourceResult};
use rand::Rng;
use tokio_util::sync::CancellationToken;

/// Simulated rate at which the primary pattern address verifies cleanly.
const VERIFY_RATE: f64 = 0.8;

/// Verifies the most likely pattern address for the company domain.
///
/// Stands in for an SMTP-level mailbox probe; when verification is
/// disabled in settings the candidate is still emitted but never marked
/// verified.
pub struct EmailVerificationSource {
    id: SourceId,
    verify: bool,
}

impl EmailVerificationSource {
    /// Stable identifier of this source.
    pub const ID: &'static str = "email-verification";

    /// Create the source. `verify` mirrors the `email_verification`
    /// setting.
    #[must_use]
    pub fn new(verify: bool) -> Self {
        Self {
            id: SourceId::new(Self::ID).expect("valid source id"),
            verify,
        }
    }
}

#[async_trait]
impl ContactSource for EmailVerificationSource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    fn display_name(&self) -> &'static str {
        "Email Verification"
    }

    async fn lookup(
        &self,
        query: &ContactQuery,
        cancel: &CancellationToken,
    ) -> Result<SourceResult> {
        simulate_latency(&self.id, cancel).await?;

        let (Some((first, last)), Some(domain)) = (name_tokens(query), company_domain(query))
        else {
            return Ok(SourceResult::not_found(self.id.clone()));
        };

        let mut candidate = EmailCandidate::new(
            format!("{first}.{last}@{domain}"),
            jitter(0.85, 0.05),
        );

        if self.verify && rand::thread_rng().gen_bool(VERIFY_RATE) {
            candidate = candidate.verified();
        }

        Ok(SourceResult {
            source: self.id.clone(),
            emails: vec![candidate],
            phones: Vec::new(),
            social_profiles: Vec::new(),
            found: true,
        })
    }
}
