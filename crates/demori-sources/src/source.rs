//! The contact source capability trait.

use crate::error::Result;
use demori_core::{ContactQuery, SourceId, SourceResult};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Trait for source adapters that produce partial contact data.
///
/// Implementations must be thread-safe (`Send + Sync`) and must honor the
/// cancellation token at their suspension points: a cancelled lookup
/// returns `SourceError::Cancelled` instead of data, so a timed-out search
/// never has late results leaking into the cache.
///
/// Adapters are invoked independently; an error from one never aborts its
/// siblings.
#[async_trait]
pub trait ContactSource: Send + Sync {
    /// Stable identifier for this source.
    fn id(&self) -> &SourceId;

    /// Human-readable name for logs and diagnostics.
    fn display_name(&self) -> &'static str;

    /// Attempt to produce partial contact data for a query.
    ///
    /// # Errors
    /// Returns error if the adapter cannot serve the query or was
    /// cancelled. A clean "nothing found" is `Ok` with `found = false`,
    /// not an error.
    async fn lookup(&self, query: &ContactQuery, cancel: &CancellationToken)
        -> Result<SourceResult>;
}

/// Normalize a company name into a plausible email domain.
///
/// "Acme Corp" becomes "acmecorp.com". Returns `None` when the company is
/// unknown or normalizes to nothing usable.
#[must_use]
pub fn company_domain(query: &ContactQuery) -> Option<String> {
    if !query.has_company() {
        return None;
    }

    let stem: String = query
        .company
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    if stem.is_empty() {
        None
    } else {
        Some(format!("{stem}.com"))
    }
}

/// Split a query name into lowercase (first, last) tokens.
///
/// Single-token names reuse the token as both parts. Returns `None` for
/// names with no alphanumeric content.
#[must_use]
pub fn name_tokens(query: &ContactQuery) -> Option<(String, String)> {
    let cleaned: Vec<String> = query
        .name
        .split_whitespace()
        .map(|part| {
            part.to_lowercase()
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
        })
        .filter(|part| !part.is_empty())
        .collect();

    match cleaned.as_slice() {
        [] => None,
        [only] => Some((only.clone(), only.clone())),
        [first, .., last] => Some((first.clone(), last.clone())),
    }
}
