//! Pure aggregation of per-source results into one ranked profile.
//!
//! Deduplication is first-seen-wins over the input order, which the
//! orchestrator keeps equal to registry declaration order. The surviving
//! candidate keeps its own confidence; duplicates are dropped, never
//! merged.

use demori_core::{AggregatedProfile, ContactQuery, SourceResult, Timestamp};
use std::collections::HashSet;

/// Weight of the email category in the overall confidence.
pub const EMAIL_WEIGHT: f64 = 0.4;
/// Weight of the phone category in the overall confidence.
pub const PHONE_WEIGHT: f64 = 0.3;
/// Weight of the social category in the overall confidence.
pub const SOCIAL_WEIGHT: f64 = 0.3;

/// Merge per-source results into a deduplicated, ranked profile.
///
/// Pure function: same inputs always produce the same candidate lists and
/// confidence (only `last_updated` is taken from the clock).
#[must_use]
pub fn aggregate(query: &ContactQuery, results: &[SourceResult]) -> AggregatedProfile {
    let mut emails = Vec::new();
    let mut phones = Vec::new();
    let mut social_profiles = Vec::new();
    let mut sources = Vec::new();

    let mut seen_emails = HashSet::new();
    let mut seen_phones = HashSet::new();
    let mut seen_social = HashSet::new();

    for result in results {
        if result.found {
            sources.push(result.source.clone());
        }

        for email in &result.emails {
            if seen_emails.insert(email.dedup_key()) {
                emails.push(email.clone());
            }
        }
        for phone in &result.phones {
            if seen_phones.insert(phone.dedup_key()) {
                phones.push(phone.clone());
            }
        }
        for profile in &result.social_profiles {
            if seen_social.insert(profile.dedup_key()) {
                social_profiles.push(profile.clone());
            }
        }
    }

    emails.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    phones.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    social_profiles.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let confidence = overall_confidence(
        emails.first().map(|e| e.confidence),
        phones.first().map(|p| p.confidence),
        social_profiles.first().map(|s| s.confidence),
    );

    AggregatedProfile {
        query: query.clone(),
        emails,
        phones,
        social_profiles,
        sources,
        confidence,
        partial: false,
        last_updated: Timestamp::now(),
    }
}

/// Weighted mean over the non-empty categories' top confidences.
///
/// Empty categories contribute no weight; all empty yields zero.
#[must_use]
pub fn overall_confidence(
    top_email: Option<f64>,
    top_phone: Option<f64>,
    top_social: Option<f64>,
) -> f64 {
    let mut weighted = 0.0;
    let mut weight = 0.0;

    for (top, w) in [
        (top_email, EMAIL_WEIGHT),
        (top_phone, PHONE_WEIGHT),
        (top_social, SOCIAL_WEIGHT),
    ] {
        if let Some(top) = top {
            weighted += top * w;
            weight += w;
        }
    }

    if weight == 0.0 {
        0.0
    } else {
        (weighted / weight).clamp(0.0, 1.0)
    }
}
