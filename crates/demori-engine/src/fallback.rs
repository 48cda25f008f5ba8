//! Best-effort predicted profile for searches that found nothing.

use demori_core::{AggregatedProfile, ContactQuery, EmailCandidate, Timestamp};
use demori_sources::source::{company_domain, name_tokens};

/// Confidence assigned to the single predicted email.
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Domain used when the query carries no usable company.
const FALLBACK_DOMAIN: &str = "example.com";

/// Build a low-confidence predicted profile for a query.
///
/// The profile carries exactly one predicted email in the
/// `first.last@domain` pattern (deterministic, no jitter) and is flagged
/// `partial` so callers can tell it apart from discovered data. Names
/// with no alphanumeric content produce an empty partial profile.
#[must_use]
pub fn fallback_profile(query: &ContactQuery) -> AggregatedProfile {
    let emails = match name_tokens(query) {
        Some((first, last)) => {
            let domain =
                company_domain(query).unwrap_or_else(|| FALLBACK_DOMAIN.to_string());
            vec![EmailCandidate::new(
                format!("{first}.{last}@{domain}"),
                FALLBACK_CONFIDENCE,
            )]
        }
        None => Vec::new(),
    };

    let confidence = if emails.is_empty() {
        0.0
    } else {
        FALLBACK_CONFIDENCE
    };

    AggregatedProfile {
        query: query.clone(),
        emails,
        phones: Vec::new(),
        social_profiles: Vec::new(),
        sources: Vec::new(),
        confidence,
        partial: true,
        last_updated: Timestamp::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_predicts_company_email() {
        let query = ContactQuery::new("Ahmed Rashid").with_company("Acme Corp");
        let profile = fallback_profile(&query);

        assert!(profile.partial);
        assert_eq!(profile.emails.len(), 1);
        assert_eq!(profile.emails[0].address, "ahmed.rashid@acmecorp.com");
        assert!((profile.confidence - FALLBACK_CONFIDENCE).abs() < f64::EPSILON);
        assert!(profile.sources.is_empty());
    }

    #[test]
    fn test_fallback_without_company_uses_placeholder_domain() {
        let query = ContactQuery::new("Ada Lovelace");
        let profile = fallback_profile(&query);

        assert_eq!(profile.emails[0].address, "ada.lovelace@example.com");
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let query = ContactQuery::new("Ada Lovelace").with_company("Acme Corp");
        let a = fallback_profile(&query);
        let b = fallback_profile(&query);
        assert_eq!(a.emails, b.emails);
    }

    #[test]
    fn test_unusable_name_yields_empty_partial() {
        let query = ContactQuery::new("  ...  ");
        let profile = fallback_profile(&query);

        assert!(profile.partial);
        assert!(profile.is_empty());
        assert_eq!(profile.confidence, 0.0);
    }
}
