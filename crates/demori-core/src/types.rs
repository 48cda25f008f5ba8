//! Shared types used across the Demori contact engine.
//!
//! This module defines the domain vocabulary: the immutable search query,
//! the per-source partial results, and the merged aggregated profile.

use crate::error::DemoriError;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used for query fields the caller did not supply.
pub const UNKNOWN_FIELD: &str = "Unknown";

static SOURCE_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,48}[a-z0-9]$").expect("valid regex"));

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Newtype for source adapter identifiers with validation.
///
/// Source IDs must be lowercase alphanumeric with hyphens, 3-50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    /// Create a new `SourceId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID doesn't match the required format.
    pub fn new(id: impl Into<String>) -> Result<Self, DemoriError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<(), DemoriError> {
        if id.len() < 3 || id.len() > 50 {
            return Err(DemoriError::Validation(format!(
                "invalid source ID: must be 3-50 characters, got {} characters",
                id.len()
            )));
        }

        if SOURCE_ID_REGEX.is_match(id) {
            Ok(())
        } else {
            Err(DemoriError::Validation(format!(
                "invalid source ID: must be lowercase alphanumeric with hyphens, got '{id}'"
            )))
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a `DateTime<Utc>`.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse a timestamp from an RFC3339 string.
    pub fn from_rfc3339(s: &str) -> Result<Self, DemoriError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| DemoriError::Validation(format!("invalid timestamp: {e}")))
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Get seconds since Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }

    /// Age of this timestamp relative to now, in whole seconds.
    ///
    /// Timestamps in the future report an age of zero.
    #[must_use]
    pub fn age_secs(&self) -> u64 {
        let delta = Utc::now().signed_duration_since(self.0).num_seconds();
        u64::try_from(delta).unwrap_or(0)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

/// A contact search query.
///
/// `name` is required; the remaining fields default to [`UNKNOWN_FIELD`].
/// Queries are treated as immutable once submitted to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactQuery {
    /// Full name of the person to search for
    pub name: String,
    /// Employer/company, or "Unknown"
    pub company: String,
    /// Job title, or "Unknown"
    pub title: String,
    /// Location, or "Unknown"
    pub location: String,
}

impl Default for ContactQuery {
    fn default() -> Self {
        Self {
            name: String::new(),
            company: UNKNOWN_FIELD.to_string(),
            title: UNKNOWN_FIELD.to_string(),
            location: UNKNOWN_FIELD.to_string(),
        }
    }
}

impl ContactQuery {
    /// Create a query for the given name with all other fields unknown.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the company.
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    /// Set the job title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Validate the query.
    ///
    /// # Errors
    /// Returns `DemoriError::InvalidQuery` if the name is empty or whitespace.
    pub fn validate(&self) -> Result<(), DemoriError> {
        if self.name.trim().is_empty() {
            return Err(DemoriError::InvalidQuery(
                "name is required and must be non-empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the company field carries real data.
    #[must_use]
    pub fn has_company(&self) -> bool {
        !self.company.trim().is_empty() && self.company != UNKNOWN_FIELD
    }

    /// Whether the location field carries real data.
    #[must_use]
    pub fn has_location(&self) -> bool {
        !self.location.trim().is_empty() && self.location != UNKNOWN_FIELD
    }

    /// Cache key for this query: normalized lowercase `name_company`.
    ///
    /// Internal whitespace is collapsed so "Ada  Lovelace" and "Ada Lovelace"
    /// share a cache entry.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let name = Self::normalize(&self.name);
        let company = Self::normalize(&self.company);
        format!("{name}_{company}")
    }

    fn normalize(field: &str) -> String {
        WHITESPACE_REGEX
            .replace_all(field.trim(), " ")
            .to_lowercase()
    }
}

/// An email address candidate with its estimated correctness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailCandidate {
    /// The email address
    pub address: String,
    /// Estimated correctness in [0,1]
    pub confidence: f64,
    /// Whether a verification source vouched for this address
    pub verified: bool,
}

impl EmailCandidate {
    /// Create a new candidate. Confidence is clamped to [0,1].
    #[must_use]
    pub fn new(address: impl Into<String>, confidence: f64) -> Self {
        Self {
            address: address.into(),
            confidence: confidence.clamp(0.0, 1.0),
            verified: false,
        }
    }

    /// Mark the candidate as verified.
    #[must_use]
    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    /// Natural deduplication key (case-insensitive address).
    #[must_use]
    pub fn dedup_key(&self) -> String {
        self.address.trim().to_lowercase()
    }
}

/// A phone number candidate with its estimated correctness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneCandidate {
    /// The phone number in display format
    pub number: String,
    /// Estimated correctness in [0,1]
    pub confidence: f64,
}

impl PhoneCandidate {
    /// Create a new candidate. Confidence is clamped to [0,1].
    #[must_use]
    pub fn new(number: impl Into<String>, confidence: f64) -> Self {
        Self {
            number: number.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Natural deduplication key (digits only).
    #[must_use]
    pub fn dedup_key(&self) -> String {
        self.number.chars().filter(char::is_ascii_digit).collect()
    }
}

/// A social profile candidate with its estimated correctness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialProfile {
    /// Platform name (e.g., "linkedin")
    pub platform: String,
    /// Profile URL
    pub url: String,
    /// Estimated correctness in [0,1]
    pub confidence: f64,
}

impl SocialProfile {
    /// Create a new candidate. Confidence is clamped to [0,1].
    #[must_use]
    pub fn new(platform: impl Into<String>, url: impl Into<String>, confidence: f64) -> Self {
        Self {
            platform: platform.into(),
            url: url.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Natural deduplication key (trimmed URL, trailing slash removed).
    #[must_use]
    pub fn dedup_key(&self) -> String {
        self.url.trim().trim_end_matches('/').to_lowercase()
    }
}

/// Partial contact data produced by one source adapter invocation.
///
/// Owned by the aggregator once the adapter returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceResult {
    /// Which adapter produced this result
    pub source: SourceId,
    /// Email candidates
    pub emails: Vec<EmailCandidate>,
    /// Phone candidates
    pub phones: Vec<PhoneCandidate>,
    /// Social profile candidates
    pub social_profiles: Vec<SocialProfile>,
    /// Whether the source considers itself to have found the person
    pub found: bool,
}

impl SourceResult {
    /// Create an empty not-found result for a source.
    #[must_use]
    pub fn not_found(source: SourceId) -> Self {
        Self {
            source,
            emails: Vec::new(),
            phones: Vec::new(),
            social_profiles: Vec::new(),
            found: false,
        }
    }

    /// Whether this result carries no candidate data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.social_profiles.is_empty()
    }
}

/// The merged, deduplicated, ranked profile returned by a search.
///
/// Invariant: each candidate list is deduplicated by its natural key and
/// sorted descending by confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedProfile {
    /// Echo of the query that produced this profile
    pub query: ContactQuery,
    /// Deduplicated email candidates, best first
    pub emails: Vec<EmailCandidate>,
    /// Deduplicated phone candidates, best first
    pub phones: Vec<PhoneCandidate>,
    /// Deduplicated social profiles, best first
    pub social_profiles: Vec<SocialProfile>,
    /// Adapters that reported `found = true`
    pub sources: Vec<SourceId>,
    /// Overall confidence in [0,1]
    pub confidence: f64,
    /// True for best-effort fallback profiles
    #[serde(default)]
    pub partial: bool,
    /// When this profile was assembled
    pub last_updated: Timestamp,
}

impl AggregatedProfile {
    /// Total number of candidate items across all categories.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.emails.len() + self.phones.len() + self.social_profiles.len()
    }

    /// Whether the profile carries any candidate data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

/// Where a search result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOrigin {
    /// Served from the local result cache
    Cache,
    /// Served by the remote contact store
    Remote,
    /// Assembled from a live adapter fan-out
    LiveSearch,
    /// Best-effort predicted profile (no source produced data)
    Fallback,
}

impl fmt::Display for SearchOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Cache => "cache",
            Self::Remote => "remote",
            Self::LiveSearch => "live_search",
            Self::Fallback => "fallback",
        };
        write!(f, "{s}")
    }
}
