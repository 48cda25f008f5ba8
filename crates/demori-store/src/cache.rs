//! Short-term result cache keyed by normalized `name_company`.
//!
//! Entries are overwritten on identical-key searches. Lookups are
//! TTL-aware: an expired row is treated as a miss and left in place for
//! `purge_expired` to remove.

use crate::error::{Result, StoreError};
use chrono::Utc;
use demori_core::{AggregatedProfile, Timestamp};
use sqlx::{Pool, Sqlite};
use std::time::Duration;

/// Insert or overwrite the cached profile for a key.
///
/// # Errors
/// Returns `StoreError` if serialization or the upsert fails.
pub async fn put_profile(
    pool: &Pool<Sqlite>,
    key: &str,
    profile: &AggregatedProfile,
) -> Result<()> {
    let payload = serde_json::to_string(profile)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    sqlx::query(
        r"
        INSERT INTO contact_cache (key, profile, written_at)
        VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET
            profile = excluded.profile,
            written_at = excluded.written_at
        ",
    )
    .bind(key)
    .bind(payload)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Look up an unexpired cached profile for a key.
///
/// Returns `None` on a miss or when the entry is older than `ttl`.
///
/// # Errors
/// Returns `StoreError` if the query or deserialization fails.
pub async fn get_profile(
    pool: &Pool<Sqlite>,
    key: &str,
    ttl: Duration,
) -> Result<Option<AggregatedProfile>> {
    let row: Option<(String, String)> = sqlx::query_as(
        r"
        SELECT profile, written_at
        FROM contact_cache
        WHERE key = ?
        ",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    let Some((payload, written_at)) = row else {
        return Ok(None);
    };

    let written_at = Timestamp::from_rfc3339(&written_at)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    if written_at.age_secs() > ttl.as_secs() {
        tracing::debug!(key, "cache entry expired");
        return Ok(None);
    }

    let profile: AggregatedProfile =
        serde_json::from_str(&payload).map_err(|e| StoreError::Serialization(e.to_string()))?;

    Ok(Some(profile))
}

/// Delete all entries older than `ttl`. Returns the number of rows removed.
///
/// # Errors
/// Returns `StoreError` if the delete fails.
pub async fn purge_expired(pool: &Pool<Sqlite>, ttl: Duration) -> Result<u64> {
    let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    let cutoff = (Utc::now() - chrono::Duration::seconds(ttl_secs)).to_rfc3339();

    let result = sqlx::query("DELETE FROM contact_cache WHERE written_at < ?")
        .bind(cutoff)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
