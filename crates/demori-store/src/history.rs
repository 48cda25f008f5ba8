//! Append-only search history.
//!
//! Every completed live search appends one row. At write time the table is
//! truncated to the most recent `MAX_ENTRIES`, oldest discarded first.

use crate::error::Result;
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};

/// Maximum number of history rows kept.
pub const MAX_ENTRIES: i64 = 100;

/// A recorded search.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HistoryEntry {
    /// Unique identifier
    pub id: String,
    /// When the search ran (RFC3339 timestamp)
    pub recorded_at: String,
    /// Queried name
    pub name: String,
    /// Queried company
    pub company: String,
    /// Number of email candidates in the result
    pub email_count: i64,
    /// Number of phone candidates in the result
    pub phone_count: i64,
    /// Number of social profiles in the result
    pub social_count: i64,
    /// Overall confidence of the result
    pub confidence: f64,
}

/// Append a history entry and truncate to the most recent `MAX_ENTRIES`.
///
/// # Errors
/// Returns `StoreError` if the insert or truncation fails.
#[allow(clippy::cast_possible_wrap)]
pub async fn append(
    pool: &Pool<Sqlite>,
    name: &str,
    company: &str,
    email_count: usize,
    phone_count: usize,
    social_count: usize,
    confidence: f64,
) -> Result<HistoryEntry> {
    let entry = HistoryEntry {
        id: uuid::Uuid::new_v4().to_string(),
        recorded_at: Utc::now().to_rfc3339(),
        name: name.to_string(),
        company: company.to_string(),
        email_count: email_count as i64,
        phone_count: phone_count as i64,
        social_count: social_count as i64,
        confidence,
    };

    sqlx::query(
        r"
        INSERT INTO search_history
            (id, recorded_at, name, company, email_count, phone_count, social_count, confidence)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(&entry.id)
    .bind(&entry.recorded_at)
    .bind(&entry.name)
    .bind(&entry.company)
    .bind(entry.email_count)
    .bind(entry.phone_count)
    .bind(entry.social_count)
    .bind(entry.confidence)
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        DELETE FROM search_history
        WHERE id NOT IN (
            SELECT id FROM search_history
            ORDER BY recorded_at DESC, id DESC
            LIMIT ?
        )
        ",
    )
    .bind(MAX_ENTRIES)
    .execute(pool)
    .await?;

    Ok(entry)
}

/// Get the most recent history entries, newest first.
///
/// # Errors
/// Returns `StoreError` if the query fails.
pub async fn recent(pool: &Pool<Sqlite>, limit: i64) -> Result<Vec<HistoryEntry>> {
    let rows = sqlx::query(
        r"
        SELECT id, recorded_at, name, company, email_count, phone_count, social_count, confidence
        FROM search_history
        ORDER BY recorded_at DESC, id DESC
        LIMIT ?
        ",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        entries.push(HistoryEntry {
            id: row.try_get("id")?,
            recorded_at: row.try_get("recorded_at")?,
            name: row.try_get("name")?,
            company: row.try_get("company")?,
            email_count: row.try_get("email_count")?,
            phone_count: row.try_get("phone_count")?,
            social_count: row.try_get("social_count")?,
            confidence: row.try_get("confidence")?,
        });
    }

    Ok(entries)
}

/// Total number of history rows.
///
/// # Errors
/// Returns `StoreError` if the query fails.
pub async fn count(pool: &Pool<Sqlite>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM search_history")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;

    #[tokio::test]
    async fn test_append_and_recent() {
        let store = Store::in_memory().await.expect("create store");

        append(store.pool(), "Ada Lovelace", "Acme Corp", 2, 1, 0, 0.85)
            .await
            .expect("append entry");

        let entries = recent(store.pool(), 10).await.expect("read history");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Ada Lovelace");
        assert_eq!(entries[0].email_count, 2);
        assert!((entries[0].confidence - 0.85).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_truncates_to_max_entries() {
        let store = Store::in_memory().await.expect("create store");

        for i in 0..110 {
            append(store.pool(), &format!("Person {i}"), "Unknown", 0, 0, 0, 0.0)
                .await
                .expect("append entry");
        }

        let total = count(store.pool()).await.expect("count history");
        assert_eq!(total, MAX_ENTRIES);

        // The oldest entries were the ones discarded
        let entries = recent(store.pool(), MAX_ENTRIES).await.expect("read history");
        assert!(entries.iter().all(|e| e.name != "Person 0"));
        assert!(entries.iter().any(|e| e.name == "Person 109"));
    }

    #[tokio::test]
    async fn test_recent_is_newest_first() {
        let store = Store::in_memory().await.expect("create store");

        append(store.pool(), "First", "Unknown", 0, 0, 0, 0.0)
            .await
            .expect("append first");
        append(store.pool(), "Second", "Unknown", 0, 0, 0, 0.0)
            .await
            .expect("append second");

        let entries = recent(store.pool(), 2).await.expect("read history");
        assert_eq!(entries[0].name, "Second");
        assert_eq!(entries[1].name, "First");
    }
}
