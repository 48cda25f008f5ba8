//! Durable queue for writes that failed to reach the remote store.
//!
//! Rows are appended by the remote client when a save fails after retries
//! and drained by its sync pass. Only the sync pass flips `synced`; the
//! server-assigned id is recorded alongside for later reconciliation.

use crate::error::{Result, StoreError};
use chrono::Utc;
use serde_json::Value;
use sqlx::{Pool, Row, Sqlite};
use std::fmt;

/// What kind of record a pending write carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// An aggregated contact profile
    Contact,
    /// A search history record
    Search,
}

impl WriteKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Search => "search",
        }
    }

    fn parse(s: &str) -> Result<Self> {
        match s {
            "contact" => Ok(Self::Contact),
            "search" => Ok(Self::Search),
            other => Err(StoreError::Serialization(format!(
                "unknown pending write kind '{other}'"
            ))),
        }
    }
}

impl fmt::Display for WriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A queued write awaiting sync to the remote store.
#[derive(Debug, Clone)]
pub struct PendingWrite {
    /// Unique identifier (local)
    pub id: String,
    /// Record kind
    pub kind: WriteKind,
    /// JSON payload of the record
    pub payload: Value,
    /// Whether a sync pass has pushed this row to the remote store
    pub synced: bool,
    /// Server-assigned id, set when synced
    pub remote_id: Option<String>,
    /// When the row was queued (RFC3339 timestamp)
    pub created_at: String,
}

/// Queue a new pending write.
///
/// # Errors
/// Returns `StoreError` if serialization or the insert fails.
pub async fn enqueue(pool: &Pool<Sqlite>, kind: WriteKind, payload: &Value) -> Result<PendingWrite> {
    let write = PendingWrite {
        id: uuid::Uuid::new_v4().to_string(),
        kind,
        payload: payload.clone(),
        synced: false,
        remote_id: None,
        created_at: Utc::now().to_rfc3339(),
    };

    let payload_str = serde_json::to_string(payload)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    sqlx::query(
        r"
        INSERT INTO pending_writes (id, kind, payload, synced, created_at)
        VALUES (?, ?, ?, 0, ?)
        ",
    )
    .bind(&write.id)
    .bind(kind.as_str())
    .bind(payload_str)
    .bind(&write.created_at)
    .execute(pool)
    .await?;

    tracing::debug!(id = %write.id, kind = %kind, "queued pending write");

    Ok(write)
}

/// Get all unsynced pending writes, oldest first.
///
/// # Errors
/// Returns `StoreError` if the query fails.
pub async fn unsynced(pool: &Pool<Sqlite>) -> Result<Vec<PendingWrite>> {
    let rows = sqlx::query(
        r"
        SELECT id, kind, payload, synced, remote_id, created_at
        FROM pending_writes
        WHERE synced = 0
        ORDER BY created_at ASC
        ",
    )
    .fetch_all(pool)
    .await?;

    let mut writes = Vec::with_capacity(rows.len());
    for row in rows {
        let kind: String = row.try_get("kind")?;
        let payload: String = row.try_get("payload")?;
        writes.push(PendingWrite {
            id: row.try_get("id")?,
            kind: WriteKind::parse(&kind)?,
            payload: serde_json::from_str(&payload)
                .map_err(|e| StoreError::Serialization(e.to_string()))?,
            synced: row.try_get::<i64, _>("synced")? != 0,
            remote_id: row.try_get("remote_id")?,
            created_at: row.try_get("created_at")?,
        });
    }

    Ok(writes)
}

/// Mark a pending write as synced, recording the server-assigned id.
///
/// # Errors
/// Returns `StoreError::NotFound` if no row with that id exists.
pub async fn mark_synced(pool: &Pool<Sqlite>, id: &str, remote_id: Option<&str>) -> Result<()> {
    let result = sqlx::query("UPDATE pending_writes SET synced = 1, remote_id = ? WHERE id = ?")
        .bind(remote_id)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }

    Ok(())
}

/// Number of unsynced rows still in the queue.
///
/// # Errors
/// Returns `StoreError` if the query fails.
pub async fn pending_count(pool: &Pool<Sqlite>) -> Result<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pending_writes WHERE synced = 0")
            .fetch_one(pool)
            .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;

    #[tokio::test]
    async fn test_enqueue_and_list_unsynced() {
        let store = Store::in_memory().await.expect("create store");

        let payload = serde_json::json!({"name": "Ada Lovelace"});
        let write = enqueue(store.pool(), WriteKind::Contact, &payload)
            .await
            .expect("enqueue write");

        assert!(!write.synced);

        let writes = unsynced(store.pool()).await.expect("list unsynced");
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].kind, WriteKind::Contact);
        assert_eq!(writes[0].payload, payload);
    }

    #[tokio::test]
    async fn test_mark_synced_removes_from_unsynced() {
        let store = Store::in_memory().await.expect("create store");

        let payload = serde_json::json!({"query": "test"});
        let write = enqueue(store.pool(), WriteKind::Search, &payload)
            .await
            .expect("enqueue write");

        mark_synced(store.pool(), &write.id, Some("srv-42"))
            .await
            .expect("mark synced");

        let writes = unsynced(store.pool()).await.expect("list unsynced");
        assert!(writes.is_empty());

        let remaining = pending_count(store.pool()).await.expect("count pending");
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_mark_synced_unknown_id() {
        let store = Store::in_memory().await.expect("create store");
        let result = mark_synced(store.pool(), "no-such-id", None).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_unsynced_oldest_first() {
        let store = Store::in_memory().await.expect("create store");

        let first = enqueue(store.pool(), WriteKind::Contact, &serde_json::json!({"n": 1}))
            .await
            .expect("enqueue first");
        let second = enqueue(store.pool(), WriteKind::Contact, &serde_json::json!({"n": 2}))
            .await
            .expect("enqueue second");

        let writes = unsynced(store.pool()).await.expect("list unsynced");
        assert_eq!(writes[0].id, first.id);
        assert_eq!(writes[1].id, second.id);
    }
}
