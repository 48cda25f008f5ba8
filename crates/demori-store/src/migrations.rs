//! Database migration management.
//!
//! Embeds SQL migrations and provides functions to apply them automatically.
//! Uses `SQLx`'s built-in migration support with compile-time embedding.

use crate::error::{Result, StoreError};
use sqlx::{Pool, Sqlite};

/// Run all pending database migrations.
///
/// Applies any migrations in the `migrations/` directory that haven't been
/// applied yet, tracked in the `_sqlx_migrations` table.
///
/// # Errors
/// Returns `StoreError::Migration` if any migration fails to execute.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    tracing::info!("Running store migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| StoreError::Migration(format!("migration execution failed: {e}")))?;

    tracing::info!("Store migrations completed");
    Ok(())
}

/// Get the current schema version.
///
/// Returns the highest applied migration version, or 0 if no migrations
/// have been applied yet.
///
/// # Errors
/// Returns `StoreError` if the migrations table cannot be queried.
pub async fn get_schema_version(pool: &Pool<Sqlite>) -> Result<i64> {
    let table_exists = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?
        > 0;

    if !table_exists {
        return Ok(0);
    }

    let version =
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(version), 0) FROM _sqlx_migrations")
            .fetch_optional(pool)
            .await?
            .unwrap_or(0);

    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::StorePool;

    #[tokio::test]
    async fn test_run_migrations() {
        let pool = StorePool::in_memory().await.expect("create pool");

        run_migrations(pool.pool()).await.expect("run migrations");

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name"
        )
        .fetch_all(pool.pool())
        .await
        .expect("query tables");

        assert_eq!(
            tables,
            vec![
                "contact_cache",
                "pending_writes",
                "search_history",
                "settings"
            ]
        );
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let pool = StorePool::in_memory().await.expect("create pool");

        run_migrations(pool.pool())
            .await
            .expect("first migration run");
        run_migrations(pool.pool())
            .await
            .expect("second migration run should be idempotent");

        let version = get_schema_version(pool.pool()).await.expect("get version");
        assert_eq!(version, 1);
    }

    #[tokio::test]
    async fn test_schema_version_before_migrations() {
        let pool = StorePool::in_memory().await.expect("create pool");
        let version = get_schema_version(pool.pool()).await.expect("get version");
        assert_eq!(version, 0);
    }
}
