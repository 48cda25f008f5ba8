//! Demori Local Store
//!
//! `SQLite` persistence for the contact engine: short-term result cache,
//! append-only search history, the durable pending-write queue, and a
//! schema-less settings bucket. Uses `SQLx` with embedded migrations.
//!
//! # Example
//!
//! ```ignore
//! use demori_store::Store;
//!
//! let store = Store::open("demori.db").await?;
//! ```
//!
//! All readers tolerate missing rows: a cache miss, an empty history, and
//! an absent settings key are normal states, not errors.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cache;
pub mod connection;
pub mod error;
pub mod history;
pub mod migrations;
pub mod queue;
pub mod settings;

pub use connection::StorePool;
pub use error::{Result, StoreError};
pub use history::HistoryEntry;
pub use queue::{PendingWrite, WriteKind};

use std::path::Path;

/// High-level store interface with migrations applied.
#[derive(Debug)]
pub struct Store {
    pool: StorePool,
}

impl Store {
    /// Open (or create) the store at the given path and run migrations.
    ///
    /// # Errors
    /// Returns `StoreError` if the database cannot be opened or a
    /// migration fails.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let pool = StorePool::new(path).await?;
        migrations::run_migrations(pool.pool()).await?;
        Ok(Self { pool })
    }

    /// Open an in-memory store with migrations applied. Used in tests and
    /// demos.
    ///
    /// # Errors
    /// Returns `StoreError` if the database cannot be opened or a
    /// migration fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = StorePool::in_memory().await?;
        migrations::run_migrations(pool.pool()).await?;
        Ok(Self { pool })
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        self.pool.pool()
    }

    /// Get the current schema version.
    ///
    /// # Errors
    /// Returns `StoreError` if the version cannot be queried.
    pub async fn schema_version(&self) -> Result<i64> {
        migrations::get_schema_version(self.pool.pool()).await
    }

    /// Close the store gracefully.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_runs_migrations() {
        let store = Store::in_memory().await.expect("create store");
        let version = store.schema_version().await.expect("schema version");
        assert!(version >= 1);
    }

    #[tokio::test]
    async fn test_open_file_store() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let path = tmp.path().join("demori.db");

        let store = Store::open(&path).await.expect("open store");
        assert!(path.exists());
        store.close().await;

        // Reopening is fine; migrations are idempotent
        let store = Store::open(&path).await.expect("reopen store");
        store.close().await;
    }
}
