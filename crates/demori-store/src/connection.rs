//! Database connection management.
//!
//! Provides a `StorePool` wrapper around a `SQLx` SQLite pool with
//! sensible defaults for the engine's single-writer access pattern.

use crate::error::{Result, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;

/// SQLite connection pool for the local store.
#[derive(Debug)]
pub struct StorePool {
    pool: Pool<Sqlite>,
}

impl StorePool {
    /// Open (or create) a database at the given path.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    ///
    /// # Errors
    /// Returns `StoreError::Open` if the database cannot be opened.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path_str = path
            .as_ref()
            .to_str()
            .ok_or_else(|| StoreError::Open("invalid database path: not valid UTF-8".to_string()))?;

        let connect_options = SqliteConnectOptions::from_str(path_str)
            .map_err(|e| StoreError::Open(format!("invalid connection string: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::Open(format!("failed to initialize pool: {e}")))?;

        tracing::info!("Store pool created at {}", path_str);

        Ok(Self { pool })
    }

    /// Open an in-memory database.
    ///
    /// The pool is limited to a single connection: a second connection to
    /// `:memory:` would see a separate empty database.
    ///
    /// # Errors
    /// Returns `StoreError::Open` if the database cannot be opened.
    pub async fn in_memory() -> Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(":memory:")
            .map_err(|e| StoreError::Open(format!("invalid connection string: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::Open(format!("failed to initialize pool: {e}")))?;

        Ok(Self { pool })
    }

    /// Get a reference to the underlying `SQLx` pool.
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close the connection pool gracefully.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::info!("Store pool closed");
    }
}
