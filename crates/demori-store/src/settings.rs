//! Settings storage for engine configuration.
//!
//! Provides key-value storage using the settings table. Values are stored
//! as JSON, enabling flexible schema-less configuration. Missing keys are
//! reported as `None` so callers can fall back to defaults.

use crate::error::{Result, StoreError};
use serde_json::Value;
use sqlx::SqlitePool;

/// Bucket key for the persisted engine settings snapshot.
pub const ENGINE_SETTINGS_KEY: &str = "demori_settings";

/// Bucket key for the currently selected user profile.
pub const CURRENT_PROFILE_KEY: &str = "current_profile";

/// Set a setting in the store.
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &Value) -> Result<()> {
    let value_str =
        serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;

    sqlx::query(
        r"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        ",
    )
    .bind(key)
    .bind(value_str)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a setting from the store.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<Value>> {
    let row: Option<(String,)> = sqlx::query_as(
        r"
        SELECT value
        FROM settings
        WHERE key = ?
        ",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    match row {
        Some((value_str,)) => {
            let value: Value = serde_json::from_str(&value_str)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Delete a setting from the store.
pub async fn delete_setting(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query(
        r"
        DELETE FROM settings
        WHERE key = ?
        ",
    )
    .bind(key)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;

    #[tokio::test]
    async fn test_set_and_get_setting() {
        let store = Store::in_memory().await.expect("create store");
        let pool = store.pool();

        let value = serde_json::json!({"search": {"timeout_secs": 10}});
        set_setting(pool, ENGINE_SETTINGS_KEY, &value)
            .await
            .expect("set setting");

        let retrieved = get_setting(pool, ENGINE_SETTINGS_KEY)
            .await
            .expect("get setting");
        assert_eq!(retrieved, Some(value));
    }

    #[tokio::test]
    async fn test_get_nonexistent_setting() {
        let store = Store::in_memory().await.expect("create store");

        let result = get_setting(store.pool(), "does_not_exist")
            .await
            .expect("get setting");
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_overwrite_setting() {
        let store = Store::in_memory().await.expect("create store");
        let pool = store.pool();

        set_setting(pool, CURRENT_PROFILE_KEY, &serde_json::json!({"name": "Ada"}))
            .await
            .expect("first set");
        set_setting(pool, CURRENT_PROFILE_KEY, &serde_json::json!({"name": "Grace"}))
            .await
            .expect("second set");

        let value = get_setting(pool, CURRENT_PROFILE_KEY)
            .await
            .expect("get setting")
            .expect("setting exists");
        assert_eq!(value["name"], "Grace");
    }

    #[tokio::test]
    async fn test_delete_setting() {
        let store = Store::in_memory().await.expect("create store");
        let pool = store.pool();

        set_setting(pool, "test_key", &serde_json::json!(true))
            .await
            .expect("set setting");
        delete_setting(pool, "test_key").await.expect("delete setting");

        let result = get_setting(pool, "test_key").await.expect("get setting");
        assert_eq!(result, None);
    }
}
