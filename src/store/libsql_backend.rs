//! libSQL storage backend — durable on-device key-value store.
//!
//! A single `kv` table behind the async [`Storage`] port. Supports local
//! file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use libsql::{Connection, Database, params};
use tracing::info;

use crate::error::StorageError;
use crate::store::migrations;
use crate::store::traits::Storage;

/// libSQL [`Storage`] backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlStorage {
    #[allow(dead_code)]
    db: Arc<Database>,
    conn: Connection,
}

impl LibSqlStorage {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Backend(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| StorageError::Backend(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&backend.conn).await?;
        info!(path = %path.display(), "Storage opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StorageError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                StorageError::Backend(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| StorageError::Backend(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(&backend.conn).await?;
        Ok(backend)
    }
}

#[async_trait]
impl Storage for LibSqlStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut rows = self
            .conn
            .query("SELECT value FROM kv WHERE key = ?1", params![key])
            .await
            .map_err(|e| StorageError::Backend(format!("Read of '{key}' failed: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| StorageError::Backend(format!("Read of '{key}' failed: {e}")))?;

        match row {
            Some(row) => {
                let value: String = row
                    .get(0)
                    .map_err(|e| StorageError::Backend(format!("Bad row for '{key}': {e}")))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                     updated_at = excluded.updated_at",
                params![key, value],
            )
            .await
            .map_err(|e| StorageError::Backend(format!("Write of '{key}' failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = LibSqlStorage::new_memory().await.unwrap();
        assert_eq!(store.get("pathProgress").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let store = LibSqlStorage::new_memory().await.unwrap();
        store.set("streakCount", "5").await.unwrap();
        assert_eq!(
            store.get("streakCount").await.unwrap(),
            Some("5".to_string())
        );
    }

    #[tokio::test]
    async fn set_overwrites_existing_value() {
        let store = LibSqlStorage::new_memory().await.unwrap();
        store.set("k", "one").await.unwrap();
        store.set("k", "two").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("two".to_string()));
    }

    #[tokio::test]
    async fn values_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypath.db");

        {
            let store = LibSqlStorage::new_local(&path).await.unwrap();
            store.set("lastActiveDate", "2026-08-23").await.unwrap();
        }

        let store = LibSqlStorage::new_local(&path).await.unwrap();
        assert_eq!(
            store.get("lastActiveDate").await.unwrap(),
            Some("2026-08-23".to_string())
        );
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypath.db");
        for _ in 0..3 {
            let store = LibSqlStorage::new_local(&path).await.unwrap();
            store.set("k", "v").await.unwrap();
        }
    }
}
