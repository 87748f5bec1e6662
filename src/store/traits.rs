//! The injected key-value storage port.

use async_trait::async_trait;

use crate::error::StorageError;

/// Backend-agnostic string key-value storage.
///
/// Writes are last-read composed with the new value; last-writer-wins is
/// accepted — usage is single-user, single-device, single-threaded.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any existing value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
