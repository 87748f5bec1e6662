//! Storage port and backends.
//!
//! Every persisted feature goes through the [`Storage`] trait — a plain
//! string key-value port injected by the host. The trackers that consume it
//! catch failures, log, and continue with in-memory defaults; nothing in the
//! crate retries or surfaces a storage error to the user.

pub mod keys;
pub mod libsql_backend;
pub mod memory;
mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlStorage;
pub use memory::MemoryStorage;
pub use traits::Storage;
