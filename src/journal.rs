//! Standalone journal — free-text, optionally mood-tagged notes persisted
//! independently of flow state.
//!
//! Entries live in one append-only JSON array under `journalEntries`, newest
//! first, serialized camelCase so the stored shape is
//! `{id, pathTag, date, content, mood}` exactly.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::store::keys;
use crate::store::traits::Storage;

/// Mood tag on a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Great,
    Good,
    Neutral,
    Low,
    Rough,
}

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    /// `"{category}_{path}"` tag when written from within a path, if any.
    pub path_tag: Option<String>,
    pub date: DateTime<Utc>,
    pub content: String,
    pub mood: Option<Mood>,
}

impl JournalEntry {
    /// Create an entry dated now with a fresh id.
    pub fn new(path_tag: Option<String>, content: impl Into<String>, mood: Option<Mood>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path_tag,
            date: Utc::now(),
            content: content.into(),
            mood,
        }
    }
}

/// The journal, stored whole under a single key.
#[derive(Clone)]
pub struct JournalStore {
    store: Arc<dyn Storage>,
}

impl JournalStore {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// All entries, newest first. Degrades to empty on failure.
    pub async fn entries(&self) -> Vec<JournalEntry> {
        let raw = match self.store.get(keys::JOURNAL_ENTRIES).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read journal, using empty");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Malformed journal blob, using empty");
            Vec::new()
        })
    }

    /// The most recent `limit` entries.
    ///
    /// Hosts paging the journal pass [`crate::config::AppConfig`]'s
    /// `journal_page_size` here.
    pub async fn recent(&self, limit: usize) -> Vec<JournalEntry> {
        let mut entries = self.entries().await;
        entries.truncate(limit);
        entries
    }

    /// Entries written from within one path, newest first.
    pub async fn entries_for(&self, path_tag: &str) -> Vec<JournalEntry> {
        self.entries()
            .await
            .into_iter()
            .filter(|entry| entry.path_tag.as_deref() == Some(path_tag))
            .collect()
    }

    /// Prepend an entry and write the whole list back.
    pub async fn add(&self, entry: JournalEntry) {
        let mut entries = self.entries().await;
        entries.insert(0, entry);
        self.write(&entries).await;
    }

    /// Remove an entry by id. Returns whether anything was removed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut entries = self.entries().await;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return false;
        }
        self.write(&entries).await;
        true
    }

    async fn write(&self, entries: &[JournalEntry]) {
        match serde_json::to_string(entries) {
            Ok(raw) => {
                if let Err(e) = self.store.set(keys::JOURNAL_ENTRIES, &raw).await {
                    warn!(error = %e, "Failed to write journal");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode journal"),
        }
    }
}
