//! Path progress: completed days, current-day markers, reflections, results.
//!
//! Every read degrades to an in-memory default on storage failure or a
//! malformed blob; every write logs and continues. Failures never reach the
//! user as errors — the storage discipline of the whole crate.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::flow::aggregate::AggregatedResult;
use crate::store::keys;
use crate::store::traits::Storage;

/// Tracks per-path progress through an injected storage port.
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn Storage>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// The whole progress map: `"{category}_{path}"` to completed-day count.
    pub async fn path_progress(&self) -> HashMap<String, u32> {
        let raw = match self.store.get(keys::PATH_PROGRESS).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return HashMap::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read path progress, using empty");
                return HashMap::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Malformed path progress blob, using empty");
            HashMap::new()
        })
    }

    /// Highest completed day for one path (0 when untouched).
    pub async fn completed_days(&self, category: &str, path: &str) -> u32 {
        self.path_progress()
            .await
            .get(&keys::path_tag(category, path))
            .copied()
            .unwrap_or(0)
    }

    /// Days complete sequentially, so a day is complete when the count has
    /// reached it.
    pub async fn is_day_complete(&self, category: &str, path: &str, day: u32) -> bool {
        day >= 1 && day <= self.completed_days(category, path).await
    }

    /// Record a day as complete. The count only moves forward.
    pub async fn record_day_complete(&self, category: &str, path: &str, day: u32) {
        let mut map = self.path_progress().await;
        let entry = map.entry(keys::path_tag(category, path)).or_insert(0);
        *entry = (*entry).max(day);

        match serde_json::to_string(&map) {
            Ok(raw) => {
                if let Err(e) = self.store.set(keys::PATH_PROGRESS, &raw).await {
                    warn!(error = %e, "Failed to write path progress");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode path progress"),
        }
    }

    /// The day the user is currently on (1 when unset).
    pub async fn current_day(&self, category: &str, path: &str) -> u32 {
        let key = keys::current_day(category, path);
        match self.store.get(&key).await {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(%key, %raw, "Malformed current-day marker, using 1");
                1
            }),
            Ok(None) => 1,
            Err(e) => {
                warn!(error = %e, %key, "Failed to read current day, using 1");
                1
            }
        }
    }

    pub async fn set_current_day(&self, category: &str, path: &str, day: u32) {
        let key = keys::current_day(category, path);
        if let Err(e) = self.store.set(&key, &day.to_string()).await {
            warn!(error = %e, %key, "Failed to write current day");
        }
    }

    /// The saved free-text reflection for one day, if any.
    pub async fn reflection(&self, category: &str, path: &str, day: u32) -> Option<String> {
        let key = keys::reflection(category, path, day);
        match self.store.get(&key).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, %key, "Failed to read reflection");
                None
            }
        }
    }

    pub async fn save_reflection(&self, category: &str, path: &str, day: u32, text: &str) {
        let key = keys::reflection(category, path, day);
        if let Err(e) = self.store.set(&key, text).await {
            warn!(error = %e, %key, "Failed to write reflection");
        }
    }

    /// The saved aggregated result for one day's exercise, if any.
    pub async fn exercise_result(
        &self,
        category: &str,
        path: &str,
        day: u32,
    ) -> Option<AggregatedResult> {
        let key = keys::exercise_result(category, path, day);
        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, %key, "Failed to read exercise result");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(error = %e, %key, "Malformed exercise result blob");
                None
            }
        }
    }

    pub async fn save_exercise_result(
        &self,
        category: &str,
        path: &str,
        day: u32,
        result: &AggregatedResult,
    ) {
        let key = keys::exercise_result(category, path, day);
        match serde_json::to_string(result) {
            Ok(raw) => {
                if let Err(e) = self.store.set(&key, &raw).await {
                    warn!(error = %e, %key, "Failed to write exercise result");
                }
            }
            Err(e) => warn!(error = %e, %key, "Failed to encode exercise result"),
        }
    }
}
