//! Daily activity streak over the `streakCount` / `lastActiveDate` key pair.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::keys;
use crate::store::traits::Storage;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current streak state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub count: u32,
    pub last_active: Option<NaiveDate>,
}

/// What recording today's activity did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakUpdate {
    /// Activity was already recorded today; nothing changed.
    AlreadyCounted { count: u32 },
    /// Consecutive day: the streak grew.
    Extended { count: u32 },
    /// First activity, or a gap broke the streak: restarted at 1.
    Started { count: u32 },
}

impl StreakUpdate {
    pub fn count(&self) -> u32 {
        match self {
            Self::AlreadyCounted { count } | Self::Extended { count } | Self::Started { count } => {
                *count
            }
        }
    }
}

/// Tracks the daily streak through an injected storage port.
#[derive(Clone)]
pub struct StreakTracker {
    store: Arc<dyn Storage>,
}

impl StreakTracker {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self { store }
    }

    /// Read the current streak, degrading to zero on failure.
    pub async fn current(&self) -> Streak {
        let count = match self.store.get(keys::STREAK_COUNT).await {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(%raw, "Malformed streak count, using 0");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                warn!(error = %e, "Failed to read streak count, using 0");
                0
            }
        };

        let last_active = match self.store.get(keys::LAST_ACTIVE_DATE).await {
            Ok(Some(raw)) => match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!(error = %e, %raw, "Malformed last-active date, ignoring");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read last-active date, ignoring");
                None
            }
        };

        Streak { count, last_active }
    }

    /// Record activity for `today` and report what happened.
    ///
    /// A same-day repeat keeps the count; the day after the last activity
    /// extends it; anything else (including first use) restarts at 1.
    pub async fn record_activity(&self, today: NaiveDate) -> StreakUpdate {
        let streak = self.current().await;

        let update = match streak.last_active {
            Some(last) if last == today => StreakUpdate::AlreadyCounted {
                count: streak.count,
            },
            Some(last) if last.succ_opt() == Some(today) => StreakUpdate::Extended {
                count: streak.count + 1,
            },
            _ => StreakUpdate::Started { count: 1 },
        };

        if !matches!(update, StreakUpdate::AlreadyCounted { .. }) {
            if let Err(e) = self
                .store
                .set(keys::STREAK_COUNT, &update.count().to_string())
                .await
            {
                warn!(error = %e, "Failed to write streak count");
            }
            if let Err(e) = self
                .store
                .set(
                    keys::LAST_ACTIVE_DATE,
                    &today.format(DATE_FORMAT).to_string(),
                )
                .await
            {
                warn!(error = %e, "Failed to write last-active date");
            }
        }

        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;
    use crate::store::test_support::FailingStorage;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    fn tracker() -> (StreakTracker, Arc<MemoryStorage>) {
        let store = Arc::new(MemoryStorage::new());
        (StreakTracker::new(store.clone()), store)
    }

    #[tokio::test]
    async fn first_activity_starts_at_one() {
        let (streaks, _) = tracker();
        assert_eq!(
            streaks.record_activity(date(10)).await,
            StreakUpdate::Started { count: 1 }
        );
        let streak = streaks.current().await;
        assert_eq!(streak.count, 1);
        assert_eq!(streak.last_active, Some(date(10)));
    }

    #[tokio::test]
    async fn consecutive_days_extend() {
        let (streaks, _) = tracker();
        streaks.record_activity(date(10)).await;
        assert_eq!(
            streaks.record_activity(date(11)).await,
            StreakUpdate::Extended { count: 2 }
        );
        assert_eq!(
            streaks.record_activity(date(12)).await,
            StreakUpdate::Extended { count: 3 }
        );
    }

    #[tokio::test]
    async fn same_day_repeat_keeps_count() {
        let (streaks, _) = tracker();
        streaks.record_activity(date(10)).await;
        assert_eq!(
            streaks.record_activity(date(10)).await,
            StreakUpdate::AlreadyCounted { count: 1 }
        );
        assert_eq!(streaks.current().await.count, 1);
    }

    #[tokio::test]
    async fn gap_restarts_the_streak() {
        let (streaks, _) = tracker();
        streaks.record_activity(date(10)).await;
        streaks.record_activity(date(11)).await;
        assert_eq!(
            streaks.record_activity(date(14)).await,
            StreakUpdate::Started { count: 1 }
        );
    }

    #[tokio::test]
    async fn date_wire_format_is_stable() {
        let (streaks, store) = tracker();
        streaks.record_activity(date(9)).await;
        assert_eq!(
            store.get(keys::LAST_ACTIVE_DATE).await.unwrap(),
            Some("2026-08-09".to_string())
        );
        assert_eq!(
            store.get(keys::STREAK_COUNT).await.unwrap(),
            Some("1".to_string())
        );
    }

    #[tokio::test]
    async fn storage_failure_degrades_to_fresh_streak() {
        let streaks = StreakTracker::new(Arc::new(FailingStorage));
        let streak = streaks.current().await;
        assert_eq!(streak.count, 0);
        assert_eq!(streak.last_active, None);
        // Recording still reports an outcome; the writes just log.
        assert_eq!(
            streaks.record_activity(date(10)).await,
            StreakUpdate::Started { count: 1 }
        );
    }

    #[tokio::test]
    async fn malformed_count_degrades_to_zero() {
        let (streaks, store) = tracker();
        store.set(keys::STREAK_COUNT, "many").await.unwrap();
        assert_eq!(streaks.current().await.count, 0);
    }
}
