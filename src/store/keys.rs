//! Storage key conventions.
//!
//! Keys are string-concatenated by convention, not structured; each feature
//! owns a single JSON blob or scalar per key. These shapes are the crate's
//! only wire format and must round-trip through JSON unchanged.

/// JSON map of `"{category}_{path}"` to completed-day count.
pub const PATH_PROGRESS: &str = "pathProgress";

/// Current streak length, stored as a decimal string.
pub const STREAK_COUNT: &str = "streakCount";

/// Last day with recorded activity, stored as `YYYY-MM-DD`.
pub const LAST_ACTIVE_DATE: &str = "lastActiveDate";

/// JSON array of journal entries, newest first.
pub const JOURNAL_ENTRIES: &str = "journalEntries";

/// The `"{category}_{path}"` tag used inside the progress blob and on
/// journal entries.
pub fn path_tag(category: &str, path: &str) -> String {
    format!("{category}_{path}")
}

/// Per-path marker for the day the user is currently on.
pub fn current_day(category: &str, path: &str) -> String {
    format!("currentDay_{category}_{path}")
}

/// Per-day free-text reflection.
pub fn reflection(category: &str, path: &str, day: u32) -> String {
    format!("reflection_{category}_{path}_{day}")
}

/// Per-day aggregated exercise result, stored as JSON.
pub fn exercise_result(category: &str, path: &str, day: u32) -> String {
    format!("exerciseResult_{category}_{path}_{day}")
}
