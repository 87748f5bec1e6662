//! Recorded answers, keyed by card and question slot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which question on a card a selection answers.
///
/// Only two-question scenario cards have a `Secondary` slot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSlot {
    #[default]
    Primary,
    Secondary,
}

impl std::fmt::Display for QuestionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// Identifies one question within a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionKey {
    pub card: usize,
    pub slot: QuestionSlot,
}

impl SelectionKey {
    pub fn primary(card: usize) -> Self {
        Self {
            card,
            slot: QuestionSlot::Primary,
        }
    }

    pub fn secondary(card: usize) -> Self {
        Self {
            card,
            slot: QuestionSlot::Secondary,
        }
    }
}

impl std::fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "card {} ({})", self.card, self.slot)
    }
}

/// The user's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A single chosen option tag (e.g. `"a"` or a category tag).
    Choice(String),
    /// A multi-pick bundle of item ids (must-haves budget cards).
    Picks(Vec<String>),
}

impl Selection {
    /// The chosen tag, if this is a single choice.
    pub fn choice(&self) -> Option<&str> {
        match self {
            Self::Choice(tag) => Some(tag),
            Self::Picks(_) => None,
        }
    }

    /// The picked item ids, if this is a pick bundle.
    pub fn picks(&self) -> Option<&[String]> {
        match self {
            Self::Choice(_) => None,
            Self::Picks(ids) => Some(ids),
        }
    }
}

/// All answers recorded during one flow run.
///
/// Ordered by key so iteration is deterministic. A later insert for the same
/// key overwrites the earlier one (re-answering after back-navigation). Read
/// once at aggregation; never persisted by the engine itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRecord {
    entries: BTreeMap<SelectionKey, Selection>,
}

impl SelectionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: SelectionKey, selection: Selection) {
        self.entries.insert(key, selection);
    }

    pub fn get(&self, key: &SelectionKey) -> Option<&Selection> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &SelectionKey) -> Option<Selection> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SelectionKey, &Selection)> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &Selection> {
        self.entries.values()
    }
}
