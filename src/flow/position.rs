//! Screen position and back-navigation history.

use serde::{Deserialize, Serialize};

/// The currently visible screen of a flow.
///
/// Every position must map to a screen defined by the active configuration;
/// that is enforced once at engine construction, after which positions are
/// only produced by the transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenPosition {
    /// Optional opening screen.
    Intro,
    /// One content card.
    Card { index: usize },
    /// Optional free-text reflection screen.
    Reflection,
    /// The closing screen. Terminal: only the confirm action follows.
    Final,
}

impl ScreenPosition {
    /// Whether this is the flow's terminal screen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Final)
    }

    /// The card index, if this position is a content card.
    pub fn card_index(&self) -> Option<usize> {
        match self {
            Self::Card { index } => Some(*index),
            _ => None,
        }
    }
}

/// Which face of the current card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardPhase {
    /// First face: prompt, front belief, method summary, first question.
    #[default]
    Initial,
    /// Second face: response, reverse belief, how-to, second question.
    Revealed,
}

/// One rendered state, as recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub position: ScreenPosition,
    pub phase: CardPhase,
}

impl Snapshot {
    pub fn new(position: ScreenPosition, phase: CardPhase) -> Self {
        Self { position, phase }
    }
}

/// Ordered stack of previously rendered states.
///
/// Created holding the flow's entry snapshot; every forward transition
/// (including in-place reveals) pushes one snapshot, so the top always equals
/// the current rendered state. Never persisted.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entry: Snapshot,
    rest: Vec<Snapshot>,
}

impl HistoryStack {
    /// Create a history holding only the entry snapshot.
    pub fn new(entry: Snapshot) -> Self {
        Self {
            entry,
            rest: Vec::new(),
        }
    }

    /// The snapshot the flow started on.
    pub fn entry(&self) -> Snapshot {
        self.entry
    }

    /// Record a new current state.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.rest.push(snapshot);
    }

    /// Drop the current state and return the one to restore.
    ///
    /// Returns `None` when only the entry snapshot remains — the flow's own
    /// history is exhausted and backing out is the host's call.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.rest.pop()?;
        Some(self.top())
    }

    /// The current state (top of the stack).
    pub fn top(&self) -> Snapshot {
        self.rest.last().copied().unwrap_or(self.entry)
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Truncate back to the entry snapshot (flow restart).
    pub fn reset(&mut self) {
        self.rest.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(index: usize, phase: CardPhase) -> Snapshot {
        Snapshot::new(ScreenPosition::Card { index }, phase)
    }

    #[test]
    fn terminal_positions() {
        assert!(ScreenPosition::Final.is_terminal());
        assert!(!ScreenPosition::Intro.is_terminal());
        assert!(!ScreenPosition::Card { index: 0 }.is_terminal());
        assert!(!ScreenPosition::Reflection.is_terminal());
    }

    #[test]
    fn card_index_query() {
        assert_eq!(ScreenPosition::Card { index: 3 }.card_index(), Some(3));
        assert_eq!(ScreenPosition::Intro.card_index(), None);
    }

    #[test]
    fn pop_restores_prior_snapshot() {
        let entry = Snapshot::new(ScreenPosition::Intro, CardPhase::Initial);
        let mut history = HistoryStack::new(entry);
        history.push(snap(0, CardPhase::Initial));
        history.push(snap(0, CardPhase::Revealed));

        assert_eq!(history.len(), 3);
        assert_eq!(history.pop(), Some(snap(0, CardPhase::Initial)));
        assert_eq!(history.pop(), Some(entry));
        assert_eq!(history.pop(), None);
        assert_eq!(history.top(), entry);
    }

    #[test]
    fn pop_on_entry_only_is_exhausted() {
        let entry = snap(0, CardPhase::Initial);
        let mut history = HistoryStack::new(entry);
        assert_eq!(history.pop(), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn reset_truncates_to_entry() {
        let entry = Snapshot::new(ScreenPosition::Intro, CardPhase::Initial);
        let mut history = HistoryStack::new(entry);
        history.push(snap(0, CardPhase::Initial));
        history.push(snap(1, CardPhase::Initial));
        history.reset();
        assert_eq!(history.len(), 1);
        assert_eq!(history.top(), entry);
    }
}
