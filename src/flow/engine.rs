//! The mutable flow state machine.
//!
//! Owns the current position, the reveal phase, the history stack, and the
//! recorded selections. All mutation happens through the methods here, inside
//! the host's synchronous event handlers; animation pacing lives in
//! [`crate::config::FlowPacing`] and observes state, it never owns it.

use tracing::debug;

use crate::error::FlowError;
use crate::flow::aggregate::{AggregatedResult, aggregate};
use crate::flow::config::{CardSpec, FinalScreen, FlowConfiguration, ReflectionSpec, ScreenText};
use crate::flow::position::{CardPhase, HistoryStack, ScreenPosition, Snapshot};
use crate::flow::selection::{Selection, SelectionKey, SelectionRecord};
use crate::flow::transition::{self, QuestionStyle, Step};

/// Outcome of a forward-navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to a new screen.
    Moved(ScreenPosition),
    /// The current card revealed its second face; position unchanged.
    Revealed,
    /// Blocked until the named selection is recorded. Nothing changed.
    Blocked { missing: SelectionKey },
    /// Already at the final screen; call [`FlowEngine::confirm`].
    AtFinal,
}

/// Outcome of a backward-navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Back {
    /// Restored the prior screen state.
    Moved(ScreenPosition),
    /// History is exhausted; leaving the flow is the host's call.
    Exited,
}

/// Outcome of toggling a must-have pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickToggle {
    /// Item added; `spent` is the new bundle cost.
    Added { spent: u32 },
    /// Item removed; `spent` is the remaining bundle cost.
    Removed { spent: u32 },
    /// Adding the item would exceed the card budget. Nothing changed.
    OverBudget { budget: u32, attempted: u32 },
}

/// Render payload for the current screen.
///
/// Borrows from the engine so hosts render without copying configuration.
#[derive(Debug)]
pub enum ScreenView<'a> {
    Intro(&'a ScreenText),
    Card(CardView<'a>),
    Reflection(&'a ReflectionSpec),
    Final(&'a FinalScreen),
}

/// Everything a host needs to render one card.
#[derive(Debug)]
pub struct CardView<'a> {
    pub index: usize,
    pub total: usize,
    pub spec: &'a CardSpec,
    pub phase: CardPhase,
    /// Answer to the card's first question, if recorded.
    pub primary: Option<&'a Selection>,
    /// Answer to the second scenario question, if recorded.
    pub secondary: Option<&'a Selection>,
    /// Current bundle cost on must-have cards.
    pub spent: Option<u32>,
}

/// A single run of one screen flow, from intro to final.
#[derive(Debug)]
pub struct FlowEngine {
    config: FlowConfiguration,
    position: ScreenPosition,
    phase: CardPhase,
    history: HistoryStack,
    selections: SelectionRecord,
    completed: bool,
}

impl FlowEngine {
    /// Validate the configuration and start at the entry screen.
    pub fn new(config: FlowConfiguration) -> Result<Self, FlowError> {
        config.validate()?;
        let entry = if config.intro.is_some() {
            ScreenPosition::Intro
        } else {
            ScreenPosition::Card { index: 0 }
        };
        let snapshot = Snapshot::new(entry, CardPhase::Initial);
        Ok(Self {
            config,
            position: entry,
            phase: CardPhase::Initial,
            history: HistoryStack::new(snapshot),
            selections: SelectionRecord::new(),
            completed: false,
        })
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Apply one forward transition.
    pub fn advance(&mut self) -> Advance {
        match transition::next_step(&self.config, self.position, self.phase, &self.selections) {
            Step::Blocked(missing) => Advance::Blocked { missing },
            Step::Reveal => {
                self.phase = CardPhase::Revealed;
                self.history.push(self.snapshot());
                debug!(flow = %self.config.id, position = ?self.position, "Card revealed");
                Advance::Revealed
            }
            Step::Goto(position) => {
                self.position = position;
                self.phase = CardPhase::Initial;
                self.history.push(self.snapshot());
                debug!(flow = %self.config.id, position = ?position, "Advanced");
                Advance::Moved(position)
            }
            Step::AtFinal => Advance::AtFinal,
        }
    }

    /// Apply one backward transition.
    ///
    /// Restores the prior rendered state. The restored screen's active
    /// question is cleared so re-answering starts blank. With only the entry
    /// snapshot left, reports `Exited` and mutates nothing — exiting the flow
    /// belongs to the host.
    pub fn go_back(&mut self) -> Back {
        let Some(snapshot) = self.history.pop() else {
            return Back::Exited;
        };
        self.position = snapshot.position;
        self.phase = snapshot.phase;
        if let Some((key, _)) =
            transition::active_question(&self.config, self.position, self.phase)
        {
            self.selections.remove(&key);
        }
        debug!(flow = %self.config.id, position = ?self.position, "Went back");
        Back::Moved(snapshot.position)
    }

    /// Return to the entry screen, clearing history, phase, and selections.
    pub fn reset(&mut self) {
        let entry = self.history.entry();
        self.history.reset();
        self.position = entry.position;
        self.phase = entry.phase;
        self.selections.clear();
        self.completed = false;
        debug!(flow = %self.config.id, "Flow reset");
    }

    // ── Answering ───────────────────────────────────────────────────

    /// Record the active question's answer.
    pub fn select(&mut self, choice: impl Into<String>) -> Result<(), FlowError> {
        let Some((key, QuestionStyle::Choice)) =
            transition::active_question(&self.config, self.position, self.phase)
        else {
            return Err(FlowError::NotAChoice);
        };
        let choice = choice.into();
        let known = transition::active_options(&self.config, self.position, self.phase)
            .is_some_and(|options| options.iter().any(|option| option.tag == choice));
        if !known {
            return Err(FlowError::UnknownChoice(choice));
        }
        self.selections.insert(key, Selection::Choice(choice));
        Ok(())
    }

    /// Toggle a must-have pick on the current card.
    pub fn toggle_pick(&mut self, item_id: &str) -> Result<PickToggle, FlowError> {
        let Some((key, QuestionStyle::Picks)) =
            transition::active_question(&self.config, self.position, self.phase)
        else {
            return Err(FlowError::NotAMustHave);
        };
        let CardSpec::MustHaves { budget, items, .. } = &self.config.cards[key.card] else {
            return Err(FlowError::NotAMustHave);
        };

        let mut picks = match self.selections.get(&key) {
            Some(Selection::Picks(ids)) => ids.clone(),
            _ => Vec::new(),
        };

        if let Some(at) = picks.iter().position(|id| id == item_id) {
            picks.remove(at);
            let spent = bundle_cost(items, &picks);
            self.selections.insert(key, Selection::Picks(picks));
            return Ok(PickToggle::Removed { spent });
        }

        let item = items
            .iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| FlowError::UnknownPick(item_id.to_string()))?;
        let attempted = bundle_cost(items, &picks) + item.cost;
        if attempted > *budget {
            return Ok(PickToggle::OverBudget {
                budget: *budget,
                attempted,
            });
        }

        picks.push(item_id.to_string());
        self.selections.insert(key, Selection::Picks(picks));
        Ok(PickToggle::Added { spent: attempted })
    }

    // ── Completion ──────────────────────────────────────────────────

    /// Aggregate the result. Valid only at the final screen, and only once —
    /// completion is always an explicit user action, never automatic.
    pub fn confirm(&mut self) -> Result<AggregatedResult, FlowError> {
        if !self.position.is_terminal() {
            return Err(FlowError::NotAtFinal);
        }
        if self.completed {
            return Err(FlowError::AlreadyCompleted);
        }
        let result = aggregate(&self.selections, &self.config.result)?;
        self.completed = true;
        debug!(flow = %self.config.id, "Flow confirmed");
        Ok(result)
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Render payload for the current screen.
    pub fn screen(&self) -> ScreenView<'_> {
        match self.position {
            ScreenPosition::Intro => match &self.config.intro {
                Some(text) => ScreenView::Intro(text),
                None => unreachable!("intro position requires intro content"),
            },
            ScreenPosition::Card { index } => {
                let spec = &self.config.cards[index];
                let spent = match spec {
                    CardSpec::MustHaves { items, .. } => Some(
                        self.selections
                            .get(&SelectionKey::primary(index))
                            .and_then(Selection::picks)
                            .map(|ids| bundle_cost(items, ids))
                            .unwrap_or(0),
                    ),
                    _ => None,
                };
                ScreenView::Card(CardView {
                    index,
                    total: self.config.cards.len(),
                    spec,
                    phase: self.phase,
                    primary: self.selections.get(&SelectionKey::primary(index)),
                    secondary: self.selections.get(&SelectionKey::secondary(index)),
                    spent,
                })
            }
            ScreenPosition::Reflection => match &self.config.reflection {
                Some(reflection) => ScreenView::Reflection(reflection),
                None => unreachable!("reflection position requires reflection content"),
            },
            ScreenPosition::Final => ScreenView::Final(&self.config.final_screen),
        }
    }

    pub fn position(&self) -> ScreenPosition {
        self.position
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn selections(&self) -> &SelectionRecord {
        &self.selections
    }

    pub fn config(&self) -> &FlowConfiguration {
        &self.config
    }

    pub fn card_count(&self) -> usize {
        self.config.cards.len()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.position, self.phase)
    }
}

fn bundle_cost(items: &[crate::flow::config::MustHaveItem], picks: &[String]) -> u32 {
    items
        .iter()
        .filter(|item| picks.iter().any(|id| id == &item.id))
        .map(|item| item.cost)
        .sum()
}
