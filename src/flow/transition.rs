//! Pure forward-transition logic, dispatched by flow type.
//!
//! Each flow type contributes one rule function; the shared position and
//! history bookkeeping lives in the engine. Rules never mutate anything —
//! they report what the engine should do next.

use crate::flow::config::{CardSpec, FlowConfiguration, FlowType};
use crate::flow::position::{CardPhase, ScreenPosition};
use crate::flow::selection::{Selection, SelectionKey, SelectionRecord};

/// Outcome of a forward-transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Forward is blocked until the named selection is recorded.
    /// The host should keep its forward control disabled.
    Blocked(SelectionKey),
    /// Reveal the current card's second face without moving.
    Reveal,
    /// Move to a new position.
    Goto(ScreenPosition),
    /// Already on the final screen; only the confirm action follows.
    AtFinal,
}

/// What kind of answer the active question takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStyle {
    /// A single option choice.
    Choice,
    /// A must-haves pick bundle.
    Picks,
}

/// Compute the next step from the current rendered state.
pub fn next_step(
    config: &FlowConfiguration,
    position: ScreenPosition,
    phase: CardPhase,
    selections: &SelectionRecord,
) -> Step {
    match position {
        ScreenPosition::Intro => Step::Goto(ScreenPosition::Card { index: 0 }),
        ScreenPosition::Card { index } => rule_for(config.flow_type)(config, index, phase, selections),
        ScreenPosition::Reflection => Step::Goto(ScreenPosition::Final),
        ScreenPosition::Final => Step::AtFinal,
    }
}

/// The question currently awaiting an answer, if any.
///
/// Also used on back-navigation: restoring a snapshot clears its active
/// question's recorded answer, so re-answering starts blank.
pub fn active_question(
    config: &FlowConfiguration,
    position: ScreenPosition,
    phase: CardPhase,
) -> Option<(SelectionKey, QuestionStyle)> {
    let index = position.card_index()?;
    match (config.flow_type, phase) {
        (FlowType::Standard, CardPhase::Initial) => {
            Some((SelectionKey::primary(index), QuestionStyle::Choice))
        }
        // Revealed standard cards show the chosen option's response.
        (FlowType::Standard, CardPhase::Revealed) => None,
        (FlowType::SimpleChoice, _) => Some((SelectionKey::primary(index), QuestionStyle::Choice)),
        (FlowType::TryItOn, CardPhase::Initial) => {
            Some((SelectionKey::primary(index), QuestionStyle::Choice))
        }
        (FlowType::TryItOn, CardPhase::Revealed) => {
            Some((SelectionKey::secondary(index), QuestionStyle::Choice))
        }
        (FlowType::MustHaves, _) => Some((SelectionKey::primary(index), QuestionStyle::Picks)),
        (FlowType::Flip | FlowType::Method, _) => None,
    }
}

/// The option list the active question draws from, if any.
pub fn active_options<'a>(
    config: &'a FlowConfiguration,
    position: ScreenPosition,
    phase: CardPhase,
) -> Option<&'a [crate::flow::config::ChoiceOption]> {
    let index = position.card_index()?;
    match config.cards.get(index)? {
        CardSpec::Prompt { options, .. } => Some(options),
        CardSpec::Scenario { first, second, .. } => match phase {
            CardPhase::Initial => Some(&first.options),
            CardPhase::Revealed => Some(&second.options),
        },
        _ => None,
    }
}

type TransitionRule = fn(&FlowConfiguration, usize, CardPhase, &SelectionRecord) -> Step;

/// Dispatch table keyed by flow type.
fn rule_for(flow_type: FlowType) -> TransitionRule {
    match flow_type {
        FlowType::Standard => standard_rule,
        FlowType::SimpleChoice => simple_choice_rule,
        FlowType::Flip => reveal_then_advance_rule,
        FlowType::Method => reveal_then_advance_rule,
        FlowType::TryItOn => try_it_on_rule,
        FlowType::MustHaves => must_haves_rule,
    }
}

/// Standard: answer, see the response, then advance.
fn standard_rule(
    config: &FlowConfiguration,
    index: usize,
    phase: CardPhase,
    selections: &SelectionRecord,
) -> Step {
    match phase {
        CardPhase::Initial => {
            let key = SelectionKey::primary(index);
            if !has_choice(selections, key) {
                return Step::Blocked(key);
            }
            Step::Reveal
        }
        CardPhase::Revealed => Step::Goto(after_card(config, index)),
    }
}

/// Simple choice: answer and advance directly.
fn simple_choice_rule(
    config: &FlowConfiguration,
    index: usize,
    _phase: CardPhase,
    selections: &SelectionRecord,
) -> Step {
    let key = SelectionKey::primary(index);
    if !has_choice(selections, key) {
        return Step::Blocked(key);
    }
    Step::Goto(after_card(config, index))
}

/// Flip and method cards: two forwards per card, no selections.
fn reveal_then_advance_rule(
    config: &FlowConfiguration,
    index: usize,
    phase: CardPhase,
    _selections: &SelectionRecord,
) -> Step {
    match phase {
        CardPhase::Initial => Step::Reveal,
        CardPhase::Revealed => Step::Goto(after_card(config, index)),
    }
}

/// Try-it-on: both scenario questions must be answered, one per face.
fn try_it_on_rule(
    config: &FlowConfiguration,
    index: usize,
    phase: CardPhase,
    selections: &SelectionRecord,
) -> Step {
    match phase {
        CardPhase::Initial => {
            let key = SelectionKey::primary(index);
            if !has_choice(selections, key) {
                return Step::Blocked(key);
            }
            Step::Reveal
        }
        CardPhase::Revealed => {
            let key = SelectionKey::secondary(index);
            if !has_choice(selections, key) {
                return Step::Blocked(key);
            }
            Step::Goto(after_card(config, index))
        }
    }
}

/// Must-haves: a non-empty pick bundle, then advance.
fn must_haves_rule(
    config: &FlowConfiguration,
    index: usize,
    _phase: CardPhase,
    selections: &SelectionRecord,
) -> Step {
    let key = SelectionKey::primary(index);
    match selections.get(&key) {
        Some(Selection::Picks(ids)) if !ids.is_empty() => Step::Goto(after_card(config, index)),
        _ => Step::Blocked(key),
    }
}

/// Where forward goes once a card is done: next card, then reflection when
/// configured, then the final screen.
fn after_card(config: &FlowConfiguration, index: usize) -> ScreenPosition {
    if index + 1 < config.cards.len() {
        ScreenPosition::Card { index: index + 1 }
    } else if config.reflection.is_some() {
        ScreenPosition::Reflection
    } else {
        ScreenPosition::Final
    }
}

fn has_choice(selections: &SelectionRecord, key: SelectionKey) -> bool {
    matches!(selections.get(&key), Some(Selection::Choice(_)))
}
