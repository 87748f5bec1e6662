//! Result aggregation — folds recorded selections into the flow's outcome.
//!
//! Pure and deterministic: the same selections always produce the same
//! result. A missing required selection is a bug upstream (the transition
//! guards make it unreachable) and fails fast rather than defaulting, since a
//! silently defaulted result label would mislead the user.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::flow::config::{NarrativeSlot, ResultCategory, ResultSpec};
use crate::flow::selection::{Selection, SelectionKey, SelectionRecord};

/// The outcome reported to the host at completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregatedResult {
    /// The dominant category by vote count, with the full tally.
    Dominant {
        tag: String,
        title: String,
        description: String,
        counts: Vec<TagCount>,
    },
    /// Ordered narrative sentences keyed by the user's choices.
    Narrative { sentences: Vec<String> },
}

/// Vote count for one category, in declared enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u32,
}

/// Fold recorded selections into a result per the flow's result spec.
pub fn aggregate(
    selections: &SelectionRecord,
    spec: &ResultSpec,
) -> Result<AggregatedResult, FlowError> {
    match spec {
        ResultSpec::None => Ok(AggregatedResult::Narrative {
            sentences: Vec::new(),
        }),
        ResultSpec::MajorityVote { categories } => majority_vote(selections, categories),
        ResultSpec::Narrative { slots } => narrative(selections, slots),
    }
}

/// Tally choice tags; the strict maximum wins, ties resolve to the earliest
/// category in declared order holding the maximum.
fn majority_vote(
    selections: &SelectionRecord,
    categories: &[ResultCategory],
) -> Result<AggregatedResult, FlowError> {
    let mut counts: Vec<TagCount> = categories
        .iter()
        .map(|category| TagCount {
            tag: category.tag.clone(),
            count: 0,
        })
        .collect();

    let mut total = 0u32;
    for selection in selections.values() {
        let Selection::Choice(tag) = selection else {
            continue;
        };
        let Some(entry) = counts.iter_mut().find(|count| &count.tag == tag) else {
            return Err(FlowError::InvalidConfiguration(format!(
                "recorded choice '{tag}' matches no result category"
            )));
        };
        entry.count += 1;
        total += 1;
    }

    if total == 0 {
        return Err(FlowError::NoSelections);
    }

    let mut winner = 0usize;
    for (index, count) in counts.iter().enumerate() {
        if count.count > counts[winner].count {
            winner = index;
        }
    }

    let category = &categories[winner];
    Ok(AggregatedResult::Dominant {
        tag: category.tag.clone(),
        title: category.title.clone(),
        description: category.description.clone(),
        counts,
    })
}

/// Fill each narrative slot from its recorded selection, in slot order.
fn narrative(
    selections: &SelectionRecord,
    slots: &[NarrativeSlot],
) -> Result<AggregatedResult, FlowError> {
    let mut sentences = Vec::with_capacity(slots.len());

    for slot in slots {
        let key = SelectionKey {
            card: slot.card,
            slot: slot.slot,
        };
        let Some(selection) = selections.get(&key) else {
            return Err(FlowError::MissingSelection(key));
        };

        match selection {
            Selection::Choice(tag) => {
                let fragment = slot
                    .fragments
                    .iter()
                    .find(|fragment| &fragment.choice == tag)
                    .ok_or_else(|| {
                        FlowError::InvalidConfiguration(format!(
                            "no fragment for choice '{tag}' on card {}",
                            slot.card
                        ))
                    })?;
                sentences.push(fragment.text.clone());
            }
            Selection::Picks(ids) => {
                // Fragment declaration order fixes line order for bundles.
                for fragment in &slot.fragments {
                    if ids.iter().any(|id| id == &fragment.choice) {
                        sentences.push(fragment.text.clone());
                    }
                }
            }
        }
    }

    Ok(AggregatedResult::Narrative { sentences })
}
