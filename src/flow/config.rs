//! Declarative flow configuration.
//!
//! Supplied by the host's content catalog and treated as immutable input; the
//! engine never mutates it. Validation runs once at engine construction — a
//! configuration the active flow type cannot drive is a content bug and fails
//! loudly rather than being tolerated at runtime.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::flow::selection::QuestionSlot;

/// The branching pattern governing how cards advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    /// Prompt + options; choosing reveals the option's response, then advances.
    Standard,
    /// Prompt + options; choosing advances directly.
    SimpleChoice,
    /// Belief pair; front face flips to the reverse face, then advances.
    Flip,
    /// Two-phase method card: summary face, then how-to face.
    Method,
    /// Scenario with two questions on the same card.
    TryItOn,
    /// Budget simulator: pick items under a fixed budget.
    MustHaves,
}

/// One complete screen-flow declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConfiguration {
    pub id: String,
    pub flow_type: FlowType,
    #[serde(default)]
    pub intro: Option<ScreenText>,
    pub cards: Vec<CardSpec>,
    #[serde(default)]
    pub reflection: Option<ReflectionSpec>,
    pub final_screen: FinalScreen,
    #[serde(default)]
    pub result: ResultSpec,
}

/// Title and body for an intro screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenText {
    pub title: String,
    pub body: String,
}

/// Free-text reflection screen; the captured text is persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionSpec {
    pub prompt: String,
}

/// The closing screen. Its confirm action is the only way a flow completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalScreen {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
}

/// One content card. The variant must match the flow type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardSpec {
    /// Standard and simple-choice cards.
    Prompt {
        prompt: String,
        options: Vec<ChoiceOption>,
    },
    /// Belief pair for flip cards.
    Flip {
        prompt: String,
        front: String,
        back: String,
    },
    /// Two-phase method card.
    Method {
        title: String,
        summary: String,
        how_to: String,
    },
    /// Try-it-on scenario with two questions.
    Scenario {
        scenario: String,
        first: ScenarioQuestion,
        second: ScenarioQuestion,
    },
    /// Must-haves budget simulator.
    MustHaves {
        prompt: String,
        budget: u32,
        items: Vec<MustHaveItem>,
    },
}

/// One selectable option on a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Semantic tag recorded as the selection (also the aggregation key).
    pub tag: String,
    pub label: String,
    /// Shown on the revealed face of standard cards.
    #[serde(default)]
    pub response: Option<String>,
}

/// One question of a scenario card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioQuestion {
    pub prompt: String,
    pub options: Vec<ChoiceOption>,
}

/// One pickable item of a must-haves card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MustHaveItem {
    pub id: String,
    pub label: String,
    pub cost: u32,
}

/// How recorded selections fold into the flow's result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResultSpec {
    /// No aggregation; the flow completes with an empty narrative.
    #[default]
    None,
    /// Dominant category by vote count over recorded choice tags.
    /// Declaration order is the fixed tie-break enumeration order.
    MajorityVote { categories: Vec<ResultCategory> },
    /// Ordered narrative sentences templated by the user's choices.
    Narrative { slots: Vec<NarrativeSlot> },
}

/// One category a majority vote can resolve to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultCategory {
    pub tag: String,
    pub title: String,
    pub description: String,
}

/// One sentence slot of a narrative result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSlot {
    /// Card whose recorded selection fills this slot.
    pub card: usize,
    #[serde(default, skip_serializing_if = "is_primary")]
    pub slot: QuestionSlot,
    /// Candidate sentence fragments; declaration order fixes line order for
    /// pick bundles.
    pub fragments: Vec<Fragment>,
}

fn is_primary(slot: &QuestionSlot) -> bool {
    *slot == QuestionSlot::Primary
}

/// One pre-written sentence fragment keyed by a choice or item id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub choice: String,
    pub text: String,
}

impl FlowConfiguration {
    /// Validate that this configuration can drive its declared flow type.
    pub fn validate(&self) -> Result<(), FlowError> {
        if self.cards.is_empty() {
            return Err(invalid(&self.id, "flow has no cards"));
        }

        for (index, card) in self.cards.iter().enumerate() {
            self.validate_card(index, card)?;
        }

        match &self.result {
            ResultSpec::None => {}
            ResultSpec::MajorityVote { categories } => {
                if categories.is_empty() {
                    return Err(invalid(&self.id, "majority vote has no categories"));
                }
                let mut seen: Vec<&str> = Vec::new();
                for category in categories {
                    if seen.contains(&category.tag.as_str()) {
                        return Err(invalid(
                            &self.id,
                            &format!("duplicate result category tag '{}'", category.tag),
                        ));
                    }
                    seen.push(&category.tag);
                }
                if !matches!(
                    self.flow_type,
                    FlowType::Standard | FlowType::SimpleChoice | FlowType::TryItOn
                ) {
                    return Err(invalid(
                        &self.id,
                        "majority vote requires a choice-recording flow type",
                    ));
                }
            }
            ResultSpec::Narrative { slots } => {
                for slot in slots {
                    if slot.card >= self.cards.len() {
                        return Err(invalid(
                            &self.id,
                            &format!("narrative slot references missing card {}", slot.card),
                        ));
                    }
                    if slot.fragments.is_empty() {
                        return Err(invalid(
                            &self.id,
                            &format!("narrative slot for card {} has no fragments", slot.card),
                        ));
                    }
                    if slot.slot == QuestionSlot::Secondary && self.flow_type != FlowType::TryItOn
                    {
                        return Err(invalid(
                            &self.id,
                            "secondary narrative slots exist only on try-it-on flows",
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_card(&self, index: usize, card: &CardSpec) -> Result<(), FlowError> {
        let mismatch = || {
            invalid(
                &self.id,
                &format!(
                    "card {index} does not match flow type {:?}",
                    self.flow_type
                ),
            )
        };

        match (self.flow_type, card) {
            (FlowType::Standard, CardSpec::Prompt { options, .. }) => {
                validate_options(&self.id, index, options)?;
                // Standard cards reveal the chosen option's response.
                if options.iter().any(|option| option.response.is_none()) {
                    return Err(invalid(
                        &self.id,
                        &format!("card {index}: standard options require responses"),
                    ));
                }
                Ok(())
            }
            (FlowType::SimpleChoice, CardSpec::Prompt { options, .. }) => {
                validate_options(&self.id, index, options)
            }
            (FlowType::Flip, CardSpec::Flip { .. }) => Ok(()),
            (FlowType::Method, CardSpec::Method { .. }) => Ok(()),
            (FlowType::TryItOn, CardSpec::Scenario { first, second, .. }) => {
                validate_options(&self.id, index, &first.options)?;
                validate_options(&self.id, index, &second.options)
            }
            (FlowType::MustHaves, CardSpec::MustHaves { budget, items, .. }) => {
                if items.is_empty() {
                    return Err(invalid(&self.id, &format!("card {index} has no items")));
                }
                if *budget == 0 {
                    return Err(invalid(&self.id, &format!("card {index} budget is zero")));
                }
                let mut seen: Vec<&str> = Vec::new();
                for item in items {
                    if seen.contains(&item.id.as_str()) {
                        return Err(invalid(
                            &self.id,
                            &format!("card {index}: duplicate item id '{}'", item.id),
                        ));
                    }
                    seen.push(&item.id);
                }
                Ok(())
            }
            _ => Err(mismatch()),
        }
    }
}

fn validate_options(
    flow_id: &str,
    index: usize,
    options: &[ChoiceOption],
) -> Result<(), FlowError> {
    if options.is_empty() {
        return Err(invalid(flow_id, &format!("card {index} has no options")));
    }
    let mut seen: Vec<&str> = Vec::new();
    for option in options {
        if seen.contains(&option.tag.as_str()) {
            return Err(invalid(
                flow_id,
                &format!("card {index}: duplicate option tag '{}'", option.tag),
            ));
        }
        seen.push(&option.tag);
    }
    Ok(())
}

fn invalid(flow_id: &str, message: &str) -> FlowError {
    FlowError::InvalidConfiguration(format!("flow '{flow_id}': {message}"))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Configuration builders shared by the flow test modules.

    use super::*;

    pub fn final_screen() -> FinalScreen {
        FinalScreen {
            title: "All done".into(),
            message: "Nice work today.".into(),
            confirm_label: "Finish".into(),
        }
    }

    pub fn option(tag: &str, response: Option<&str>) -> ChoiceOption {
        ChoiceOption {
            tag: tag.into(),
            label: format!("Option {tag}"),
            response: response.map(Into::into),
        }
    }

    /// A simple-choice flow with one a/b/c/d question per card.
    pub fn simple_choice_flow(id: &str, cards: usize) -> FlowConfiguration {
        FlowConfiguration {
            id: id.into(),
            flow_type: FlowType::SimpleChoice,
            intro: None,
            cards: (0..cards)
                .map(|i| CardSpec::Prompt {
                    prompt: format!("Question {i}"),
                    options: ["a", "b", "c", "d"].iter().map(|t| option(t, None)).collect(),
                })
                .collect(),
            reflection: None,
            final_screen: final_screen(),
            result: ResultSpec::None,
        }
    }

    /// A standard flow: every option carries a response to reveal.
    pub fn standard_flow(id: &str, cards: usize) -> FlowConfiguration {
        FlowConfiguration {
            id: id.into(),
            flow_type: FlowType::Standard,
            intro: None,
            cards: (0..cards)
                .map(|i| CardSpec::Prompt {
                    prompt: format!("Scenario {i}"),
                    options: ["a", "b"]
                        .iter()
                        .map(|t| option(t, Some("Here is what that choice means.")))
                        .collect(),
                })
                .collect(),
            reflection: None,
            final_screen: final_screen(),
            result: ResultSpec::None,
        }
    }

    /// A try-it-on flow with two questions per scenario card.
    pub fn try_it_on_flow(id: &str, cards: usize) -> FlowConfiguration {
        FlowConfiguration {
            id: id.into(),
            flow_type: FlowType::TryItOn,
            intro: None,
            cards: (0..cards)
                .map(|i| CardSpec::Scenario {
                    scenario: format!("Scenario {i}"),
                    first: ScenarioQuestion {
                        prompt: "What would you do first?".into(),
                        options: vec![option("1", None), option("2", None)],
                    },
                    second: ScenarioQuestion {
                        prompt: "And how would it feel?".into(),
                        options: vec![option("1", None), option("2", None)],
                    },
                })
                .collect(),
            reflection: None,
            final_screen: final_screen(),
            result: ResultSpec::None,
        }
    }

    /// A one-card must-haves budget flow (budget 100).
    pub fn must_haves_flow(id: &str) -> FlowConfiguration {
        FlowConfiguration {
            id: id.into(),
            flow_type: FlowType::MustHaves,
            intro: None,
            cards: vec![CardSpec::MustHaves {
                prompt: "Pick what you cannot live without.".into(),
                budget: 100,
                items: vec![
                    MustHaveItem {
                        id: "gym".into(),
                        label: "Gym membership".into(),
                        cost: 40,
                    },
                    MustHaveItem {
                        id: "coffee".into(),
                        label: "Daily coffee".into(),
                        cost: 30,
                    },
                    MustHaveItem {
                        id: "travel".into(),
                        label: "A yearly trip".into(),
                        cost: 70,
                    },
                ],
            }],
            reflection: None,
            final_screen: final_screen(),
            result: ResultSpec::None,
        }
    }

    pub fn flip_flow(id: &str, cards: usize) -> FlowConfiguration {
        FlowConfiguration {
            id: id.into(),
            flow_type: FlowType::Flip,
            intro: Some(ScreenText {
                title: "Belief check".into(),
                body: "Flip each card.".into(),
            }),
            cards: (0..cards)
                .map(|i| CardSpec::Flip {
                    prompt: format!("Belief {i}"),
                    front: "Limiting belief".into(),
                    back: "Empowering belief".into(),
                })
                .collect(),
            reflection: None,
            final_screen: final_screen(),
            result: ResultSpec::None,
        }
    }
}
