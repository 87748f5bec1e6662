//! The screen-flow engine.
//!
//! A flow is one complete run of an exercise from its intro screen to its
//! final screen. The engine owns a single mutable position, a history stack
//! for back-navigation, and the user's recorded selections; transitions are
//! pure functions dispatched by flow type, and the result is aggregated once
//! at the explicit confirm action.

pub mod aggregate;
pub mod bridge;
pub mod config;
pub mod engine;
pub mod position;
pub mod selection;
pub mod transition;

pub use aggregate::{AggregatedResult, TagCount, aggregate};
pub use bridge::{FlowController, FlowHost};
pub use config::{
    CardSpec, ChoiceOption, FinalScreen, FlowConfiguration, FlowType, Fragment, MustHaveItem,
    NarrativeSlot, ReflectionSpec, ResultCategory, ResultSpec, ScenarioQuestion, ScreenText,
};
pub use engine::{Advance, Back, CardView, FlowEngine, PickToggle, ScreenView};
pub use position::{CardPhase, HistoryStack, ScreenPosition, Snapshot};
pub use selection::{QuestionSlot, Selection, SelectionKey, SelectionRecord};
