//! Completion/back bridge between a flow engine and its hosting screen.

use crate::error::FlowError;
use crate::flow::aggregate::AggregatedResult;
use crate::flow::engine::{Advance, Back, FlowEngine, PickToggle, ScreenView};

/// The host's side of the flow lifecycle contract.
///
/// `on_complete` fires exactly once, only after the final screen's explicit
/// confirm action. `on_back` fires when backward navigation exhausts the
/// flow's own history — the signal to leave the flow entirely.
pub trait FlowHost {
    fn on_complete(&mut self, result: AggregatedResult);
    fn on_back(&mut self);
}

/// Thin adapter owning a [`FlowEngine`] and its host.
///
/// Forwards interaction calls unchanged and maps the engine's exit and
/// completion outcomes onto the host callbacks. No retries, no failure modes
/// of its own — whatever the host does with the result is the host's concern.
pub struct FlowController<H: FlowHost> {
    engine: FlowEngine,
    host: H,
}

impl<H: FlowHost> FlowController<H> {
    pub fn new(engine: FlowEngine, host: H) -> Self {
        Self { engine, host }
    }

    pub fn select(&mut self, choice: impl Into<String>) -> Result<(), FlowError> {
        self.engine.select(choice)
    }

    pub fn toggle_pick(&mut self, item_id: &str) -> Result<PickToggle, FlowError> {
        self.engine.toggle_pick(item_id)
    }

    pub fn advance(&mut self) -> Advance {
        self.engine.advance()
    }

    /// Back-navigate, exiting via the host once history is exhausted.
    pub fn go_back(&mut self) -> Back {
        let back = self.engine.go_back();
        if back == Back::Exited {
            self.host.on_back();
        }
        back
    }

    /// Confirm the final screen and deliver the result to the host.
    pub fn confirm(&mut self) -> Result<AggregatedResult, FlowError> {
        let result = self.engine.confirm()?;
        self.host.on_complete(result.clone());
        Ok(result)
    }

    pub fn screen(&self) -> ScreenView<'_> {
        self.engine.screen()
    }

    pub fn engine(&self) -> &FlowEngine {
        &self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::config::test_support::simple_choice_flow;
    use crate::flow::position::ScreenPosition;

    #[derive(Default)]
    struct RecordingHost {
        completions: Vec<AggregatedResult>,
        backs: usize,
    }

    impl FlowHost for RecordingHost {
        fn on_complete(&mut self, result: AggregatedResult) {
            self.completions.push(result);
        }

        fn on_back(&mut self) {
            self.backs += 1;
        }
    }

    fn controller(cards: usize) -> FlowController<RecordingHost> {
        let engine = FlowEngine::new(simple_choice_flow("quiz", cards)).unwrap();
        FlowController::new(engine, RecordingHost::default())
    }

    #[test]
    fn back_at_first_screen_calls_on_back_exactly_once() {
        let mut controller = controller(2);
        assert_eq!(controller.go_back(), Back::Exited);
        assert_eq!(controller.host().backs, 1);
        assert_eq!(
            controller.engine().position(),
            ScreenPosition::Card { index: 0 }
        );
    }

    #[test]
    fn back_within_history_does_not_call_host() {
        let mut controller = controller(2);
        controller.select("a").unwrap();
        controller.advance();
        assert!(matches!(controller.go_back(), Back::Moved(_)));
        assert_eq!(controller.host().backs, 0);
    }

    #[test]
    fn confirm_delivers_result_exactly_once() {
        let mut controller = controller(1);
        controller.select("a").unwrap();
        assert_eq!(
            controller.advance(),
            Advance::Moved(ScreenPosition::Final)
        );

        assert!(controller.confirm().is_ok());
        assert_eq!(controller.host().completions.len(), 1);

        // A second confirm is rejected and never reaches the host.
        assert!(controller.confirm().is_err());
        assert_eq!(controller.host().completions.len(), 1);
    }

    #[test]
    fn confirm_before_final_never_reaches_host() {
        let mut controller = controller(2);
        assert!(controller.confirm().is_err());
        assert!(controller.host().completions.is_empty());
    }
}
