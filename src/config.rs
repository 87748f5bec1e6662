//! Configuration types.

use std::time::Duration;

/// Host-tunable settings, one source of truth per app instance.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Transition-animation pacing.
    pub pacing: FlowPacing,
    /// Journal entries shown per page.
    pub journal_page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pacing: FlowPacing::default(),
            journal_page_size: 20,
        }
    }
}

/// Fixed delays used purely for transition-animation pacing.
///
/// The flow engine itself never sleeps; the presentation layer observes a
/// state change, pauses, then re-renders. A pause abandoned mid-flight (the
/// user navigated away) has no observable side effect.
#[derive(Debug, Clone, Copy)]
pub struct FlowPacing {
    /// Pause after a card reveals its second face.
    pub reveal_delay: Duration,
    /// Pause after moving to a new screen.
    pub advance_delay: Duration,
}

impl Default for FlowPacing {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(250),
            advance_delay: Duration::from_millis(400),
        }
    }
}

/// Which transition a pause paces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPace {
    Reveal,
    Advance,
}

impl FlowPacing {
    /// Sleep for the configured pacing delay. No cancellation contract.
    pub async fn pause(&self, pace: TransitionPace) {
        let delay = match pace {
            TransitionPace::Reveal => self.reveal_delay,
            TransitionPace::Advance => self.advance_delay,
        };
        tokio::time::sleep(delay).await;
    }
}
