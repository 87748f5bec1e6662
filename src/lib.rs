//! Waypath — platform-independent core of a self-guided personal-development app.
//!
//! Multi-day "paths" contain one interactive exercise per day. The flow engine
//! drives each exercise's screen sequence; progress, streaks, reflections, and
//! journal entries persist through an injected key-value storage port. Hosts
//! (a mobile shell, a test harness) own rendering and navigation.

pub mod config;
pub mod content;
pub mod error;
pub mod flow;
pub mod journal;
pub mod progress;
pub mod session;
pub mod store;
pub mod streak;
