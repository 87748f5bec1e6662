//! Error types for Waypath.

use crate::flow::selection::SelectionKey;

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Flow-engine errors.
///
/// `InvalidConfiguration` is the only unrecoverable case in normal operation:
/// a content/configuration bug that should fail loudly during development.
/// The rest are precondition violations reported back to the host.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Invalid flow configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Current screen has no active choice question")]
    NotAChoice,

    #[error("Choice '{0}' is not an option on the current question")]
    UnknownChoice(String),

    #[error("Current card is not a must-haves card")]
    NotAMustHave,

    #[error("Unknown must-have item: {0}")]
    UnknownPick(String),

    #[error("Flow is not at its final screen")]
    NotAtFinal,

    #[error("Flow result was already confirmed")]
    AlreadyCompleted,

    #[error("Missing selection for {0}")]
    MissingSelection(SelectionKey),

    #[error("No selections recorded; cannot aggregate a result")]
    NoSelections,
}

/// Storage-port errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Content-catalog errors.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Day-session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No day is open")]
    NoDayOpen,

    #[error("Active exercise is not a flow")]
    NotAFlow,

    #[error("Active exercise is not a journal prompt")]
    NotAJournal,
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
