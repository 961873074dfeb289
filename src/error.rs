//! Crate error type
//!
//! Gameplay itself never fails; these cover wiring and storage edges.

/// Errors raised while wiring a session or touching persistent storage
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An orchestrator needs at least one minigame to run
    #[error("a session needs at least one minigame")]
    NoMinigames,
    /// No storage backend on this platform (or the browser refused it)
    #[error("storage is not available")]
    StorageUnavailable,
    /// Value could not be encoded or decoded
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Backend reported a failure while reading or writing
    #[error("storage backend error: {0}")]
    Storage(String),
    /// Tuning value outside the range the minigames can play with
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
    /// Browser host could not be set up (missing canvas, context, ...)
    #[error("platform error: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, Error>;
