//! Error taxonomy for the engine bridge.

use std::time::Duration;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SibylError>;

/// Errors surfaced by the engine bridge and decision layer.
///
/// The known recoverable engine error line is handled inside the reader
/// loop and never appears here.
#[derive(Debug, thiserror::Error)]
pub enum SibylError {
    /// Engine process could not be located or launched. Fatal, no retry.
    #[error("engine startup failed: {0}")]
    Startup(String),

    /// Read/write failure on the engine's stdio streams. Fatal to the session.
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A verdict dequeue exceeded the configured deadline.
    #[error("engine did not respond within {0:?}")]
    Timeout(Duration),

    /// The reader thread exited while verdicts were still expected.
    #[error("engine session ended before all verdicts arrived")]
    EngineGone,

    /// Normalization ran out of generic terms.
    #[error("too many distinct entities for normalization: {0} (limit 9)")]
    TooManyEntities(usize),

    /// Relation name outside the 14-entry vocabulary.
    #[error("unknown relation: {0}")]
    UnknownRelation(String),

    /// Verdict string outside the engine's response vocabulary.
    #[error("invalid verdict: {0}")]
    InvalidVerdict(String),

    /// Policy name outside the configured set. Raised at configuration
    /// time, never at decision time.
    #[error("invalid decision policy: {0} (expected skeptical, credulous, initial or adapted)")]
    InvalidPolicy(String),

    /// Malformed configuration file.
    #[error("invalid configuration: {0}")]
    Config(String),
}
