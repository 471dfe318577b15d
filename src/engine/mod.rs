//! Engine communication channel.
//!
//! The external reasoner runs as a long-lived child process speaking a
//! line protocol. [`process`] owns the child and its streams, [`reader`]
//! classifies output lines on a background thread, and [`session`] layers
//! synchronous request/response semantics on top.

pub mod markers;
pub mod process;
pub mod reader;
pub mod session;

pub use markers::{Classification, MarkerTable};
pub use process::{EngineProcess, EngineWriter};
pub use reader::ResponseReader;
pub use session::EngineSession;

/// Recovery directive sent when the known engine error line is observed.
pub(crate) const POP_DIRECTIVE: &str = ":POP";

/// First half of the termination handshake: makes the engine echo the
/// sentinel the reader is watching for.
pub(crate) const ANNOUNCE_TERMINATE: &str = "(prin1 \"TERMINATE\")";

/// Final shutdown directive, sent only after the reader has joined.
pub(crate) const QUIT_DIRECTIVE: &str = "(quit)";
