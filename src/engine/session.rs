//! Synchronous query façade over the asynchronous engine transport.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, warn};

use super::markers::MarkerTable;
use super::process::EngineProcess;
use super::reader::ResponseReader;
use super::{ANNOUNCE_TERMINATE, QUIT_DIRECTIVE};
use crate::config::EngineConfig;
use crate::error::{Result, SibylError};
use crate::normalize::NormalizedProblem;
use crate::verdict::Verdict;

/// A live engine session: the child process, its reader thread, and the
/// verdict queue between them.
///
/// The protocol is strictly single-flight - callers must not overlap
/// queries. Verdicts arrive on the queue in the exact order the engine
/// interpreted premises, so a FIFO drain reconstructs the response.
pub struct EngineSession {
    process: EngineProcess,
    reader: Option<ResponseReader>,
    verdicts: Receiver<Verdict>,
    query_timeout: Duration,
    terminated: bool,
}

impl EngineSession {
    /// Spawn the engine, attach the reader, and run the program load
    /// sequence from the configuration.
    pub fn start(config: &EngineConfig) -> Result<Self> {
        let executable = config.resolve_executable()?;
        let mut process = EngineProcess::spawn(&executable, &config.args)?;

        let stdout = process
            .take_stdout()
            .ok_or_else(|| SibylError::Startup("engine stdout already taken".to_string()))?;
        let (tx, rx) = crossbeam_channel::unbounded();
        let reader = ResponseReader::spawn(stdout, process.writer(), MarkerTable::V1, tx)?;

        let mut session = Self {
            process,
            reader: Some(reader),
            verdicts: rx,
            query_timeout: config.query_timeout(),
            terminated: false,
        };

        session.process.ensure_running()?;
        for directive in config.load_directives() {
            session.process.send_line(&directive)?;
        }

        Ok(session)
    }

    /// Submit one normalized problem and block for its verdicts.
    ///
    /// Builds the interpretation directive (one parenthesized group per
    /// sentence), sends it, then drains up to `expected_count` verdicts
    /// from the reader's queue. A False dequeue short-circuits: the
    /// engine stops interpreting an inconsistent chain, so the result is
    /// just `[False]`.
    ///
    /// Each dequeue is bounded by the configured query timeout.
    pub fn query(
        &mut self,
        problem: &NormalizedProblem,
        expected_count: usize,
    ) -> Result<Vec<Verdict>> {
        self.process.ensure_running()?;

        let groups: String = problem
            .sentences()
            .iter()
            .map(|sentence| format!("({})", sentence))
            .collect();
        let command = format!("(interpret '({}))", groups);
        debug!("query: {}", command);

        self.process.send_line(&command)?;

        let mut verdicts = Vec::with_capacity(expected_count);
        for _ in 0..expected_count {
            let verdict = match self.verdicts.recv_timeout(self.query_timeout) {
                Ok(verdict) => verdict,
                Err(RecvTimeoutError::Timeout) => {
                    return Err(SibylError::Timeout(self.query_timeout))
                }
                Err(RecvTimeoutError::Disconnected) => return Err(SibylError::EngineGone),
            };
            if verdict == Verdict::False {
                return Ok(vec![Verdict::False]);
            }
            verdicts.push(verdict);
        }
        Ok(verdicts)
    }

    /// Run the termination handshake: announce termination, wait for the
    /// reader to observe the sentinel and exit, then quit the engine.
    pub fn terminate(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.terminated {
            return Ok(());
        }
        self.terminated = true;

        self.process.send_line(ANNOUNCE_TERMINATE)?;
        debug!("waiting for reader to exit");
        if let Some(reader) = self.reader.take() {
            reader.join();
        }

        // The engine may already be gone once the reader has seen the
        // sentinel; a failed quit is not an error.
        if let Err(e) = self.process.send_line(QUIT_DIRECTIVE) {
            debug!("quit directive not delivered: {}", e);
        }
        Ok(())
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        if !self.terminated {
            // No handshake ran; killing the child closes its stdout and
            // lets the reader thread exit on end-of-stream.
            warn!("engine session dropped without terminate(), killing process");
            self.process.kill();
        }
    }
}
