//! Background reader for the engine's output stream.

use std::io::{BufRead, BufReader};
use std::process::ChildStdout;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use log::{debug, warn};

use super::markers::{Classification, MarkerTable};
use super::process::EngineWriter;
use super::POP_DIRECTIVE;
use crate::error::Result;
use crate::verdict::Verdict;

/// Background task that consumes engine output for the lifetime of a
/// session. Exactly one exists per engine process: the transport is a
/// single ordered byte stream.
///
/// The loop reads a line, trims it, classifies it against the marker
/// table and either emits a verdict, runs the pop recovery, or drops the
/// line as a diagnostic. It exits when it observes the termination
/// sentinel or the stream closes.
pub struct ResponseReader {
    handle: JoinHandle<()>,
}

impl ResponseReader {
    /// Spawn the reader thread over the engine's stdout.
    ///
    /// `writer` is used solely for the recovery directive; `verdicts` is
    /// the ordered channel drained by the session. Sends never block
    /// (unbounded channel, at most one query outstanding).
    pub fn spawn(
        stdout: ChildStdout,
        writer: EngineWriter,
        table: MarkerTable,
        verdicts: Sender<Verdict>,
    ) -> Result<Self> {
        let handle = thread::Builder::new()
            .name("sibyl-reader".to_string())
            .spawn(move || read_loop(stdout, writer, table, verdicts))?;
        Ok(Self { handle })
    }

    /// Block until the reader has exited its loop. Part of the
    /// termination handshake; must run before the final quit directive.
    pub fn join(self) {
        if self.handle.join().is_err() {
            warn!("reader thread panicked");
        }
    }
}

fn read_loop(
    stdout: ChildStdout,
    writer: EngineWriter,
    table: MarkerTable,
    verdicts: Sender<Verdict>,
) {
    debug!("reader started");
    let reader = BufReader::new(stdout);

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("engine stdout read failed: {}", e);
                break;
            }
        };
        let line = line.trim();
        debug!("engine: {}", line);

        match table.classify(line) {
            Classification::Terminate => {
                debug!("termination sentinel observed, reader exiting");
                break;
            }
            Classification::Recover => {
                debug!("recoverable engine error, sending pop");
                if let Err(e) = writer.send_line(POP_DIRECTIVE) {
                    warn!("pop directive failed: {}", e);
                    break;
                }
            }
            Classification::Verdict(verdict) => {
                debug!("verdict: {}", verdict);
                if verdicts.send(verdict).is_err() {
                    // Consumer dropped the session; nothing left to do.
                    break;
                }
            }
            Classification::Diagnostic => {}
        }
    }

    debug!("reader stopped");
}
