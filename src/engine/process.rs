//! Engine child process lifecycle and line-oriented writes.

use std::io::Write;
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex};

use crate::error::{Result, SibylError};

/// Shared handle for writing lines to the engine's stdin.
///
/// The reader thread needs one for the recovery directive; the caller
/// thread uses the session's. The single-flight protocol keeps the two
/// from interleaving mid-query, the mutex keeps individual lines atomic.
#[derive(Clone)]
pub struct EngineWriter {
    stdin: Arc<Mutex<ChildStdin>>,
}

impl EngineWriter {
    /// Write a trimmed line plus terminator and flush immediately.
    pub fn send_line(&self, text: &str) -> Result<()> {
        let line = text.trim();
        log::debug!("send: {}", line);
        let mut stdin = self.stdin.lock().unwrap_or_else(|poison| poison.into_inner());
        writeln!(stdin, "{}", line)?;
        stdin.flush()?;
        Ok(())
    }
}

/// The engine child process and its byte streams.
pub struct EngineProcess {
    child: Child,
    writer: EngineWriter,
    stdout: Option<ChildStdout>,
}

impl EngineProcess {
    /// Launch the engine executable with piped stdin/stdout.
    ///
    /// stderr stays inherited: the protocol lives entirely on stdout and
    /// engine diagnostics remain visible to the operator.
    pub fn spawn(executable: &Path, args: &[String]) -> Result<Self> {
        let mut child = Command::new(executable)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                SibylError::Startup(format!("failed to launch {}: {}", executable.display(), e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SibylError::Startup("engine stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SibylError::Startup("engine stdout not captured".to_string()))?;

        log::info!("engine started: {} (pid {})", executable.display(), child.id());

        Ok(Self {
            child,
            writer: EngineWriter {
                stdin: Arc::new(Mutex::new(stdin)),
            },
            stdout: Some(stdout),
        })
    }

    /// Clone a stdin handle for the reader thread.
    pub fn writer(&self) -> EngineWriter {
        self.writer.clone()
    }

    /// Write a line to the engine. Fails with an I/O error once the
    /// stream is closed; a failed send is fatal to the session.
    pub fn send_line(&self, text: &str) -> Result<()> {
        self.writer.send_line(text)
    }

    /// Surrender the stdout stream to the reader. Yields `None` on the
    /// second call; there is exactly one reader per process.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.stdout.take()
    }

    /// Verify the child has not exited.
    pub fn ensure_running(&mut self) -> Result<()> {
        match self.child.try_wait() {
            Ok(None) => Ok(()),
            Ok(Some(status)) => Err(SibylError::Startup(format!(
                "engine process exited early: {}",
                status
            ))),
            Err(e) => Err(SibylError::Io(e)),
        }
    }

    /// Force-kill the child. Last resort when the handshake never ran.
    pub fn kill(&mut self) {
        if self.child.kill().is_ok() {
            let _ = self.child.wait();
            log::warn!("engine process killed without handshake");
        }
    }
}
