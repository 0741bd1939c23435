//! Deadline-bounded process execution with incremental output capture.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use leash_core::{RaceOutcome, race};
use tokio::io::AsyncReadExt;
use tokio::process::ChildStdout;

use crate::ExecError;
use crate::command::CommandSpec;
use crate::guard::ChildGuard;

/// Deadline applied when none is configured.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(3);

/// Runs one external process, streaming stdout into a buffer and killing
/// the process if it outlives its deadline.
///
/// The runner exclusively owns the child handle and the output buffer
/// for the duration of one invocation; instances are consumed by
/// [`ProcessRunner::run`] and never reused.
pub struct ProcessRunner {
    spec: CommandSpec,
    deadline: Duration,
}

impl ProcessRunner {
    #[must_use]
    pub fn new(spec: CommandSpec) -> Self {
        Self {
            spec,
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Override the default 3 second deadline.
    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Launch the process and wait for exit or deadline, whichever comes
    /// first.
    ///
    /// Captured stdout is returned on a clean exit. On timeout and on a
    /// failed exit the same buffer travels inside the error instead -
    /// whatever had been written by then. The byte count present at kill
    /// time is inherently racy and makes no guarantee beyond "what the
    /// reader had flushed".
    pub async fn run(self) -> Result<String, ExecError> {
        let program = self.spec.program_name();
        let mut child = self
            .spec
            .build()
            .spawn()
            .map_err(|source| ExecError::Spawn {
                program: program.clone(),
                source,
            })?;
        let pid = child.id();
        tracing::debug!(%program, ?pid, deadline = ?self.deadline, "process spawned");

        let buffer = Arc::new(Mutex::new(String::new()));
        let reader = child
            .stdout
            .take()
            .map(|stdout| tokio::spawn(capture_stdout(stdout, Arc::clone(&buffer))));

        let mut guard = ChildGuard::new(child);

        let outcome = race(guard.child_mut().wait(), self.deadline).await;
        match outcome {
            RaceOutcome::Completed(status) => {
                let status = status.map_err(|source| ExecError::Wait { source })?;
                guard.disarm();
                // Drain the tail of the pipe before reading the buffer.
                if let Some(reader) = reader {
                    let _ = reader.await;
                }
                let output = take_buffer(&buffer);
                if status.success() {
                    tracing::debug!(%program, "process exited cleanly");
                    Ok(output)
                } else if let Some(code) = status.code() {
                    Err(ExecError::NonZeroExit { code, output })
                } else {
                    Err(ExecError::KilledBySignal { output })
                }
            }
            RaceOutcome::TimedOut(_) => {
                let killed = guard.kill_now().await;
                tracing::warn!(
                    %program,
                    ?pid,
                    ?killed,
                    deadline = ?self.deadline,
                    "deadline exceeded; process killed"
                );
                // The pipe hits EOF once the process group is dead, so the
                // reader finishes with whatever made it out.
                if let Some(reader) = reader {
                    let _ = reader.await;
                }
                Err(ExecError::Timeout {
                    program,
                    deadline: self.deadline,
                    pid,
                    output: take_buffer(&buffer),
                })
            }
        }
    }
}

/// Single writer for the shared buffer; chunks append as they arrive so
/// partial output survives a kill mid-stream.
async fn capture_stdout(mut stdout: ChildStdout, buffer: Arc<Mutex<String>>) {
    let mut buf = [0u8; 4096];
    loop {
        let n = match stdout.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        let chunk = String::from_utf8_lossy(&buf[..n]).to_string();
        if let Ok(mut collected) = buffer.lock() {
            collected.push_str(&chunk);
        }
    }
}

fn take_buffer(buffer: &Arc<Mutex<String>>) -> String {
    buffer
        .lock()
        .map(|mut collected| std::mem::take(&mut *collected))
        .unwrap_or_default()
}
