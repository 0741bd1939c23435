//! Deadline-bounded external process execution.
//!
//! [`ProcessRunner`] launches a child process, streams its stdout into an
//! in-memory buffer while it runs, and races its exit against a deadline
//! (3 seconds unless overridden). Losing the race gets the process killed;
//! whatever output was captured by then is preserved in the error.
//!
//! Unlike the plain deadline race in `leash-core`, this is the variant
//! with real cancellation: the runner exclusively owns the child handle
//! and is solely responsible for terminating it.

use std::time::Duration;

pub mod command;
pub mod guard;
pub mod runner;
pub mod shell;

pub use command::CommandSpec;
pub use guard::{ChildGuard, KillOutcome};
pub use runner::{DEFAULT_DEADLINE, ProcessRunner};
pub use shell::{DetectedShell, ShellConfig, detect_shell};

/// Error types for deadline-bounded process execution.
///
/// Callers must be able to tell a process that never started from one
/// that was killed at the deadline and from one that ran to completion
/// but failed on its own; each gets its own variant. Message text is
/// diagnostic only.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The process could not be launched at all.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The deadline elapsed first; the process was killed. `output` holds
    /// whatever stdout had been captured up to the kill point.
    #[error("`{program}` did not finish within {deadline:?} and was killed")]
    Timeout {
        program: String,
        deadline: Duration,
        pid: Option<u32>,
        output: String,
    },
    /// The process exited within the deadline, but with a non-zero code.
    #[error("process exited with code {code}")]
    NonZeroExit { code: i32, output: String },
    /// The process exited within the deadline, but was terminated by a
    /// signal it did not receive from us.
    #[error("process terminated by signal")]
    KilledBySignal { output: String },
    /// Waiting on the child failed at the OS level.
    #[error("failed to wait on process: {source}")]
    Wait {
        #[source]
        source: std::io::Error,
    },
}

impl ExecError {
    /// Partial stdout captured before the failure, where one exists.
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        match self {
            ExecError::Timeout { output, .. }
            | ExecError::NonZeroExit { output, .. }
            | ExecError::KilledBySignal { output } => Some(output),
            ExecError::Spawn { .. } | ExecError::Wait { .. } => None,
        }
    }

    /// True when the failure was the deadline, not the process itself.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecError::Timeout { .. })
    }
}
