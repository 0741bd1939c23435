//! Racing a unit of work against a deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// The deadline elapsed before the racing task produced its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deadline of {deadline:?} elapsed before the task completed")]
pub struct DeadlineExceeded {
    /// The wait budget the race was given.
    pub deadline: Duration,
}

/// Result of racing a task against a deadline.
///
/// Exactly one variant is produced per race; the losing side never
/// affects the returned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceOutcome<T> {
    /// The task produced its value before the deadline elapsed.
    Completed(T),
    /// The deadline fired first. The losing task is not cancelled by the
    /// race; if it was spawned, it keeps running detached.
    TimedOut(DeadlineExceeded),
}

impl<T> RaceOutcome<T> {
    #[must_use]
    pub fn is_timed_out(&self) -> bool {
        matches!(self, RaceOutcome::TimedOut(_))
    }

    /// Convert into a `Result`, mapping a timeout to its error.
    pub fn into_result(self) -> Result<T, DeadlineExceeded> {
        match self {
            RaceOutcome::Completed(value) => Ok(value),
            RaceOutcome::TimedOut(err) => Err(err),
        }
    }
}

/// Wait for `task` or for `deadline` to elapse, whichever happens first.
///
/// The race observes completion; it does not own starting the work, and
/// the deadline clock starts here, not when the task started. A future
/// passed in directly is dropped (and therefore cancelled) when the
/// deadline wins; pass a [`tokio::task::JoinHandle`] instead to let the
/// loser keep running in the background.
///
/// `tokio::select!` polls its branches in random order, so a task that
/// becomes ready at the same instant the deadline fires may legitimately
/// win or lose. A zero deadline times out immediately unless the task is
/// already ready at the first poll.
pub async fn race<F: Future>(task: F, deadline: Duration) -> RaceOutcome<F::Output> {
    tokio::select! {
        value = task => RaceOutcome::Completed(value),
        () = sleep(deadline) => {
            tracing::debug!(?deadline, "race lost to deadline");
            RaceOutcome::TimedOut(DeadlineExceeded { deadline })
        }
    }
}
