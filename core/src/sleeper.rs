//! Simulated in-process work: a sleeper task for exercising the race.
//!
//! The sleeper stands in for any dependency that takes a while to answer.
//! It is spawned rather than awaited inline so losing the race leaves it
//! running detached, which is the deliberate fire-and-forget behavior of
//! the plain deadline race.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::race::{RaceOutcome, race};

/// Failure outcomes for a raced sleeper.
///
/// Message text is diagnostic only; callers should match on the variant.
#[derive(Debug, thiserror::Error)]
pub enum SleeperError {
    /// The sleeper outlasted its deadline.
    #[error("slept {sleep_for:?} against a {deadline:?} deadline - timed out")]
    TimedOut {
        sleep_for: Duration,
        deadline: Duration,
    },
    /// The sleeper task itself failed to run to completion.
    #[error("sleeper task failed: {0}")]
    Failed(#[from] tokio::task::JoinError),
}

/// Spawn a task that sleeps for `sleep_for`, then reports both configured
/// durations in its completion string.
#[must_use]
pub fn spawn_sleeper(sleep_for: Duration, deadline: Duration) -> JoinHandle<String> {
    tokio::spawn(async move {
        tokio::time::sleep(sleep_for).await;
        format!("slept {sleep_for:?} within {deadline:?} - complete")
    })
}

/// Race a freshly spawned sleeper against `deadline`.
///
/// On timeout the returned error names both configured durations; the
/// detached sleeper keeps running until its own sleep elapses.
pub async fn run_sleeper(
    sleep_for: Duration,
    deadline: Duration,
) -> Result<String, SleeperError> {
    let handle = spawn_sleeper(sleep_for, deadline);
    match race(handle, deadline).await {
        RaceOutcome::Completed(joined) => Ok(joined?),
        RaceOutcome::TimedOut(_) => Err(SleeperError::TimedOut {
            sleep_for,
            deadline,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{Duration, SleeperError, run_sleeper};

    #[tokio::test(start_paused = true)]
    async fn reports_both_durations_on_success() {
        let message = run_sleeper(Duration::from_secs(1), Duration::from_secs(10))
            .await
            .unwrap();
        assert!(message.contains("1s"), "message: {message}");
        assert!(message.contains("10s"), "message: {message}");
    }

    #[tokio::test(start_paused = true)]
    async fn reports_both_durations_on_timeout() {
        let err = run_sleeper(Duration::from_secs(10), Duration::from_secs(2))
            .await
            .unwrap_err();
        match err {
            SleeperError::TimedOut {
                sleep_for,
                deadline,
            } => {
                assert_eq!(sleep_for, Duration::from_secs(10));
                assert_eq!(deadline, Duration::from_secs(2));
            }
            SleeperError::Failed(e) => panic!("unexpected join failure: {e}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_deadline_always_times_out() {
        let err = run_sleeper(Duration::from_secs(1), Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, SleeperError::TimedOut { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn equal_sleep_and_deadline_resolves_either_way() {
        // Race-dependent boundary: must produce exactly one classification.
        match run_sleeper(Duration::from_secs(3), Duration::from_secs(3)).await {
            Ok(message) => assert!(message.contains("complete")),
            Err(SleeperError::TimedOut { .. }) => {}
            Err(SleeperError::Failed(e)) => panic!("unexpected join failure: {e}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_pairs_classify_identically() {
        for _ in 0..3 {
            assert!(
                run_sleeper(Duration::from_secs(1), Duration::from_secs(10))
                    .await
                    .is_ok()
            );
            assert!(
                run_sleeper(Duration::from_secs(10), Duration::from_secs(2))
                    .await
                    .is_err()
            );
        }
    }
}
