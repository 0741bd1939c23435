//! Bounded-wait execution: race a unit of work against a deadline.
//!
//! The primitive is [`race`]: wait on a task and a timer concurrently and
//! return whichever resolves first as a [`RaceOutcome`]. The losing task
//! is not cancelled here; process-backed work that must be torn down on
//! timeout lives in the `leash-proc` crate.
//!
//! [`sleeper`] provides the in-process demonstration workload: a spawned
//! task that sleeps a configured duration and then reports completion.

pub mod race;
pub mod sleeper;

pub use race::{DeadlineExceeded, RaceOutcome, race};
pub use sleeper::{SleeperError, run_sleeper, spawn_sleeper};
