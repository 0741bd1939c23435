//! Leash demo - races in-process sleepers and subprocesses against
//! deadlines.
//!
//! Each scenario prints `<result>` on success or `<error>\t(error)` on
//! failure to stdout. The exit code is always 0 when the scenarios ran:
//! an individual timeout is an expected outcome, not a program failure.
//! Logs go to stderr so stdout stays machine-readable.

mod config;

use std::path::Path;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use leash_core::run_sleeper;
use leash_proc::{CommandSpec, ProcessRunner, detect_shell};

use crate::config::ScenarioFile;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print one race result in the demo's output contract.
fn report<E: std::fmt::Display>(result: Result<String, E>) {
    match result {
        Ok(value) => println!("{}", value.trim_end_matches('\n')),
        Err(err) => println!("{err}\t(error)"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let scenarios = match std::env::args().nth(1) {
        Some(path) => config::load(Path::new(&path))?,
        None => ScenarioFile::builtin(),
    };

    let shell = detect_shell(scenarios.shell.as_ref());
    tracing::info!(
        %shell,
        sleepers = scenarios.sleeper.len(),
        processes = scenarios.process.len(),
        "running scenarios"
    );

    for scenario in &scenarios.sleeper {
        report(run_sleeper(scenario.sleep_for(), scenario.deadline()).await);
    }

    for scenario in &scenarios.process {
        let runner = ProcessRunner::new(CommandSpec::shell(&shell, &scenario.command))
            .deadline(scenario.deadline());
        report(runner.run().await);
    }

    Ok(())
}
