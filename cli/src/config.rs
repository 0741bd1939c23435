//! Scenario configuration for the demo binary.
//!
//! The binary accepts an optional path to a TOML scenario file; without
//! one it runs the built-in set, which mirrors the classic timeout demo:
//! three sleeper races, a never-terminating command, and a command that
//! finishes comfortably inside the default deadline.
//!
//! ```toml
//! [shell]
//! binary = "bash"
//! args = ["-c"]
//!
//! [[sleeper]]
//! sleep_secs = 1
//! deadline_secs = 10
//!
//! [[process]]
//! command = "sleep 2 && echo done"
//! deadline_secs = 3   # optional, defaults to 3
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use leash_proc::ShellConfig;

/// Serde helper: the process deadline defaults to 3 seconds.
const fn default_deadline_secs() -> u64 {
    3
}

#[derive(Debug, Default, Deserialize)]
pub struct ScenarioFile {
    /// Optional shell override for `[[process]]` command strings.
    pub shell: Option<ShellConfig>,
    #[serde(default)]
    pub sleeper: Vec<SleeperScenario>,
    #[serde(default)]
    pub process: Vec<ProcessScenario>,
}

/// One in-process race: sleep `sleep_secs`, abandon after `deadline_secs`.
#[derive(Debug, Deserialize)]
pub struct SleeperScenario {
    pub sleep_secs: u64,
    pub deadline_secs: u64,
}

impl SleeperScenario {
    pub fn sleep_for(&self) -> Duration {
        Duration::from_secs(self.sleep_secs)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// One subprocess race: run `command` through the shell, kill it after
/// `deadline_secs`.
#[derive(Debug, Deserialize)]
pub struct ProcessScenario {
    pub command: String,
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

impl ProcessScenario {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

impl ScenarioFile {
    /// The built-in demo set used when no scenario file is given.
    pub fn builtin() -> Self {
        Self {
            shell: None,
            sleeper: vec![
                SleeperScenario {
                    sleep_secs: 1,
                    deadline_secs: 10,
                },
                SleeperScenario {
                    sleep_secs: 10,
                    deadline_secs: 2,
                },
                SleeperScenario {
                    sleep_secs: 3,
                    deadline_secs: 3,
                },
            ],
            process: vec![
                // Never terminates on its own; the runner has to kill it.
                ProcessScenario {
                    command: "while :; do sleep 1; done".to_string(),
                    deadline_secs: 3,
                },
                ProcessScenario {
                    command: "sleep 2 && echo done after 2s".to_string(),
                    deadline_secs: 3,
                },
            ],
        }
    }
}

/// Load a scenario file, reporting read and parse failures distinctly.
pub fn load(path: &Path) -> anyhow::Result<ScenarioFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario file {}", path.display()))?;
    let file = toml::from_str(&raw)
        .with_context(|| format!("parsing scenario file {}", path.display()))?;
    Ok(file)
}
