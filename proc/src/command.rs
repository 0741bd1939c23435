//! Describing the command a runner will launch.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use crate::shell::DetectedShell;

/// Specification of one external process invocation.
///
/// Built once per run; the runner does not reuse specs across
/// invocations, so there is no pooling or shared state here.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
}

impl CommandSpec {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    /// Run `command` as a one-liner through the given shell
    /// (e.g. `bash -c 'sleep 2 && echo done'`).
    #[must_use]
    pub fn shell(shell: &DetectedShell, command: impl Into<String>) -> Self {
        let mut args = shell.args.clone();
        args.push(command.into());
        Self {
            program: shell.binary.clone(),
            args,
            env: Vec::new(),
            cwd: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Program name for diagnostics.
    #[must_use]
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    /// Assemble the `tokio::process::Command`. stdout is piped for
    /// incremental capture; stderr stays on the parent's. On Unix the
    /// child gets its own session so the whole process group can be
    /// killed at once.
    pub(crate) fn build(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        #[cfg(unix)]
        crate::guard::set_new_session(&mut cmd);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandSpec, DetectedShell, PathBuf};

    #[test]
    fn shell_spec_appends_command_after_shell_args() {
        let shell = DetectedShell {
            binary: PathBuf::from("/bin/sh"),
            args: vec!["-c".to_string()],
            name: "sh".to_string(),
        };
        let spec = CommandSpec::shell(&shell, "echo hi");
        assert_eq!(spec.program, PathBuf::from("/bin/sh"));
        assert_eq!(spec.args, vec!["-c", "echo hi"]);
    }

    #[test]
    fn builder_accumulates_args_env_and_cwd() {
        let spec = CommandSpec::new("printenv")
            .arg("GREETING")
            .env("GREETING", "hello")
            .current_dir("/tmp");
        assert_eq!(spec.program_name(), "printenv");
        assert_eq!(spec.args, vec!["GREETING"]);
        assert_eq!(
            spec.env,
            vec![("GREETING".to_string(), "hello".to_string())]
        );
        assert_eq!(spec.cwd, Some(PathBuf::from("/tmp")));
    }
}
