//! RAII ownership of a spawned child process.

use tokio::process::Child;

/// Outcome of a best-effort kill attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    /// The process (group) was already gone when the kill was attempted.
    NotRunning,
    /// The kill signal was delivered.
    Killed,
}

/// RAII guard that kills a child process (and its process group on Unix)
/// on drop.
///
/// Wrap a spawned `tokio::process::Child` immediately after `spawn()` so
/// the child is cleaned up if the owning future is cancelled. Call
/// [`ChildGuard::disarm`] after the process exits normally to prevent
/// the kill.
pub struct ChildGuard {
    child: Option<Child>,
}

impl ChildGuard {
    #[must_use]
    pub fn new(child: Child) -> Self {
        Self { child: Some(child) }
    }

    pub fn child_mut(&mut self) -> &mut Child {
        self.child.as_mut().expect("child present")
    }

    /// The process exited on its own; drop must no longer kill.
    pub fn disarm(&mut self) {
        self.child = None;
    }

    /// Forcibly terminate the child now and reap it.
    ///
    /// Best-effort by contract: a child that already exited between the
    /// deadline firing and this call is reported as
    /// [`KillOutcome::NotRunning`], never as an error.
    pub async fn kill_now(&mut self) -> KillOutcome {
        let Some(child) = self.child.as_mut() else {
            return KillOutcome::NotRunning;
        };

        let already_gone = matches!(child.try_wait(), Ok(Some(_)));
        if !already_gone {
            #[cfg(unix)]
            {
                match child.id().map(try_kill_process_group) {
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => {
                        let _ = child.start_kill();
                    }
                }
            }
            #[cfg(not(unix))]
            {
                let _ = child.start_kill();
            }
        }

        // Reap so the pid is actually released before the caller checks.
        let _ = child.wait().await;
        self.child = None;

        if already_gone {
            KillOutcome::NotRunning
        } else {
            KillOutcome::Killed
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };
        #[cfg(unix)]
        {
            match child.id().map(try_kill_process_group) {
                Some(Ok(_)) => {}
                Some(Err(_)) | None => {
                    let _ = child.start_kill();
                }
            }
            let _ = child.try_wait();
        }
        #[cfg(not(unix))]
        {
            let _ = child.start_kill();
            let _ = child.try_wait();
        }
    }
}

/// Terminate a process group best-effort (Unix only).
///
/// The runner launches children in their own session, so pid == process
/// group id and this takes down any grandchildren too.
#[cfg(unix)]
pub fn try_kill_process_group(pid: u32) -> std::io::Result<KillOutcome> {
    // SAFETY: raw libc call; ESRCH just means the group is already gone.
    unsafe {
        if libc::killpg(pid as i32, libc::SIGKILL) == -1 {
            let err = std::io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::ESRCH) {
                return Ok(KillOutcome::NotRunning);
            }
            return Err(err);
        }
    }
    Ok(KillOutcome::Killed)
}

/// Put the child process in its own session (Unix only) so the entire
/// process group can be killed via `killpg`.
#[cfg(unix)]
pub fn set_new_session(cmd: &mut tokio::process::Command) {
    use std::os::unix::process::CommandExt;
    unsafe {
        cmd.as_std_mut().pre_exec(|| {
            if libc::setsid() == -1 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }
}
