//! End-to-end runner tests against real child processes (Unix only).
#![cfg(unix)]

use std::time::Duration;

use leash_proc::{CommandSpec, DetectedShell, ExecError, ProcessRunner};

fn sh() -> DetectedShell {
    DetectedShell {
        binary: std::path::PathBuf::from("/bin/sh"),
        args: vec!["-c".to_string()],
        name: "sh".to_string(),
    }
}

fn runner(command: &str, deadline: Duration) -> ProcessRunner {
    ProcessRunner::new(CommandSpec::shell(&sh(), command)).deadline(deadline)
}

/// True when no process with `pid` exists anymore.
fn pid_is_gone(pid: u32) -> bool {
    // SAFETY: signal 0 only probes for existence.
    let rc = unsafe { libc::kill(pid as i32, 0) };
    rc == -1 && std::io::Error::last_os_error().raw_os_error() == Some(libc::ESRCH)
}

#[tokio::test]
async fn short_command_returns_full_output() {
    let output = runner("echo hello", Duration::from_secs(3))
        .run()
        .await
        .expect("echo should succeed");
    assert_eq!(output, "hello\n");
}

#[tokio::test]
async fn nonzero_exit_is_distinct_and_carries_output() {
    let err = runner("echo oops; exit 3", Duration::from_secs(3))
        .run()
        .await
        .expect_err("exit 3 should fail");
    match &err {
        ExecError::NonZeroExit { code, output } => {
            assert_eq!(*code, 3);
            assert!(output.contains("oops"));
        }
        other => panic!("expected NonZeroExit, got {other:?}"),
    }
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn missing_executable_is_a_spawn_failure() {
    let err = ProcessRunner::new(CommandSpec::new("/definitely/not/a/binary"))
        .run()
        .await
        .expect_err("spawn should fail");
    assert!(matches!(err, ExecError::Spawn { .. }));
    assert!(err.output().is_none());
}

#[tokio::test]
async fn hung_process_is_killed_at_the_deadline() {
    let err = runner("echo started; exec sleep 30", Duration::from_millis(500))
        .run()
        .await
        .expect_err("sleep 30 must not finish in 500ms");

    match err {
        ExecError::Timeout {
            deadline,
            pid,
            output,
            ..
        } => {
            assert_eq!(deadline, Duration::from_millis(500));
            // Output flushed well before the deadline must be present; the
            // exact byte count at kill time is not deterministic beyond that.
            assert!(output.contains("started"), "captured: {output:?}");

            let pid = pid.expect("pid known before the kill");
            assert!(pid_is_gone(pid), "pid {pid} still alive after timeout kill");
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn silent_hung_process_still_times_out() {
    let err = runner("exec sleep 30", Duration::from_millis(200))
        .run()
        .await
        .expect_err("must time out");
    assert!(err.is_timeout());
    // Empty capture is legal on the timeout path.
    assert_eq!(err.output(), Some(""));
}

#[tokio::test]
async fn signal_death_within_deadline_is_not_a_timeout() {
    let err = runner("kill -KILL $$", Duration::from_secs(3))
        .run()
        .await
        .expect_err("self-kill should fail");
    assert!(matches!(err, ExecError::KilledBySignal { .. }));
}

#[tokio::test]
async fn repeated_runs_classify_identically() {
    for _ in 0..3 {
        let output = runner("echo ok", Duration::from_secs(3))
            .run()
            .await
            .expect("echo should succeed every time");
        assert_eq!(output, "ok\n");
    }
}

#[tokio::test]
async fn script_file_runs_by_path() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("greet.sh");
    std::fs::write(&path, "#!/bin/sh\necho from-script\n").expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod script");

    let output = ProcessRunner::new(CommandSpec::new(&path))
        .run()
        .await
        .expect("script should succeed");
    assert_eq!(output, "from-script\n");
}

#[tokio::test]
async fn concurrent_runs_do_not_interfere() {
    let fast = runner("echo fast", Duration::from_secs(3)).run();
    let slow = runner("exec sleep 30", Duration::from_millis(300)).run();

    let (fast, slow) = tokio::join!(fast, slow);
    assert_eq!(fast.expect("fast run succeeds"), "fast\n");
    assert!(slow.expect_err("slow run times out").is_timeout());
}
