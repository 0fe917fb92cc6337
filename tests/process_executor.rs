// tests/process_executor.rs

mod common;
use crate::common::init_tracing;

use std::time::{Duration, Instant};

use dagsched::config::ExecutorSection;
use dagsched::exec::command::{default_shell, shell_command};
use dagsched::exec::{ExitOutcome, ProcessExecutor, ShellExecutor};

#[test]
fn builds_the_platform_shell_invocation() {
    let cmd = shell_command(None, "echo hi");
    assert_eq!(cmd.get_program(), default_shell());

    let args: Vec<_> = cmd.get_args().collect();
    let flag = if cfg!(windows) { "/C" } else { "-c" };
    assert_eq!(args, vec![flag, "echo hi"]);
}

#[test]
fn cmd_exe_override_uses_slash_c() {
    let cmd = shell_command(Some("CMD.EXE"), "dir");
    let args: Vec<_> = cmd.get_args().collect();
    assert_eq!(args, vec!["/C", "dir"]);

    let cmd = shell_command(Some("bash"), "ls");
    let args: Vec<_> = cmd.get_args().collect();
    assert_eq!(args, vec!["-c", "ls"]);
}

#[test]
fn shell_override_may_be_a_borrowed_string() {
    let configured = ExecutorSection {
        shell: Some("bash".to_string()),
        capture_output: false,
    };

    let cmd = shell_command(configured.shell.as_deref(), "echo hi");
    assert_eq!(cmd.get_program(), "bash");
}

#[cfg(unix)]
#[test]
fn exit_status_maps_to_outcome() {
    init_tracing();

    let executor = ShellExecutor::new();
    assert_eq!(executor.execute("true"), ExitOutcome::Success);
    assert_eq!(executor.execute("exit 0"), ExitOutcome::Success);
    assert_eq!(executor.execute("exit 1"), ExitOutcome::Failed(1));
    assert_eq!(executor.execute("exit 42"), ExitOutcome::Failed(42));
}

#[cfg(unix)]
#[test]
fn unknown_command_is_a_shell_failure() {
    init_tracing();

    let outcome = ShellExecutor::new().execute("definitely-not-a-real-command-xyz");
    assert_eq!(outcome, ExitOutcome::Failed(127));
}

#[test]
fn missing_shell_program_fails_with_minus_one() {
    init_tracing();

    let executor = ShellExecutor::new().with_shell("/nonexistent/dagsched-shell");
    assert_eq!(executor.execute("true"), ExitOutcome::Failed(-1));
}

#[cfg(unix)]
#[test]
fn killed_process_fails_with_minus_one() {
    init_tracing();

    let outcome = ShellExecutor::new().execute("kill -9 $$");
    assert_eq!(outcome, ExitOutcome::Failed(-1));
}

#[cfg(unix)]
#[test]
fn captured_output_does_not_change_the_outcome() {
    init_tracing();

    let executor = ShellExecutor::from_config(&ExecutorSection {
        shell: Some("sh".to_string()),
        capture_output: true,
    });

    let script = "for i in 1 2 3; do echo out $i; echo err $i >&2; done; exit 3";
    assert_eq!(executor.execute(script), ExitOutcome::Failed(3));
    assert_eq!(executor.execute("echo fine"), ExitOutcome::Success);
}

#[cfg(unix)]
#[test]
fn background_child_holding_captured_pipes_does_not_block() {
    init_tracing();

    let executor = ShellExecutor::new().capture_output(true);

    let started = Instant::now();
    let outcome = executor.execute("sleep 3 & echo started; exit 0");
    let elapsed = started.elapsed();

    assert_eq!(outcome, ExitOutcome::Success);
    assert!(
        elapsed < Duration::from_secs(2),
        "execute returned {elapsed:?} after the shell exited"
    );
}

#[cfg(unix)]
#[test]
fn background_child_does_not_hide_the_exit_code() {
    init_tracing();

    let executor = ShellExecutor::new().capture_output(true);
    assert_eq!(executor.execute("sleep 3 & exit 7"), ExitOutcome::Failed(7));
}

#[test]
fn outcome_accessors() {
    assert!(ExitOutcome::Success.is_success());
    assert_eq!(ExitOutcome::Success.exit_code(), 0);
    assert!(!ExitOutcome::Failed(5).is_success());
    assert_eq!(ExitOutcome::Failed(5).exit_code(), 5);
}
