// tests/shell_session.rs

mod common;
use crate::common::fake_executor::FakeExecutor;
use crate::common::{blocking_with_timeout, init_tracing, wait_until};

use std::sync::Arc;
use std::time::Duration;

use dagsched::board::TaskBoard;
use dagsched::shell::{HELP_TEXT, Shell, ShellCommand, ShellFlow, parse_command, tokenize_line};
use dagsched::types::TaskStatus;

/// Feed lines to a shell and collect what it printed.
struct Session {
    shell: Shell,
}

impl Session {
    fn new() -> Self {
        Self::with_executor(Arc::new(FakeExecutor::new()))
    }

    fn with_executor(executor: Arc<FakeExecutor>) -> Self {
        Self {
            shell: Shell::new(TaskBoard::new(executor), 2),
        }
    }

    /// Returns (stdout, stderr, flow).
    fn send(&mut self, line: &str) -> (String, String, ShellFlow) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let flow = self.shell.execute_line(line, &mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
            flow,
        )
    }

    fn out(&mut self, line: &str) -> String {
        let (out, err, _) = self.send(line);
        assert!(err.is_empty(), "unexpected error output for {line:?}: {err}");
        out
    }

    fn err(&mut self, line: &str) -> String {
        let (out, err, _) = self.send(line);
        assert!(out.is_empty(), "unexpected output for {line:?}: {out}");
        err
    }
}

#[test]
fn tokenizer_keeps_quoted_commands_together() {
    assert_eq!(
        tokenize_line(r#"add_task build "make -j 4" 0 30"#),
        vec!["add_task", "build", "make -j 4", "0", "30"]
    );
    assert_eq!(tokenize_line("   "), Vec::<String>::new());
    assert_eq!(tokenize_line(r#"a "unterminated quote"#), vec!["a", "unterminated quote"]);
    assert_eq!(tokenize_line(&"x ".repeat(40)).len(), 16);
}

#[test]
fn parser_validates_arguments() {
    let parse = |line: &str| parse_command(&tokenize_line(line));

    assert_eq!(
        parse(r#"add_task A "echo a" 5 0"#),
        Ok(ShellCommand::AddTask {
            id: "A".into(),
            cmd: "echo a".into(),
            time: 5,
            freq: 0,
        })
    );
    assert_eq!(parse("add_task A cmd -1 0"), Err("Invalid time".to_string()));
    assert_eq!(parse("add_task A cmd 0 x"), Err("Invalid freq".to_string()));
    assert_eq!(parse("run 0"), Err("Invalid worker count".to_string()));
    assert_eq!(parse("run"), Ok(ShellCommand::Run(None)));
    assert_eq!(parse("run 3"), Ok(ShellCommand::Run(Some(3))));
    assert_eq!(
        parse("frobnicate"),
        Err("Unknown command (type 'help')".to_string())
    );
}

#[test]
fn building_a_graph_interactively() {
    init_tracing();

    let mut s = Session::new();

    assert_eq!(s.out("show tasks"), "No tasks.\n");
    assert_eq!(s.out("show deps"), "No dependencies.\n");

    assert_eq!(s.out(r#"add_task A "echo a" 0 0"#), "Task 'A' added.\n");
    assert_eq!(s.out(r#"add_task B "echo b" 10 5"#), "Task 'B' added.\n");
    assert_eq!(s.err(r#"add_task A "again" 0 0"#), "[error] Task ID already exists\n");

    assert_eq!(s.out("add_dep A B"), "Dependency 'A'->'B' added.\n");
    assert_eq!(s.err("add_dep A B"), "[error] Dependency already exists\n");
    assert_eq!(s.err("add_dep B A"), "[error] Adding this would create a cycle\n");
    assert_eq!(s.err("add_dep A Z"), "[error] Unknown task ID\n");

    assert_eq!(
        s.out("show tasks"),
        "[0] A: time=0 freq=0 status=PENDING\n[1] B: time=10 freq=5 status=PENDING\n"
    );
    assert_eq!(s.out("show deps"), "A -> B\nB -> \n");
    assert_eq!(s.out("show order"), "Topological order: A B\n");
}

#[test]
fn usage_errors_are_reported() {
    init_tracing();

    let mut s = Session::new();
    assert_eq!(
        s.err("add_task A"),
        "[error] Usage: add_task <id> \"<cmd>\" <time> <freq>\n"
    );
    assert_eq!(s.err("add_dep A"), "[error] Usage: add_dep <from> <to>\n");
    assert_eq!(s.err("show"), "[error] Usage: show tasks|deps|order\n");
    assert_eq!(s.err("show everything"), "[error] Unknown show option\n");
    assert_eq!(s.err("run 1 2"), "[error] Usage: run [n_workers]\n");
    assert_eq!(s.err("nope"), "[error] Unknown command (type 'help')\n");
    assert_eq!(s.err("run"), "[error] No tasks to run.\n");
    assert_eq!(s.out("stop"), "No scheduler running.\n");
}

#[test]
fn direct_run_rejects_an_empty_graph() {
    init_tracing();

    let mut s = Session::new();
    let mut out = Vec::new();
    let mut err = Vec::new();
    s.shell.run(None, &mut out, &mut err).unwrap();

    assert!(out.is_empty());
    assert_eq!(String::from_utf8(err).unwrap(), "[error] No tasks to run.\n");
    assert!(!s.shell.board().is_running());
}

#[test]
fn blank_lines_help_and_exit() {
    init_tracing();

    let mut s = Session::new();
    assert_eq!(s.send("   \n"), (String::new(), String::new(), ShellFlow::Continue));
    assert_eq!(s.out("help"), HELP_TEXT);

    let (_, _, flow) = s.send("exit");
    assert_eq!(flow, ShellFlow::Exit);
}

#[tokio::test]
async fn run_and_stop_from_the_shell() {
    init_tracing();

    blocking_with_timeout(|| {
        let executor = Arc::new(FakeExecutor::new().with_delay(Duration::from_millis(2)));
        let mut s = Session::with_executor(executor.clone());

        s.out(r#"add_task A "a" 0 0"#);
        s.out(r#"add_task B "b" 0 0"#);
        s.out("add_dep A B");

        assert_eq!(s.out("run"), "Scheduler started with 2 workers.\n");

        let done = || {
            s.shell
                .board()
                .list_tasks()
                .iter()
                .all(|t| t.status == TaskStatus::Completed)
        };
        assert!(wait_until(Duration::from_secs(4), done));

        assert!(s.err(r#"add_task C "c" 0 0"#).contains("stop it first"));
        assert!(s.out("show tasks").contains("status=COMPLETED"));

        assert_eq!(s.out("stop"), "Scheduler stopped.\n");
        assert_eq!(s.out(r#"add_task C "c" 0 0"#), "Task 'C' added.\n");

        assert_eq!(s.out("run 1"), "Scheduler started with 1 workers.\n");
        s.shell.shutdown();
        assert!(!s.shell.board().is_running());
    })
    .await;
}
