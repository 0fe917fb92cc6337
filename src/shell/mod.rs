// src/shell/mod.rs

//! Line-oriented interactive front end.
//!
//! - [`tokenize`] splits a line into tokens, honouring double quotes.
//! - [`commands`] turns tokens into a typed [`ShellCommand`].
//!
//! [`Shell`] itself is synchronous and writes to the writers it is given,
//! so sessions can be driven from tests; the async stdin / Ctrl-C driver
//! lives in the crate root.

pub mod commands;
pub mod tokenize;

use std::io::{self, Write};

use tracing::debug;

use crate::board::TaskBoard;
use crate::errors::DagschedError;

pub use commands::{HELP_TEXT, ShellCommand, ShowTarget, parse_command};
pub use tokenize::tokenize_line;

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlow {
    Continue,
    Exit,
}

#[derive(Debug)]
pub struct Shell {
    board: TaskBoard,
    default_workers: usize,
}

impl Shell {
    pub fn new(board: TaskBoard, default_workers: usize) -> Self {
        Self {
            board,
            default_workers,
        }
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut TaskBoard {
        &mut self.board
    }

    /// Handle one input line. Regular output goes to `out`, error messages
    /// (`[error] ...`) to `err`.
    pub fn execute_line(
        &mut self,
        line: &str,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> io::Result<ShellFlow> {
        let tokens = tokenize_line(line.trim_end_matches(['\r', '\n']));
        if tokens.is_empty() {
            return Ok(ShellFlow::Continue);
        }

        let command = match parse_command(&tokens) {
            Ok(command) => command,
            Err(msg) => {
                print_error(err, &msg)?;
                return Ok(ShellFlow::Continue);
            }
        };

        debug!(?command, "shell command");
        self.execute(command, out, err)
    }

    /// Stop the running scheduler, if any. Called when the session ends.
    pub fn shutdown(&mut self) {
        self.board.stop_scheduler();
    }

    fn execute(
        &mut self,
        command: ShellCommand,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> io::Result<ShellFlow> {
        match command {
            ShellCommand::AddTask {
                id,
                cmd,
                time,
                freq,
            } => match self.board.add_task(&id, &cmd, time, freq) {
                Ok(_) => writeln!(out, "Task '{id}' added.")?,
                Err(DagschedError::DuplicateTaskId(_)) => {
                    print_error(err, "Task ID already exists")?
                }
                Err(e @ DagschedError::GraphBusy) => print_error(err, &e.to_string())?,
                Err(_) => print_error(err, "Failed to add task")?,
            },
            ShellCommand::AddDep { from, to } => match self.board.add_dependency(&from, &to) {
                Ok(()) => writeln!(out, "Dependency '{from}'->'{to}' added.")?,
                Err(DagschedError::UnknownTaskId(_)) => print_error(err, "Unknown task ID")?,
                Err(DagschedError::DuplicateEdge { .. }) => {
                    print_error(err, "Dependency already exists")?
                }
                Err(DagschedError::CycleDetected(_)) => {
                    print_error(err, "Adding this would create a cycle")?
                }
                Err(e @ DagschedError::GraphBusy) => print_error(err, &e.to_string())?,
                Err(_) => print_error(err, "Failed to add dependency")?,
            },
            ShellCommand::Show(target) => self.show(target, out, err)?,
            ShellCommand::Run(workers) => self.run(workers, out, err)?,
            ShellCommand::Stop => {
                if self.board.is_running() {
                    self.board.stop_scheduler();
                    writeln!(out, "Scheduler stopped.")?;
                } else {
                    writeln!(out, "No scheduler running.")?;
                }
            }
            ShellCommand::Help => write!(out, "{HELP_TEXT}")?,
            ShellCommand::Exit => return Ok(ShellFlow::Exit),
        }

        Ok(ShellFlow::Continue)
    }

    fn show(&self, target: ShowTarget, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
        match target {
            ShowTarget::Tasks => {
                let tasks = self.board.list_tasks();
                if tasks.is_empty() {
                    writeln!(out, "No tasks.")?;
                }
                for t in tasks {
                    writeln!(
                        out,
                        "[{}] {}: time={} freq={} status={}",
                        t.index, t.id, t.scheduled_time, t.frequency, t.status
                    )?;
                }
            }
            ShowTarget::Deps => {
                let deps = self.board.list_dependencies();
                if deps.iter().all(|(_, succs)| succs.is_empty()) {
                    writeln!(out, "No dependencies.")?;
                    return Ok(());
                }
                for (id, succs) in deps {
                    writeln!(out, "{id} -> {}", succs.join(" "))?;
                }
            }
            ShowTarget::Order => match self.board.topological_order() {
                Ok(order) if order.is_empty() => writeln!(out, "No tasks.")?,
                Ok(order) => writeln!(out, "Topological order: {}", order.join(" "))?,
                Err(e) => print_error(err, &e.to_string())?,
            },
        }
        Ok(())
    }

    /// Start the worker pool with `workers`, or the default count.
    ///
    /// Rejects an empty graph. Also used by the `--run` flag.
    pub fn run(
        &mut self,
        workers: Option<usize>,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> io::Result<()> {
        if self.board.graph().is_empty() {
            return print_error(err, "No tasks to run.");
        }

        let workers = workers.unwrap_or(self.default_workers);
        match self.board.start_scheduler(workers) {
            Ok(()) => writeln!(out, "Scheduler started with {workers} workers."),
            Err(DagschedError::InvalidWorkerCount(_)) => print_error(err, "Invalid worker count"),
            Err(_) => print_error(err, "Failed to start scheduler"),
        }
    }
}

fn print_error(err: &mut dyn Write, msg: &str) -> io::Result<()> {
    writeln!(err, "[error] {msg}")
}
