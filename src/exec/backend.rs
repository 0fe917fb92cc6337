// src/exec/backend.rs

//! Pluggable process executor abstraction.
//!
//! Workers talk to a `ProcessExecutor` instead of spawning processes
//! directly. Production code uses [`ShellExecutor`]; tests can provide an
//! implementation that records commands and returns scripted outcomes.

use std::fmt;
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::config::ExecutorSection;

use super::ExitOutcome;
use super::command::shell_command;

/// Trait abstracting how a task's command is run.
///
/// `execute` blocks the calling worker until the command has finished.
/// Every failure mode (spawn error, wait error, non-zero exit, killed by a
/// signal) is folded into [`ExitOutcome::Failed`]; nothing is surfaced as an
/// error.
pub trait ProcessExecutor: Send + Sync + fmt::Debug {
    fn execute(&self, command: &str) -> ExitOutcome;
}

/// Runs commands through the platform shell (`sh -c` / `cmd /C`).
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    shell: Option<String>,
    capture_output: bool,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: &ExecutorSection) -> Self {
        Self {
            shell: cfg.shell.clone(),
            capture_output: cfg.capture_output,
        }
    }

    /// Use `shell` instead of the platform default interpreter.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    /// Pipe child stdout/stderr into the log (debug level) instead of
    /// letting the child inherit the terminal.
    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    fn run(&self, line: &str) -> Result<ExitOutcome> {
        let mut cmd = shell_command(self.shell.as_deref(), line);
        cmd.stdin(Stdio::null());

        if self.capture_output {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning process for command '{line}'"))?;

        // Drain both pipes concurrently so neither can fill up and stall
        // the child.
        let pumps = match start_pumps(&mut child) {
            Ok(pumps) => pumps,
            Err(err) => {
                // Nobody reads the pipes; do not leave the child behind.
                let _ = child.kill();
                let _ = child.wait();
                return Err(err);
            }
        };

        let status = child
            .wait()
            .with_context(|| format!("waiting for process of command '{line}'"))?;

        finish_pumps(pumps);

        let outcome = ExitOutcome::from_status(status);
        info!(
            cmd = %line,
            exit_code = outcome.exit_code(),
            success = outcome.is_success(),
            "task process exited"
        );
        Ok(outcome)
    }
}

impl ProcessExecutor for ShellExecutor {
    fn execute(&self, command: &str) -> ExitOutcome {
        match self.run(command) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(cmd = %command, error = %err, "task execution error");
                ExitOutcome::Failed(-1)
            }
        }
    }
}

/// How long readers may keep draining output after the process exited.
const PUMP_GRACE: Duration = Duration::from_millis(50);

fn start_pumps(child: &mut Child) -> Result<Vec<JoinHandle<()>>> {
    let mut pumps = Vec::with_capacity(2);
    if let Some(out) = child.stdout.take() {
        pumps.push(pump_lines(out, "stdout")?);
    }
    if let Some(err) = child.stderr.take() {
        pumps.push(pump_lines(err, "stderr")?);
    }
    Ok(pumps)
}

fn pump_lines<R: Read + Send + 'static>(stream: R, name: &'static str) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("dagsched-{name}"))
        .spawn(move || {
            let reader = BufReader::new(stream);
            for line in reader.lines() {
                match line {
                    Ok(line) => debug!(stream = name, "{}", line),
                    Err(_) => break,
                }
            }
        })
        .with_context(|| format!("spawning {name} reader thread"))
}

/// Join readers that finish shortly after the process exited.
///
/// A background process started by the command may inherit the pipes and
/// keep them open; its reader is detached instead of holding the worker.
fn finish_pumps(pumps: Vec<JoinHandle<()>>) {
    let deadline = Instant::now() + PUMP_GRACE;
    while pumps.iter().any(|p| !p.is_finished()) && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(1));
    }

    for pump in pumps {
        if !pump.is_finished() {
            debug!("output still open after process exit; detaching reader");
            continue;
        }
        if pump.join().is_err() {
            warn!("output reader thread panicked");
        }
    }
}
