// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] builds the shell invocation for a task's command line.
//! - [`backend`] provides the `ProcessExecutor` trait and the concrete
//!   `ShellExecutor` used in production, which tests can replace with a
//!   fake implementation.

use std::process::ExitStatus;

pub mod backend;
pub mod command;

pub use backend::{ProcessExecutor, ShellExecutor};

/// Outcome of one task process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    /// Non-zero exit code, or `-1` if the process could not be spawned or
    /// awaited, or did not exit normally.
    Failed(i32),
}

impl ExitOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            ExitOutcome::Success
        } else {
            ExitOutcome::Failed(status.code().unwrap_or(-1))
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitOutcome::Success)
    }

    pub fn exit_code(self) -> i32 {
        match self {
            ExitOutcome::Success => 0,
            ExitOutcome::Failed(code) => code,
        }
    }
}
