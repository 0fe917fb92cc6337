use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Lifecycle state of a single task execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::Running => 1,
            TaskStatus::Completed => 2,
            TaskStatus::Failed => 3,
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => TaskStatus::Running,
            2 => TaskStatus::Completed,
            3 => TaskStatus::Failed,
            _ => TaskStatus::Pending,
        }
    }

    /// Whether this status ends an execution (`Completed` or `Failed`).
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// How tasks are released into the ready queue when the scheduler starts.
///
/// - `Bulk`: every task is admitted up front in topological order. With a
///   single worker this respects dependencies; with several workers a
///   dependent may start before its predecessor finishes (default).
/// - `Gated`: a task is admitted only once all of its predecessors have
///   completed successfully. A failed predecessor fails its dependents
///   without running them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionPolicy {
    #[default]
    Bulk,
    Gated,
}

impl FromStr for AdmissionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bulk" => Ok(AdmissionPolicy::Bulk),
            "gated" => Ok(AdmissionPolicy::Gated),
            other => Err(format!(
                "invalid admission policy: {other} (expected \"bulk\" or \"gated\")"
            )),
        }
    }
}
