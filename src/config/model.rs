// src/config/model.rs

use serde::Deserialize;

use crate::dag::{Task, TaskGraph};
use crate::errors::Result;
use crate::types::AdmissionPolicy;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [scheduler]
/// workers = 4
/// admission = "bulk"
///
/// [executor]
/// capture_output = true
///
/// [[task]]
/// id = "fetch"
/// cmd = "echo fetch"
///
/// [[task]]
/// id = "build"
/// cmd = "echo build"
/// freq = 60
/// after = ["fetch"]
/// ```
///
/// All sections are optional. Tasks keep their file order, which becomes
/// their index order in the task graph.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub scheduler: SchedulerSection,

    #[serde(default)]
    pub executor: ExecutorSection,

    /// All `[[task]]` entries, in file order.
    #[serde(default)]
    pub task: Vec<TaskConfig>,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub scheduler: SchedulerSection,
    pub executor: ExecutorSection,
    pub task: Vec<TaskConfig>,
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSection {
    /// Worker threads used by `run` when no count is given. Must be >= 1.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// `"bulk"` (default) or `"gated"`.
    #[serde(default)]
    pub admission: AdmissionPolicy,
}

fn default_workers() -> usize {
    4
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            admission: AdmissionPolicy::default(),
        }
    }
}

/// `[executor]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExecutorSection {
    /// Shell program used to interpret commands; platform default if unset.
    #[serde(default)]
    pub shell: Option<String>,

    /// Log child stdout/stderr at debug level instead of inheriting them.
    #[serde(default)]
    pub capture_output: bool,
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    pub id: String,

    /// Command line, interpreted by the shell.
    pub cmd: String,

    /// Initial scheduled time in seconds.
    #[serde(default)]
    pub time: i64,

    /// Recurrence interval in seconds; 0 runs the task once.
    #[serde(default)]
    pub freq: u64,

    /// Tasks that must complete before this one.
    #[serde(default)]
    pub after: Vec<String>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        scheduler: SchedulerSection,
        executor: ExecutorSection,
        task: Vec<TaskConfig>,
    ) -> Self {
        Self {
            scheduler,
            executor,
            task,
        }
    }

    /// Build a task graph from the configured tasks.
    ///
    /// Tasks are added in file order, then each task's `after` list is added
    /// as edges `dep -> task`, in list order.
    pub fn build_graph(&self) -> Result<TaskGraph> {
        let mut graph = TaskGraph::new();

        for tc in &self.task {
            graph.add_task(Task::new(&tc.id, &tc.cmd, tc.time, tc.freq))?;
        }

        for tc in &self.task {
            for dep in &tc.after {
                graph.add_dependency(dep, &tc.id)?;
            }
        }

        Ok(graph)
    }
}
