#![allow(dead_code)]

use std::sync::Arc;

use dagsched::config::{ConfigFile, ExecutorSection, RawConfigFile, SchedulerSection, TaskConfig};
use dagsched::dag::{Task, TaskGraph};
use dagsched::types::AdmissionPolicy;

/// Builder for `TaskGraph` to simplify test setup.
///
/// Panics on any graph error, so only use it for graphs that are valid.
pub struct GraphBuilder {
    graph: TaskGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: TaskGraph::new(),
        }
    }

    /// Run-once task with scheduled time 0.
    pub fn task(self, id: &str, cmd: &str) -> Self {
        self.recurring(id, cmd, 0, 0)
    }

    pub fn recurring(mut self, id: &str, cmd: &str, time: i64, freq: u64) -> Self {
        self.graph
            .add_task(Task::new(id, cmd, time, freq))
            .expect("Failed to add task in builder");
        self
    }

    pub fn dep(mut self, from: &str, to: &str) -> Self {
        self.graph
            .add_dependency(from, to)
            .expect("Failed to add dependency in builder");
        self
    }

    pub fn build(self) -> TaskGraph {
        self.graph
    }

    pub fn shared(self) -> Arc<TaskGraph> {
        Arc::new(self.graph)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ConfigFile`.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                scheduler: SchedulerSection::default(),
                executor: ExecutorSection::default(),
                task: Vec::new(),
            },
        }
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.scheduler.workers = workers;
        self
    }

    pub fn admission(mut self, admission: AdmissionPolicy) -> Self {
        self.config.scheduler.admission = admission;
        self
    }

    pub fn with_task(mut self, task: TaskConfig) -> Self {
        self.config.task.push(task);
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(id: &str, cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                id: id.to_string(),
                cmd: cmd.to_string(),
                time: 0,
                freq: 0,
                after: vec![],
            },
        }
    }

    pub fn time(mut self, time: i64) -> Self {
        self.task.time = time;
        self
    }

    pub fn freq(mut self, freq: u64) -> Self {
        self.task.freq = freq;
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
