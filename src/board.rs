// src/board.rs

//! Front-end facing surface of the core.
//!
//! `TaskBoard` owns the task graph and at most one running scheduler, and
//! exposes the operations a command-line front end needs: add tasks and
//! dependencies, list them, start and stop the worker pool.

use std::sync::Arc;

use tracing::info;

use crate::dag::{Task, TaskGraph, TaskSnapshot};
use crate::engine::{Scheduler, StopToken};
use crate::errors::{DagschedError, Result};
use crate::exec::ProcessExecutor;
use crate::types::AdmissionPolicy;

#[derive(Debug)]
pub struct TaskBoard {
    /// Shared with the running scheduler, if any. While that scheduler is
    /// alive the graph cannot be mutated.
    graph: Arc<TaskGraph>,
    scheduler: Option<Scheduler>,
    executor: Arc<dyn ProcessExecutor>,
    admission: AdmissionPolicy,
}

impl TaskBoard {
    pub fn new(executor: Arc<dyn ProcessExecutor>) -> Self {
        Self::from_graph(TaskGraph::new(), executor)
    }

    pub fn from_graph(graph: TaskGraph, executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            graph: Arc::new(graph),
            scheduler: None,
            executor,
            admission: AdmissionPolicy::default(),
        }
    }

    pub fn with_admission(mut self, admission: AdmissionPolicy) -> Self {
        self.admission = admission;
        self
    }

    pub fn admission(&self) -> AdmissionPolicy {
        self.admission
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Stop token of the running scheduler.
    pub fn stop_token(&self) -> Option<StopToken> {
        self.scheduler.as_ref().map(Scheduler::stop_token)
    }

    pub fn add_task(
        &mut self,
        id: &str,
        command: &str,
        scheduled_time: i64,
        frequency: u64,
    ) -> Result<usize> {
        let graph = self.graph_mut()?;
        graph.add_task(Task::new(id, command, scheduled_time, frequency))
    }

    pub fn add_dependency(&mut self, from: &str, to: &str) -> Result<()> {
        let graph = self.graph_mut()?;
        graph.add_dependency(from, to)
    }

    pub fn list_tasks(&self) -> Vec<TaskSnapshot> {
        self.graph.snapshot()
    }

    pub fn list_dependencies(&self) -> Vec<(String, Vec<String>)> {
        self.graph.dependency_listing()
    }

    /// Task ids in the order a scheduler would seed them.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        let order = self.graph.topological_sort()?;
        Ok(order
            .into_iter()
            .filter_map(|i| self.graph.task(i).map(|t| t.id().to_string()))
            .collect())
    }

    /// Start a fresh worker pool, stopping any previous one first.
    ///
    /// Errors are `InvalidWorkerCount`, `AllocationFailure` or
    /// `StartFailure`; a cyclic graph is reported as a start failure.
    pub fn start_scheduler(&mut self, worker_count: usize) -> Result<()> {
        self.stop_scheduler();

        let mut scheduler = Scheduler::new(
            Arc::clone(&self.graph),
            worker_count,
            Arc::clone(&self.executor),
        )?
        .with_admission(self.admission);

        scheduler.start().map_err(|err| match err {
            DagschedError::CycleDetected(msg) => DagschedError::StartFailure(msg),
            other => other,
        })?;

        self.scheduler = Some(scheduler);
        Ok(())
    }

    /// Gracefully stop the running scheduler, if any.
    pub fn stop_scheduler(&mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop();
            info!("previous scheduler discarded");
        }
    }

    fn graph_mut(&mut self) -> Result<&mut TaskGraph> {
        Arc::get_mut(&mut self.graph).ok_or(DagschedError::GraphBusy)
    }
}
