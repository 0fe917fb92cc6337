// src/dag/graph.rs

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::dag::algo::{self, SortError};
use crate::dag::task::{Task, TaskSnapshot};
use crate::errors::{DagschedError, Result};

/// Number of task slots reserved by [`TaskGraph::new`].
pub const INITIAL_CAPACITY: usize = 16;

/// Task registry plus dependency edges.
///
/// Tasks keep the index they were inserted at for as long as the graph
/// lives; the scheduler uses that index as the task's identity. An edge
/// `u -> v` in `successors[u]` means "`u` must complete before `v`".
///
/// The edge relation is acyclic whenever the graph is observable from the
/// outside: [`TaskGraph::add_dependency`] rolls back any edge that would
/// close a cycle.
#[derive(Debug)]
pub struct TaskGraph {
    tasks: Vec<Arc<Task>>,
    successors: Vec<Vec<usize>>,
    index_by_id: HashMap<String, usize>,
}

impl Default for TaskGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskGraph {
    pub fn new() -> Self {
        Self {
            tasks: Vec::with_capacity(INITIAL_CAPACITY),
            successors: Vec::with_capacity(INITIAL_CAPACITY),
            index_by_id: HashMap::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of task slots available before the next growth step.
    pub fn capacity(&self) -> usize {
        self.tasks.capacity()
    }

    /// Position of the task with the given id, if any.
    pub fn find_index(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index).map(|t| t.as_ref())
    }

    pub fn task_by_id(&self, id: &str) -> Option<&Task> {
        self.find_index(id).and_then(|i| self.task(i))
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().map(|t| t.as_ref())
    }

    /// Direct successors of a task (tasks that must wait for it).
    pub fn successors_of(&self, index: usize) -> &[usize] {
        self.successors
            .get(index)
            .map(|s| s.as_slice())
            .unwrap_or(&[])
    }

    /// Full adjacency structure, indexed by task position.
    pub fn adjacency(&self) -> &[Vec<usize>] {
        &self.successors
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Append a task.
    ///
    /// Fails with `DuplicateTaskId` if the id is taken, leaving the graph
    /// unchanged, or `AllocationFailure` if storage could not grow.
    pub fn add_task(&mut self, task: Task) -> Result<usize> {
        if self.index_by_id.contains_key(task.id()) {
            return Err(DagschedError::DuplicateTaskId(task.id().to_string()));
        }

        self.ensure_capacity()?;

        let index = self.tasks.len();
        self.index_by_id.insert(task.id().to_string(), index);
        debug!(task = %task.id(), index, "task added to graph");
        self.tasks.push(Arc::new(task));
        self.successors.push(Vec::new());

        Ok(index)
    }

    /// Record that `from` must complete before `to`.
    ///
    /// The edge is appended first and the whole graph is re-checked for a
    /// cycle; on a cycle the edge is removed again and `CycleDetected` is
    /// returned.
    pub fn add_dependency(&mut self, from: &str, to: &str) -> Result<()> {
        let i = self
            .find_index(from)
            .ok_or_else(|| DagschedError::UnknownTaskId(from.to_string()))?;
        let j = self
            .find_index(to)
            .ok_or_else(|| DagschedError::UnknownTaskId(to.to_string()))?;

        if self.successors[i].contains(&j) {
            return Err(DagschedError::DuplicateEdge {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        self.successors[i].try_reserve(1)?;
        self.successors[i].push(j);

        if self.detect_cycle() {
            self.successors[i].pop();
            debug!(from, to, "dependency rejected: would create a cycle");
            return Err(DagschedError::CycleDetected(format!(
                "adding '{from}' -> '{to}' would create a cycle"
            )));
        }

        debug!(from, to, "dependency added");
        Ok(())
    }

    /// Whether the current edge set contains a cycle.
    pub fn detect_cycle(&self) -> bool {
        algo::has_cycle(&self.successors)
    }

    /// Task indices in dependency order (Kahn's algorithm, ties broken by
    /// insertion order).
    pub fn topological_sort(&self) -> Result<Vec<usize>> {
        algo::topological_order(&self.successors).map_err(|err| match err {
            SortError::Cycle { unresolved } => {
                let ids: Vec<&str> = unresolved
                    .iter()
                    .filter_map(|&i| self.task(i).map(Task::id))
                    .collect();
                DagschedError::CycleDetected(format!(
                    "task graph contains a cycle involving {ids:?}"
                ))
            }
            SortError::Allocation => DagschedError::AllocationFailure(
                "topological sort working storage".to_string(),
            ),
        })
    }

    /// Read-only copy of every task, in index order.
    pub fn snapshot(&self) -> Vec<TaskSnapshot> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(i, t)| TaskSnapshot::of(i, t))
            .collect()
    }

    /// For every task id, the ids of its successors in edge insertion order.
    pub fn dependency_listing(&self) -> Vec<(String, Vec<String>)> {
        self.tasks
            .iter()
            .zip(self.successors.iter())
            .map(|(task, succs)| {
                let names = succs
                    .iter()
                    .map(|&j| self.tasks[j].id().to_string())
                    .collect();
                (task.id().to_string(), names)
            })
            .collect()
    }

    /// Double the task storage when it is full.
    fn ensure_capacity(&mut self) -> Result<()> {
        if self.tasks.len() < self.tasks.capacity() {
            return Ok(());
        }

        let additional = self.tasks.capacity().max(INITIAL_CAPACITY);
        self.tasks.try_reserve_exact(additional)?;
        self.successors.try_reserve_exact(additional)?;
        self.index_by_id.try_reserve(additional)?;

        debug!(capacity = self.tasks.capacity(), "task graph storage grown");
        Ok(())
    }
}
