// src/engine/gate.rs

//! Dependency-gated admission.
//!
//! Tracks, for every task, how many predecessors still have to complete
//! their first execution. Only used with [`AdmissionPolicy::Gated`].
//!
//! [`AdmissionPolicy::Gated`]: crate::types::AdmissionPolicy::Gated

use tracing::debug;

use crate::dag::{TaskGraph, algo};

/// Tasks whose fate was decided by one settled execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Release {
    /// Tasks whose last outstanding predecessor just succeeded.
    pub ready: Vec<usize>,
    /// Tasks that can never run because a predecessor failed.
    pub failed: Vec<usize>,
}

#[derive(Debug)]
pub struct AdmissionGate {
    remaining: Vec<usize>,
    /// A task is settled once its first execution finished, or once it was
    /// failed on behalf of a predecessor.
    settled: Vec<bool>,
}

impl AdmissionGate {
    pub fn new(graph: &TaskGraph) -> Self {
        Self {
            remaining: algo::indegrees(graph.adjacency()),
            settled: vec![false; graph.len()],
        }
    }

    /// Tasks from `order` that have no predecessors, in that order.
    pub fn initially_ready(&self, order: &[usize]) -> Vec<usize> {
        order
            .iter()
            .copied()
            .filter(|&i| self.remaining[i] == 0)
            .collect()
    }

    /// Record the end of an execution of `index`.
    ///
    /// Only the first execution of a task counts; later recurrences return
    /// an empty [`Release`].
    pub fn settle(&mut self, graph: &TaskGraph, index: usize, success: bool) -> Release {
        let mut release = Release::default();

        if self.settled[index] {
            return release;
        }
        self.settled[index] = true;

        if success {
            for &succ in graph.successors_of(index) {
                self.remaining[succ] -= 1;
                if self.remaining[succ] == 0 && !self.settled[succ] {
                    release.ready.push(succ);
                }
            }
        } else {
            for desc in algo::descendants(graph.adjacency(), index) {
                if !self.settled[desc] {
                    self.settled[desc] = true;
                    release.failed.push(desc);
                }
            }
        }

        debug!(
            index,
            success,
            released = release.ready.len(),
            blocked = release.failed.len(),
            "admission gate settled task"
        );
        release
    }
}
