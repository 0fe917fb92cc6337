// src/engine/mod.rs

//! Execution engine.
//!
//! - [`queue`] is the bounded ring of task indices eligible for pickup.
//! - [`gate`] releases tasks once their predecessors have completed, for
//!   the gated admission policy.
//! - [`scheduler`] owns the worker pool: it seeds the queue from the
//!   topological order, runs tasks through a `ProcessExecutor`, re-admits
//!   recurring tasks and coordinates shutdown.

pub mod gate;
pub mod queue;
pub mod scheduler;

pub use gate::{AdmissionGate, Release};
pub use queue::ReadyQueue;
pub use scheduler::{Scheduler, SchedulerState, StopToken, WorkerBody, WorkerSpawner};
pub use crate::types::AdmissionPolicy;
