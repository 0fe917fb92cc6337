// src/dag/mod.rs

//! Task dependency graph.
//!
//! - [`task`] holds the task record and its display snapshot.
//! - [`graph`] is the registry of tasks and dependency edges.
//! - [`algo`] contains cycle detection and topological ordering over the
//!   graph's adjacency lists.

pub mod algo;
pub mod graph;
pub mod task;

pub use graph::{INITIAL_CAPACITY, TaskGraph};
pub use task::{Task, TaskSnapshot};
