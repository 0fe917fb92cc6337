// tests/graph_operations.rs

mod common;
use crate::common::builders::GraphBuilder;
use crate::common::init_tracing;

use std::error::Error;

use dagsched::dag::{INITIAL_CAPACITY, Task, TaskGraph};
use dagsched::errors::DagschedError;
use dagsched::types::TaskStatus;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn duplicate_task_id_is_rejected_and_graph_unchanged() -> TestResult {
    init_tracing();

    let mut graph = TaskGraph::new();
    graph.add_task(Task::new("A", "echo first", 0, 0))?;

    let err = graph
        .add_task(Task::new("A", "echo second", 5, 10))
        .unwrap_err();

    assert!(matches!(err, DagschedError::DuplicateTaskId(ref id) if id == "A"));
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.task(0).map(Task::command), Some("echo first"));
    Ok(())
}

#[test]
fn dependency_on_empty_graph_reports_unknown_id() {
    init_tracing();

    let mut graph = TaskGraph::new();
    let err = graph.add_dependency("X", "Y").unwrap_err();

    assert!(matches!(err, DagschedError::UnknownTaskId(ref id) if id == "X"));
}

#[test]
fn dependency_with_one_unknown_endpoint_reports_that_endpoint() {
    init_tracing();

    let mut graph = GraphBuilder::new().task("A", "echo A").build();
    let err = graph.add_dependency("A", "missing").unwrap_err();

    assert!(matches!(err, DagschedError::UnknownTaskId(ref id) if id == "missing"));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn duplicate_edge_is_rejected() -> TestResult {
    init_tracing();

    let mut graph = GraphBuilder::new()
        .task("A", "echo A")
        .task("B", "echo B")
        .build();

    graph.add_dependency("A", "B")?;
    let err = graph.add_dependency("A", "B").unwrap_err();

    assert!(matches!(err, DagschedError::DuplicateEdge { .. }));
    assert_eq!(graph.successors_of(0), &[1]);
    Ok(())
}

#[test]
fn back_edge_is_rolled_back() -> TestResult {
    init_tracing();

    let mut graph = GraphBuilder::new()
        .task("A", "echo A")
        .task("B", "echo B")
        .build();

    graph.add_dependency("A", "B")?;
    let a_edges_before = graph.successors_of(0).len();
    let b_edges_before = graph.successors_of(1).len();

    let err = graph.add_dependency("B", "A").unwrap_err();

    assert!(matches!(err, DagschedError::CycleDetected(_)));
    assert!(!graph.detect_cycle(), "rollback must leave the graph acyclic");
    assert_eq!(graph.successors_of(0).len(), a_edges_before);
    assert_eq!(graph.successors_of(1).len(), b_edges_before);
    Ok(())
}

#[test]
fn longer_cycle_is_rejected_and_rolled_back() -> TestResult {
    init_tracing();

    let mut graph = GraphBuilder::new()
        .task("A", "echo A")
        .task("B", "echo B")
        .task("C", "echo C")
        .dep("A", "B")
        .dep("B", "C")
        .build();

    let err = graph.add_dependency("C", "A").unwrap_err();

    assert!(matches!(err, DagschedError::CycleDetected(_)));
    assert!(graph.successors_of(2).is_empty());
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.topological_sort()?, vec![0, 1, 2]);
    Ok(())
}

#[test]
fn self_dependency_is_a_cycle() {
    init_tracing();

    let mut graph = GraphBuilder::new().task("A", "echo A").build();
    let err = graph.add_dependency("A", "A").unwrap_err();

    assert!(matches!(err, DagschedError::CycleDetected(_)));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn two_task_chain_sorts_in_edge_order() -> TestResult {
    init_tracing();

    let graph = GraphBuilder::new()
        .task("A", "echo A")
        .task("B", "echo B")
        .dep("A", "B")
        .build();

    assert_eq!(graph.topological_sort()?, vec![0, 1]);
    Ok(())
}

#[test]
fn dependency_can_reverse_insertion_order() -> TestResult {
    init_tracing();

    let graph = GraphBuilder::new()
        .task("late", "echo late")
        .task("early", "echo early")
        .dep("early", "late")
        .build();

    assert_eq!(graph.topological_sort()?, vec![1, 0]);
    Ok(())
}

#[test]
fn independent_tasks_keep_insertion_order() -> TestResult {
    init_tracing();

    // C and A are both roots; ties break by index, not by name.
    let graph = GraphBuilder::new()
        .task("C", "echo C")
        .task("A", "echo A")
        .task("B", "echo B")
        .dep("A", "B")
        .build();

    assert_eq!(graph.topological_sort()?, vec![0, 1, 2]);
    Ok(())
}

#[test]
fn diamond_sorts_every_predecessor_first() -> TestResult {
    init_tracing();

    let graph = GraphBuilder::new()
        .task("D", "echo D")
        .task("B", "echo B")
        .task("C", "echo C")
        .task("A", "echo A")
        .dep("A", "B")
        .dep("A", "C")
        .dep("B", "D")
        .dep("C", "D")
        .build();

    // A (3) is the only root; then B (1), C (2) in edge order; then D (0).
    assert_eq!(graph.topological_sort()?, vec![3, 1, 2, 0]);
    Ok(())
}

#[test]
fn growing_past_initial_capacity_keeps_indices_stable() -> TestResult {
    init_tracing();

    let mut graph = TaskGraph::new();
    assert!(graph.capacity() >= INITIAL_CAPACITY);

    let count = INITIAL_CAPACITY + 1;
    for i in 0..count {
        let index = graph.add_task(Task::new(format!("t{i}"), format!("echo {i}"), 0, 0))?;
        assert_eq!(index, i);
    }

    assert_eq!(graph.len(), count);
    assert!(graph.capacity() >= count);
    for i in 0..count {
        let id = format!("t{i}");
        assert_eq!(graph.find_index(&id), Some(i));
        assert_eq!(graph.task(i).map(Task::id), Some(id.as_str()));
    }
    Ok(())
}

#[test]
fn find_index_reports_missing_ids_as_none() {
    init_tracing();

    let graph = GraphBuilder::new().task("A", "echo A").build();

    assert_eq!(graph.find_index("A"), Some(0));
    assert_eq!(graph.find_index("nope"), None);
    assert!(graph.task_by_id("nope").is_none());
}

#[test]
fn snapshot_and_listing_reflect_graph() {
    init_tracing();

    let graph = GraphBuilder::new()
        .recurring("fetch", "echo fetch", 100, 30)
        .task("build", "echo build")
        .task("test", "echo test")
        .dep("fetch", "build")
        .dep("fetch", "test")
        .build();

    let snapshot = graph.snapshot();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot[0].index, 0);
    assert_eq!(snapshot[0].id, "fetch");
    assert_eq!(snapshot[0].scheduled_time, 100);
    assert_eq!(snapshot[0].frequency, 30);
    assert_eq!(snapshot[0].status, TaskStatus::Pending);

    let listing = graph.dependency_listing();
    assert_eq!(
        listing,
        vec![
            ("fetch".to_string(), vec!["build".to_string(), "test".to_string()]),
            ("build".to_string(), vec![]),
            ("test".to_string(), vec![]),
        ]
    );
}

#[test]
fn empty_graph_sorts_to_empty_order() -> TestResult {
    init_tracing();

    let graph = TaskGraph::new();
    assert!(!graph.detect_cycle());
    assert!(graph.topological_sort()?.is_empty());
    Ok(())
}
