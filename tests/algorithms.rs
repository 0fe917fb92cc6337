// tests/algorithms.rs

mod common;
use crate::common::init_tracing;

use dagsched::dag::algo::{SortError, descendants, has_cycle, indegrees, topological_order};

#[test]
fn raw_cycle_is_detected_even_in_a_later_component() {
    init_tracing();

    // 0 -> 1 is fine; 2 -> 3 -> 4 -> 2 is a cycle in a separate component.
    let adj = vec![vec![1], vec![], vec![3], vec![4], vec![2]];
    assert!(has_cycle(&adj));
}

#[test]
fn shared_descendant_is_not_a_cycle() {
    init_tracing();

    // Two paths reach node 3; visiting it twice must not look like a back edge.
    let adj = vec![vec![1, 2], vec![3], vec![3], vec![]];
    assert!(!has_cycle(&adj));
}

#[test]
fn self_loop_is_a_cycle() {
    init_tracing();

    assert!(has_cycle(&[vec![0]]));
}

#[test]
fn long_chain_does_not_exhaust_the_stack() {
    init_tracing();

    let n = 200_000;
    let adj: Vec<Vec<usize>> = (0..n)
        .map(|i| if i + 1 < n { vec![i + 1] } else { vec![] })
        .collect();

    assert!(!has_cycle(&adj));
    let order = topological_order(&adj).expect("chain is acyclic");
    assert_eq!(order.len(), n);
    assert_eq!(order.first(), Some(&0));
    assert_eq!(order.last(), Some(&(n - 1)));
}

#[test]
fn sort_of_cyclic_adjacency_reports_unresolved_nodes() {
    init_tracing();

    // 0 is free; 1 <-> 2 form a cycle; 3 hangs behind the cycle.
    let adj = vec![vec![], vec![2], vec![1, 3], vec![]];

    match topological_order(&adj) {
        Err(SortError::Cycle { unresolved }) => assert_eq!(unresolved, vec![1, 2, 3]),
        other => panic!("expected cycle error, got {other:?}"),
    }
}

#[test]
fn indegrees_count_every_incoming_edge() {
    init_tracing();

    let adj = vec![vec![2], vec![2], vec![], vec![0, 1, 2]];
    assert_eq!(indegrees(&adj), vec![1, 1, 3, 0]);
}

#[test]
fn descendants_are_transitive_and_unique() {
    init_tracing();

    let adj = vec![vec![1, 2], vec![3], vec![3], vec![], vec![0]];
    assert_eq!(descendants(&adj, 0), vec![1, 2, 3]);
    assert_eq!(descendants(&adj, 4), vec![0, 1, 2, 3]);
    assert!(descendants(&adj, 3).is_empty());
}
