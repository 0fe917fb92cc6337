// src/dag/algo.rs

//! Graph algorithms over a successor-list adjacency structure.
//!
//! `successors[u]` lists every `v` such that task `u` must run before task
//! `v`. All functions assume every listed index is `< successors.len()`.

use std::collections::VecDeque;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not visited yet.
    White,
    /// On the current DFS path.
    Gray,
    /// Fully explored.
    Black,
}

/// Why a topological sort could not produce a full ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// Some tasks never reached indegree 0; they sit on or behind a cycle.
    Cycle { unresolved: Vec<usize> },
    /// Working storage could not be allocated.
    Allocation,
}

/// Three-colour depth-first search for a back edge.
///
/// Walks every node, so disconnected components are covered. Uses an
/// explicit stack of `(node, next successor position)` frames instead of
/// recursion. Returns `true` if working storage cannot be allocated: when in
/// doubt, assume a cycle.
pub fn has_cycle(successors: &[Vec<usize>]) -> bool {
    let n = successors.len();

    let mut colors: Vec<Color> = Vec::new();
    if colors.try_reserve_exact(n).is_err() {
        warn!(tasks = n, "cycle check could not allocate colour table; assuming cycle");
        return true;
    }
    colors.resize(n, Color::White);

    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if colors[root] != Color::White {
            continue;
        }

        colors[root] = Color::Gray;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, pos) = *frame;

            match successors[node].get(pos) {
                Some(&next) => {
                    frame.1 += 1;
                    match colors[next] {
                        Color::Gray => return true,
                        Color::White => {
                            colors[next] = Color::Gray;
                            stack.push((next, 0));
                        }
                        Color::Black => {}
                    }
                }
                None => {
                    colors[node] = Color::Black;
                    stack.pop();
                }
            }
        }
    }

    false
}

/// Number of predecessors of every node.
pub fn indegrees(successors: &[Vec<usize>]) -> Vec<usize> {
    let mut indegree = vec![0usize; successors.len()];
    for succs in successors {
        for &v in succs {
            indegree[v] += 1;
        }
    }
    indegree
}

/// Kahn's algorithm.
///
/// Indegree-0 nodes are seeded in ascending index order and the queue is
/// FIFO, so among equally-ready tasks insertion order wins. This is the only
/// tie-break.
pub fn topological_order(successors: &[Vec<usize>]) -> Result<Vec<usize>, SortError> {
    let n = successors.len();

    let mut order: Vec<usize> = Vec::new();
    order.try_reserve_exact(n).map_err(|_| SortError::Allocation)?;

    let mut queue: VecDeque<usize> = VecDeque::new();
    queue.try_reserve_exact(n).map_err(|_| SortError::Allocation)?;

    let mut indegree = indegrees(successors);
    queue.extend((0..n).filter(|&u| indegree[u] == 0));

    while let Some(u) = queue.pop_front() {
        order.push(u);
        for &v in &successors[u] {
            indegree[v] -= 1;
            if indegree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    if order.len() < n {
        let unresolved = (0..n).filter(|&u| indegree[u] > 0).collect();
        return Err(SortError::Cycle { unresolved });
    }

    Ok(order)
}

/// Every node reachable from `start` (excluding `start` itself unless it
/// lies on a cycle through itself), in breadth-first order.
pub fn descendants(successors: &[Vec<usize>], start: usize) -> Vec<usize> {
    let mut seen = vec![false; successors.len()];
    let mut out = Vec::new();
    let mut queue: VecDeque<usize> = successors[start].iter().copied().collect();

    while let Some(u) = queue.pop_front() {
        if seen[u] {
            continue;
        }
        seen[u] = true;
        out.push(u);
        queue.extend(successors[u].iter().copied());
    }

    out
}
