//! Graph traversal and analysis algorithms over critical edges.
//!
//! Provides BFS and cycle detection (Tarjan's SCC). Both are iterative so
//! deep dependency chains cannot overflow the stack.

use crate::graph::{Direction, InfraGraph, NodeIndex};
use std::collections::VecDeque;

/// Breadth-First Search traversal from a starting node.
///
/// Returns all reachable nodes within the specified depth limit, in
/// discovery order.
///
/// # Parameters
/// - `graph`: The graph to traverse
/// - `start`: Starting node index
/// - `direction`: Follow dependencies (outgoing) or dependents (incoming)
/// - `max_depth`: Optional maximum depth (None for unlimited)
///
/// # Returns
/// Vec of reachable node indices (excluding the start node)
pub fn bfs(
    graph: &InfraGraph,
    start: NodeIndex,
    direction: Direction,
    max_depth: Option<usize>,
) -> Vec<NodeIndex> {
    let mut visited = vec![false; graph.node_count()];
    let mut queue = VecDeque::new();
    let mut result = Vec::new();

    visited[start] = true;
    queue.push_back((start, 0)); // (node, depth)

    while let Some((current, depth)) = queue.pop_front() {
        if max_depth.is_some_and(|max| depth >= max) {
            continue;
        }

        for neighbor in graph.neighbor_indices(current, direction) {
            if !visited[neighbor] {
                visited[neighbor] = true;
                result.push(neighbor);
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    result
}

/// Find all strongly connected components of the critical dependency graph.
///
/// Uses Tarjan's algorithm with an explicit call stack. Only components with
/// more than one node, or a single node depending on itself, are returned:
/// these are the dependency cycles.
pub fn find_strongly_connected_components(graph: &InfraGraph) -> Vec<Vec<NodeIndex>> {
    const UNVISITED: usize = usize::MAX;

    let count = graph.node_count();
    let mut next_index = 0;
    let mut indices = vec![UNVISITED; count];
    let mut lowlinks = vec![0; count];
    let mut on_stack = vec![false; count];
    let mut stack = Vec::new();
    let mut sccs = Vec::new();

    // Frames are (node, position of the next successor to examine)
    let mut frames: Vec<(NodeIndex, usize)> = Vec::new();

    for root in 0..count {
        if indices[root] != UNVISITED {
            continue;
        }
        frames.push((root, 0));

        while let Some(&(v, cursor)) = frames.last() {
            if indices[v] == UNVISITED {
                indices[v] = next_index;
                lowlinks[v] = next_index;
                next_index += 1;
                stack.push(v);
                on_stack[v] = true;
            }

            let successors = graph.critical_out_of(v);
            if let Some(&w) = successors.get(cursor) {
                if let Some(frame) = frames.last_mut() {
                    frame.1 += 1;
                }
                if indices[w] == UNVISITED {
                    frames.push((w, 0));
                } else if on_stack[w] {
                    lowlinks[v] = lowlinks[v].min(indices[w]);
                }
                continue;
            }

            // All successors done: pop the frame and report to the caller
            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                lowlinks[parent] = lowlinks[parent].min(lowlinks[v]);
            }

            if lowlinks[v] == indices[v] {
                let mut scc = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    scc.push(w);
                    if w == v {
                        break;
                    }
                }
                let self_loop = scc.len() == 1 && graph.critical_out_of(v).contains(&v);
                if scc.len() > 1 || self_loop {
                    scc.sort_unstable();
                    sccs.push(scc);
                }
            }
        }
    }

    sccs
}
