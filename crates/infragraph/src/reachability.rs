//! Root/leaf detection and dead/partly-dead propagation.
//!
//! Liveness is the least fixed point of two rules over critical edges:
//!
//! - a node is **dead** if its base health is unreachable, or if it has at
//!   least one critical dependency and every one of them is dead;
//! - a node that is not dead is **partly dead** if at least one of its
//!   critical dependencies is dead.
//!
//! The fixed point is reached with a breadth-first worklist seeded by the
//! base-unreachable nodes and walking critical edges in reverse (from a dead
//! dependency to the dependents that need it). Each node turns dead at most
//! once, so every critical edge is relaxed at most once and cycles need no
//! special treatment.

use crate::error::{GraphError, Result};
use crate::graph::{algorithms, Health, InfraGraph, Liveness, NodeIndex};
use log::{info, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Summary of one liveness classification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivenessReport {
    /// Nodes classified
    pub nodes: usize,
    /// Nodes classified as root
    pub roots: usize,
    /// Nodes classified as leaf
    pub leaves: usize,
    /// Nodes neither dead nor partly dead
    pub healthy: usize,
    /// Degraded nodes
    pub partly_dead: usize,
    /// Dead nodes (base unreachable or propagated)
    pub dead: usize,
    /// Critical edges relaxed by the worklist
    pub relaxations: usize,
    /// Critical dependency cycles present in the graph
    pub cycles: usize,
}

/// Classify every node as root/leaf/healthy/partly dead/dead.
///
/// Overwrites the liveness of every node; importance from an earlier run is
/// cleared since it depends on liveness.
pub fn analyze(graph: &mut InfraGraph) -> Result<LivenessReport> {
    let count = graph.node_count();
    let mut health = Vec::with_capacity(count);
    let mut worklist = VecDeque::new();

    for index in 0..count {
        if graph.node_at(index).base_healthy {
            health.push(Health::Healthy);
        } else {
            health.push(Health::Dead);
            worklist.push_back(index);
        }
    }

    let mut report = LivenessReport {
        nodes: count,
        ..LivenessReport::default()
    };
    report.relaxations = propagate(graph, &mut health, worklist);

    let cycles = algorithms::find_strongly_connected_components(graph);
    if !cycles.is_empty() {
        warn!(
            "{} critical dependency cycle(s) found; first involves {}",
            cycles.len(),
            cycles[0]
                .iter()
                .map(|&i| graph.node_at(i).id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    report.cycles = cycles.len();

    for (index, health) in health.into_iter().enumerate() {
        let node_entry = graph.node_at(index).entry_point;
        let liveness = Liveness {
            root: node_entry || graph.critical_in_of(index).is_empty(),
            leaf: graph.critical_out_of(index).is_empty(),
            health,
        };

        report.roots += usize::from(liveness.root);
        report.leaves += usize::from(liveness.leaf);
        match health {
            Health::Healthy => report.healthy += 1,
            Health::PartlyDead => report.partly_dead += 1,
            Health::Dead => report.dead += 1,
        }

        let node = graph.node_at_mut(index);
        node.liveness = Some(liveness);
        node.importance = None;
    }

    info!(
        "Classified {} nodes: {} roots, {} leaves, {} healthy, {} partly dead, {} dead",
        report.nodes, report.roots, report.leaves, report.healthy, report.partly_dead, report.dead
    );

    Ok(report)
}

/// Run the worklist to its fixed point; returns the number of relaxed edges.
fn propagate(
    graph: &InfraGraph,
    health: &mut [Health],
    mut worklist: VecDeque<NodeIndex>,
) -> usize {
    let mut dead_dependencies = vec![0usize; health.len()];
    let mut relaxations = 0;

    while let Some(failed) = worklist.pop_front() {
        for &dependent in graph.critical_in_of(failed) {
            relaxations += 1;
            dead_dependencies[dependent] += 1;
            if health[dependent] == Health::Dead {
                continue;
            }

            let next = if dead_dependencies[dependent] == graph.critical_out_of(dependent).len() {
                Health::Dead
            } else {
                Health::PartlyDead
            };
            trace!(
                "{} -> {} ({} of {} dependencies dead)",
                graph.node_at(dependent).id,
                next,
                dead_dependencies[dependent],
                graph.critical_out_of(dependent).len()
            );

            health[dependent] = next;
            if next == Health::Dead {
                worklist.push_back(dependent);
            }
        }
    }

    relaxations
}

/// Verify that the stored liveness satisfies the classification rules.
///
/// # Errors
///
/// Returns [`GraphError::InconsistentState`] naming the first node whose
/// flags disagree with its neighbors. This indicates a bug, not bad input.
pub fn check_consistency(graph: &InfraGraph) -> Result<()> {
    for index in 0..graph.node_count() {
        let node = graph.node_at(index);
        let liveness = node.liveness.ok_or_else(|| {
            GraphError::inconsistent(format!("node {} was never classified", node.id))
        })?;

        let dependencies = graph.critical_out_of(index);
        let dead_dependencies = dependencies
            .iter()
            .filter(|&&d| graph.node_at(d).is_dead())
            .count();

        let expected = if !node.base_healthy
            || (!dependencies.is_empty() && dead_dependencies == dependencies.len())
        {
            Health::Dead
        } else if dead_dependencies > 0 {
            Health::PartlyDead
        } else {
            Health::Healthy
        };
        if liveness.health != expected {
            return Err(GraphError::inconsistent(format!(
                "node {} is {} but its dependencies make it {}",
                node.id, liveness.health, expected
            )));
        }

        let root = node.entry_point || graph.critical_in_of(index).is_empty();
        let leaf = dependencies.is_empty();
        if liveness.root != root || liveness.leaf != leaf {
            return Err(GraphError::inconsistent(format!(
                "node {} has root={} leaf={}, expected root={} leaf={}",
                node.id, liveness.root, liveness.leaf, root, leaf
            )));
        }
    }

    Ok(())
}
