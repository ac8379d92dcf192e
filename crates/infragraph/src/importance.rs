//! Normalized importance scores used for visual sizing.
//!
//! Raw score = `fan_in_weight × critical in-degree × multiplier`, where the
//! multiplier favours roots and intermediate hubs. Raw scores are rescaled
//! linearly so zero maps to `floor` and the largest observed score maps to
//! `ceiling`; dead nodes are then capped at `dead_cap`.

use crate::error::{GraphError, Result};
use crate::graph::{InfraGraph, NodeIndex};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Tunable coefficients of the importance formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportanceWeights {
    /// Contribution of each critical dependent
    pub fan_in_weight: f64,
    /// Multiplier for root nodes
    pub root_multiplier: f64,
    /// Multiplier for nodes that are neither root nor leaf
    pub hub_multiplier: f64,
    /// Importance of a node with zero raw score
    pub floor: f64,
    /// Importance of the node with the largest raw score
    pub ceiling: f64,
    /// Upper bound for dead nodes
    pub dead_cap: f64,
}

impl Default for ImportanceWeights {
    fn default() -> Self {
        Self {
            fan_in_weight: 1.0,
            root_multiplier: 1.5,
            hub_multiplier: 1.2,
            floor: 10.0,
            ceiling: 100.0,
            dead_cap: 20.0,
        }
    }
}

impl ImportanceWeights {
    /// Check that the coefficients keep every score inside `[floor, ceiling] ⊆ [0, 100]`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidConfig`] describing the first bad setting.
    pub fn validate(&self) -> Result<()> {
        let invalid =
            |message: String| -> Result<()> { Err(GraphError::InvalidConfig { message }) };

        for (name, value) in [
            ("fan_in_weight", self.fan_in_weight),
            ("root_multiplier", self.root_multiplier),
            ("hub_multiplier", self.hub_multiplier),
            ("floor", self.floor),
            ("ceiling", self.ceiling),
            ("dead_cap", self.dead_cap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        if self.ceiling > 100.0 {
            return invalid(format!("ceiling must not exceed 100, got {}", self.ceiling));
        }
        if self.floor > self.dead_cap || self.dead_cap > self.ceiling {
            return invalid(format!(
                "expected floor <= dead_cap <= ceiling, got {} / {} / {}",
                self.floor, self.dead_cap, self.ceiling
            ));
        }

        Ok(())
    }
}

/// Assign every node an importance in `[floor, ceiling]`.
///
/// Requires liveness from [`crate::reachability::analyze`]. Nodes are
/// visited in id order so repeated runs produce identical output.
///
/// # Errors
///
/// - [`GraphError::InvalidConfig`] if the weights fail validation.
/// - [`GraphError::InvalidOperation`] if a node has no liveness yet.
pub fn score(graph: &mut InfraGraph, weights: &ImportanceWeights) -> Result<()> {
    weights.validate()?;

    let mut order: Vec<NodeIndex> = (0..graph.node_count()).collect();
    order.sort_by(|&a, &b| graph.node_at(a).id.cmp(&graph.node_at(b).id));

    let mut raw = Vec::with_capacity(order.len());
    for &index in &order {
        let node = graph.node_at(index);
        let liveness = node.liveness.ok_or_else(|| GraphError::InvalidOperation {
            message: format!("node {} has no liveness; run reachability analysis first", node.id),
        })?;

        let multiplier = if liveness.root {
            weights.root_multiplier
        } else if !liveness.leaf {
            weights.hub_multiplier
        } else {
            1.0
        };
        let fan_in = graph.critical_in_of(index).len() as f64;
        raw.push(weights.fan_in_weight * fan_in * multiplier);
    }

    let max_raw = raw.iter().copied().fold(0.0_f64, f64::max);
    debug!("Scoring {} nodes, max raw importance {max_raw}", order.len());

    for (&index, raw) in order.iter().zip(raw) {
        let mut importance = if max_raw > 0.0 {
            weights.floor + raw / max_raw * (weights.ceiling - weights.floor)
        } else {
            weights.floor
        };
        if graph.node_at(index).is_dead() {
            importance = importance.min(weights.dead_cap);
        }
        graph.node_at_mut(index).importance =
            Some(round2(importance).clamp(weights.floor, weights.ceiling));
    }

    Ok(())
}

/// Scored nodes by descending importance, ties broken by ascending id.
pub fn ranking(graph: &InfraGraph) -> Vec<(&str, f64)> {
    let mut ranked: Vec<(&str, f64)> = graph
        .nodes()
        .iter()
        .filter_map(|node| node.importance.map(|i| (node.id.as_str(), i)))
        .collect();

    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    ranked
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
