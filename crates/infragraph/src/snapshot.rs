//! Input snapshots: the resource inventory and health state for one run.
//!
//! A snapshot is gathered up front by an external inventory/monitoring
//! source, so nothing blocks on I/O once classification starts.
//!
//! ```json
//! {
//!   "nodes": [{"id": "web", "type": "ec2", "baseHealthy": true, "parent": "vpc-1"}],
//!   "edges": [{"source": "web", "target": "db", "weight": 1, "type": "depends"}]
//! }
//! ```

use crate::error::{GraphError, Result};
use crate::graph::{Edge, EdgeType, InfraGraph, Node, ResourceType};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A resource as reported by the inventory source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    /// Unique id
    pub id: String,
    /// Resource kind
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Monitoring verdict; missing means reachable
    #[serde(default = "default_healthy")]
    pub base_healthy: bool,
    /// Designated entry point
    #[serde(default)]
    pub entry_point: bool,
    /// Enclosing compound node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// A dependency as reported by the inventory source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// Dependent node id
    pub source: String,
    /// Dependency node id
    pub target: String,
    /// Missing means 1 (load-bearing)
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Relationship kind
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<EdgeType>,
}

/// Immutable inventory for one classification run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Resources
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    /// Dependencies
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

fn default_healthy() -> bool {
    true
}

fn default_weight() -> f64 {
    1.0
}

impl From<NodeSpec> for Node {
    fn from(spec: NodeSpec) -> Self {
        let mut node = Node::new(spec.id, spec.resource_type).with_health(spec.base_healthy);
        node.entry_point = spec.entry_point;
        node.parent = spec.parent;
        node
    }
}

impl From<EdgeSpec> for Edge {
    fn from(spec: EdgeSpec) -> Self {
        Edge {
            source: spec.source,
            target: spec.target,
            weight: spec.weight,
            edge_type: spec.edge_type,
        }
    }
}

impl Snapshot {
    /// Parse a snapshot from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| GraphError::serialization("Failed to parse snapshot", Some(e)))
    }

    /// Read a snapshot from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// Serialize the snapshot as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GraphError::serialization("Failed to serialize snapshot", Some(e)))
    }

    /// Build the graph store: all nodes, then all edges, then the grouping tree.
    ///
    /// # Errors
    ///
    /// Any construction error rejects the whole snapshot:
    /// [`GraphError::DuplicateId`], [`GraphError::DanglingReference`],
    /// [`GraphError::InvalidWeight`], or [`GraphError::InvalidOperation`]
    /// for a cyclic grouping tree.
    pub fn into_graph(self) -> Result<InfraGraph> {
        debug!(
            "Building graph from snapshot: {} nodes, {} edges",
            self.nodes.len(),
            self.edges.len()
        );
        let mut graph = InfraGraph::with_capacity(self.nodes.len(), self.edges.len());

        for spec in self.nodes {
            graph.add_node(spec.into())?;
        }
        for spec in self.edges {
            graph.add_edge(spec.into())?;
        }
        graph.resolve_groups()?;

        Ok(graph)
    }
}
