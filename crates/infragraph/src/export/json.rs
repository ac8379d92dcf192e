//! Rendering payload: the `elements` structure the graph widget consumes.
//!
//! Generates JSON with "nodes" and "edges" arrays whose entries wrap their
//! attributes in a `data` object. Node data carries `id`, `type`,
//! `importance` and the four 0/1 flags `root`, `leaf`, `dead`, `partlydead`
//! (plus `parent` for grouped nodes); edge data carries `source`, `target`,
//! `weight` and an optional `type`.

use crate::error::{GraphError, Result};
use crate::graph::{InfraGraph, Node};
use crate::reachability;
use crate::snapshot::{EdgeSpec, NodeSpec, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A payload entry: the widget expects attributes under `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element<T> {
    /// Element attributes
    pub data: T,
}

/// Attributes of a rendered node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Node id
    pub id: String,
    /// Resource kind wire name, mapped to an icon
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Importance in `[0, 100]`, mapped to diameter
    pub importance: f64,
    /// 1 if root
    pub root: u8,
    /// 1 if leaf
    pub leaf: u8,
    /// 1 if dead
    pub dead: u8,
    /// 1 if partly dead
    pub partlydead: u8,
    /// Enclosing compound node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Attributes of a rendered edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    /// Dependent node id
    pub source: String,
    /// Dependency node id
    pub target: String,
    /// Line width; 0 renders dashed
    pub weight: f64,
    /// Relationship kind
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
}

/// The complete classified graph in rendering form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Node elements in insertion order
    pub nodes: Vec<Element<NodeData>>,
    /// Edge elements in insertion order
    pub edges: Vec<Element<EdgeData>>,
}

impl Payload {
    /// Build the payload from a fully classified graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InconsistentState`] if any node is unclassified
    /// or the stored flags break the classification rules. Given a graph
    /// that went through the analyzer and scorer this cannot happen.
    pub fn from_graph(graph: &InfraGraph) -> Result<Self> {
        Self::from_graph_filtered(graph, |_| true)
    }

    /// Build the payload for the subset of nodes accepted by `node_filter`.
    ///
    /// Edges are kept only when both endpoints are kept, and a `parent`
    /// outside the subset is dropped.
    pub fn from_graph_filtered(
        graph: &InfraGraph,
        node_filter: impl Fn(&Node) -> bool,
    ) -> Result<Self> {
        reachability::check_consistency(graph)?;

        let kept: HashSet<&str> = graph
            .nodes()
            .iter()
            .filter(|node| node_filter(node))
            .map(|node| node.id.as_str())
            .collect();

        let mut nodes = Vec::with_capacity(kept.len());
        for node in graph.nodes().iter().filter(|n| kept.contains(n.id.as_str())) {
            nodes.push(Element {
                data: node_data(node)?,
            });
        }
        for node in &mut nodes {
            if node
                .data
                .parent
                .as_deref()
                .is_some_and(|parent| !kept.contains(parent))
            {
                node.data.parent = None;
            }
        }

        let edges = graph
            .edges()
            .iter()
            .filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
            .map(|edge| Element {
                data: EdgeData {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    weight: edge.weight,
                    edge_type: edge.edge_type.as_ref().map(|t| t.to_string()),
                },
            })
            .collect();

        Ok(Self { nodes, edges })
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GraphError::serialization("Failed to serialize payload", Some(e)))
    }

    /// Serialize as a JavaScript assignment, e.g. `var elements = {...};`.
    ///
    /// The widget configuration reads its graph from a global variable.
    pub fn to_script(&self, variable: &str) -> Result<String> {
        let json = serde_json::to_string(self)
            .map_err(|e| GraphError::serialization("Failed to serialize payload", Some(e)))?;
        Ok(format!("var {variable} = {json};\n"))
    }

    /// Write pretty-printed JSON to a file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_string_pretty()?).map_err(|e| GraphError::io(path, e))
    }

    /// Parse a payload previously produced by this crate.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| GraphError::serialization("Failed to parse payload", Some(e)))
    }

    /// Read a payload from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// Find the data of a node by id.
    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.nodes.iter().map(|e| &e.data).find(|d| d.id == id)
    }

    /// Turn an exported payload back into an input snapshot.
    ///
    /// The payload carries no base health, so `base_health` supplies it per
    /// node id. Every node exported as root becomes an entry point, which
    /// keeps designated roots with incoming dependencies classified as root.
    pub fn into_snapshot(self, base_health: impl Fn(&str) -> bool) -> Snapshot {
        let nodes = self
            .nodes
            .into_iter()
            .map(|Element { data }| NodeSpec {
                base_healthy: base_health(&data.id),
                entry_point: data.root != 0,
                resource_type: data.resource_type.into(),
                parent: data.parent,
                id: data.id,
            })
            .collect();

        let edges = self
            .edges
            .into_iter()
            .map(|Element { data }| EdgeSpec {
                source: data.source,
                target: data.target,
                weight: data.weight,
                edge_type: data.edge_type.map(Into::into),
            })
            .collect();

        Snapshot { nodes, edges }
    }
}

fn node_data(node: &Node) -> Result<NodeData> {
    let liveness = node
        .liveness
        .ok_or_else(|| GraphError::inconsistent(format!("node {} has no liveness", node.id)))?;
    let importance = node
        .importance
        .ok_or_else(|| GraphError::inconsistent(format!("node {} has no importance", node.id)))?;
    if !(0.0..=100.0).contains(&importance) {
        return Err(GraphError::inconsistent(format!(
            "node {} has importance {importance} outside [0, 100]",
            node.id
        )));
    }

    Ok(NodeData {
        id: node.id.clone(),
        resource_type: node.resource_type.to_string(),
        importance,
        root: u8::from(liveness.root),
        leaf: u8::from(liveness.leaf),
        dead: u8::from(node.is_dead()),
        partlydead: u8::from(node.is_partly_dead()),
        parent: node.parent.clone(),
    })
}
