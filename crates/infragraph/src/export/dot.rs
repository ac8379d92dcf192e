//! DOT format export for Graphviz visualization.
//!
//! Nodes are filled with the same palette the graph widget uses for the
//! classification flags, and advisory edges are dashed.

use crate::error::Result;
use crate::graph::{InfraGraph, Node};

/// Options for styling DOT export
#[derive(Debug, Clone)]
pub struct DotOptions {
    /// Fill for root nodes
    pub root_color: String,
    /// Fill for leaf nodes
    pub leaf_color: String,
    /// Fill for dead nodes
    pub dead_color: String,
    /// Fill for partly dead nodes
    pub partly_dead_color: String,
    /// Fill for every other node
    pub default_color: String,
    /// Graph layout direction: LR, TB, RL, BT
    pub rankdir: String,
    /// Append the importance score to node labels
    pub show_importance: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        DotOptions {
            root_color: "#00FC00".to_string(),
            leaf_color: "#0000FC".to_string(),
            dead_color: "#FC0000".to_string(),
            partly_dead_color: "#FCA500".to_string(),
            default_color: "#BBBBBB".to_string(),
            rankdir: "LR".to_string(),
            show_importance: false,
        }
    }
}

impl DotOptions {
    /// Fill color for a node.
    ///
    /// Later flags win, as in the widget's style sheet: partly dead over
    /// dead over leaf over root.
    pub fn fill_for(&self, node: &Node) -> &str {
        if node.is_partly_dead() {
            &self.partly_dead_color
        } else if node.is_dead() {
            &self.dead_color
        } else if node.is_leaf() {
            &self.leaf_color
        } else if node.is_root() {
            &self.root_color
        } else {
            &self.default_color
        }
    }
}

/// Export graph to Graphviz DOT format
pub fn export_dot(graph: &InfraGraph) -> Result<String> {
    export_dot_styled(graph, &DotOptions::default())
}

/// Export graph to Graphviz DOT format with custom styling
pub fn export_dot_styled(graph: &InfraGraph, options: &DotOptions) -> Result<String> {
    let mut output = String::new();

    // Header
    output.push_str("digraph infrastructure {\n");
    output.push_str(&format!("    rankdir={};\n", options.rankdir));
    output.push_str("    node [style=filled];\n\n");

    for node in graph.nodes() {
        let mut label = format!("{}\\n({})", escape_dot_label(&node.id), node.resource_type);
        if options.show_importance {
            if let Some(importance) = node.importance {
                label.push_str(&format!("\\nimportance: {importance}"));
            }
        }

        output.push_str(&format!(
            "    \"{}\" [label=\"{}\", fillcolor=\"{}\"];\n",
            escape_dot_label(&node.id),
            label,
            options.fill_for(node)
        ));
    }

    output.push('\n');

    for edge in graph.edges() {
        let mut attributes = vec![format!("penwidth={}", edge.weight.max(1.0))];
        if edge.weight == 0.0 {
            attributes.push("style=dashed".to_string());
        }
        if let Some(edge_type) = &edge.edge_type {
            attributes.push(format!("label=\"{}\"", escape_dot_label(edge_type.as_str())));
        }

        output.push_str(&format!(
            "    \"{}\" -> \"{}\" [{}];\n",
            escape_dot_label(&edge.source),
            escape_dot_label(&edge.target),
            attributes.join(", ")
        ));
    }

    output.push_str("}\n");

    Ok(output)
}

/// Escape special characters for DOT labels
fn escape_dot_label(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
