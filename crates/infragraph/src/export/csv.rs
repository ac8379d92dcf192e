//! CSV format export for data analysis in spreadsheets and pandas.
//!
//! Generates separate tables for nodes and edges. Node rows carry the full
//! classification: `id,type,parent,importance,root,leaf,dead,partlydead`.

use crate::error::{GraphError, Result};
use crate::graph::InfraGraph;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export nodes to a CSV file.
pub fn export_csv_nodes(graph: &InfraGraph, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| GraphError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_nodes(graph, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| GraphError::io(path, e))
}

/// Export edges to a CSV file.
pub fn export_csv_edges(graph: &InfraGraph, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| GraphError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_edges(graph, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| GraphError::io(path, e))
}

/// Export both nodes and edges to separate CSV files (convenience method).
pub fn export_csv(graph: &InfraGraph, nodes_path: &Path, edges_path: &Path) -> Result<()> {
    export_csv_nodes(graph, nodes_path)?;
    export_csv_edges(graph, edges_path)?;
    Ok(())
}

/// Write the node table to any writer.
///
/// Unclassified nodes get empty classification cells.
pub fn write_nodes<W: Write>(graph: &InfraGraph, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "id,type,parent,importance,root,leaf,dead,partlydead")?;

    for node in graph.nodes() {
        let importance = node.importance.map(|i| i.to_string()).unwrap_or_default();
        let flags = match node.liveness {
            Some(l) => format!(
                "{},{},{},{}",
                u8::from(l.root),
                u8::from(l.leaf),
                u8::from(node.is_dead()),
                u8::from(node.is_partly_dead())
            ),
            None => ",,,".to_string(),
        };
        writeln!(
            out,
            "{},{},{},{},{}",
            escape_csv(&node.id),
            escape_csv(node.resource_type.as_str()),
            escape_csv(node.parent.as_deref().unwrap_or("")),
            importance,
            flags
        )?;
    }

    Ok(())
}

/// Write the edge table to any writer.
pub fn write_edges<W: Write>(graph: &InfraGraph, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "source,target,weight,type")?;

    for edge in graph.edges() {
        writeln!(
            out,
            "{},{},{},{}",
            escape_csv(&edge.source),
            escape_csv(&edge.target),
            edge.weight,
            escape_csv(edge.edge_type.as_ref().map_or("", |t| t.as_str()))
        )?;
    }

    Ok(())
}

/// Escape CSV value (add quotes if contains comma, quote, or newline)
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
