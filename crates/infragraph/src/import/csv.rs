//! Inventory tables written by the resource collector.
//!
//! `nodes.csv` has the header `type,name,description,weight` and may add
//! `healthy`, `parent` and `entry_point` columns. `edges.csv` has the header
//! `from_type,from_name,edge,to_type,to_name,weight`. Columns are located by
//! header name, so their order does not matter. A resource's node id is
//! `{type}_{name}` (see [`crate::helpers::resource_id`]).

use crate::config::DanglingPolicy;
use crate::error::{GraphError, Result};
use crate::graph::{EdgeType, ResourceType};
use crate::helpers::{normalize_dns_name, resource_id};
use crate::snapshot::{EdgeSpec, NodeSpec, Snapshot};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Read `nodes.csv` and `edges.csv` into a snapshot.
pub fn read_inventory(
    nodes_path: &Path,
    edges_path: &Path,
    dangling: DanglingPolicy,
) -> Result<Snapshot> {
    let nodes = std::fs::read_to_string(nodes_path).map_err(|e| GraphError::io(nodes_path, e))?;
    let edges = std::fs::read_to_string(edges_path).map_err(|e| GraphError::io(edges_path, e))?;
    parse_inventory(&nodes, &edges, dangling)
}

/// Parse the contents of `nodes.csv` and `edges.csv` into a snapshot.
///
/// # Errors
///
/// - [`GraphError::Parse`] for malformed rows or missing columns.
/// - [`GraphError::DanglingReference`] for an edge to an unlisted resource
///   under [`DanglingPolicy::Reject`].
pub fn parse_inventory(
    nodes_csv: &str,
    edges_csv: &str,
    dangling: DanglingPolicy,
) -> Result<Snapshot> {
    let mut nodes = parse_nodes(nodes_csv)?;
    let mut known: HashSet<String> = nodes.iter().map(|n| n.id.clone()).collect();

    let mut edges = Vec::new();
    let mut materialized = 0;
    for row in parse_edge_rows(edges_csv)? {
        for (resource_type, id) in [
            (&row.source_type, &row.edge.source),
            (&row.target_type, &row.edge.target),
        ] {
            if known.contains(id) {
                continue;
            }
            match dangling {
                DanglingPolicy::Reject => {
                    return Err(GraphError::DanglingReference {
                        from: format!(
                            "{} -> {} (line {})",
                            row.edge.source, row.edge.target, row.line
                        ),
                        to: id.clone(),
                    });
                }
                DanglingPolicy::Materialize => {
                    known.insert(id.clone());
                    materialized += 1;
                    nodes.push(NodeSpec {
                        id: id.clone(),
                        resource_type: resource_type.clone(),
                        base_healthy: true,
                        entry_point: false,
                        parent: None,
                    });
                }
            }
        }
        edges.push(row.edge);
    }

    if materialized > 0 {
        warn!(
            "Materialized {materialized} resources referenced by edges but missing from the node table"
        );
    }
    debug!("Parsed inventory: {} nodes, {} edges", nodes.len(), edges.len());

    Ok(Snapshot { nodes, edges })
}

struct EdgeRow {
    line: usize,
    source_type: ResourceType,
    target_type: ResourceType,
    edge: EdgeSpec,
}

fn parse_nodes(text: &str) -> Result<Vec<NodeSpec>> {
    let mut records = parse_records(text)?.into_iter();
    let Some((header_line, header)) = records.next() else {
        return Ok(Vec::new());
    };
    let columns = Columns::new(header_line, &header);
    let type_col = columns.require("type")?;
    let name_col = columns.require("name")?;
    let healthy_col = columns.optional("healthy");
    let parent_col = columns.optional("parent");
    let entry_col = columns.optional("entry_point");

    let mut nodes = Vec::new();
    for (line, record) in records {
        columns.check_width(line, &record)?;
        let resource_type = ResourceType::from(record[type_col].as_str());
        let id = node_id(&resource_type, &record[name_col]);
        let field = |col: Option<usize>| col.map_or("", |c| record[c].trim());

        nodes.push(NodeSpec {
            id,
            base_healthy: parse_bool(line, "healthy", field(healthy_col), true)?,
            entry_point: parse_bool(line, "entry_point", field(entry_col), false)?,
            parent: Some(field(parent_col))
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            resource_type,
        });
    }

    Ok(nodes)
}

fn parse_edge_rows(text: &str) -> Result<Vec<EdgeRow>> {
    let mut records = parse_records(text)?.into_iter();
    let Some((header_line, header)) = records.next() else {
        return Ok(Vec::new());
    };
    let columns = Columns::new(header_line, &header);
    let from_type_col = columns.require("from_type")?;
    let from_name_col = columns.require("from_name")?;
    let to_type_col = columns.require("to_type")?;
    let to_name_col = columns.require("to_name")?;
    let edge_col = columns.optional("edge");
    let weight_col = columns.optional("weight");

    let mut rows = Vec::new();
    for (line, record) in records {
        columns.check_width(line, &record)?;
        let source_type = ResourceType::from(record[from_type_col].as_str());
        let target_type = ResourceType::from(record[to_type_col].as_str());
        let edge_type = edge_col
            .map(|c| record[c].trim())
            .filter(|t| !t.is_empty())
            .map(EdgeType::from);
        let weight = match weight_col.map(|c| record[c].trim()).filter(|w| !w.is_empty()) {
            Some(raw) => raw.parse::<f64>().map_err(|_| GraphError::Parse {
                line,
                message: format!("weight {raw:?} is not a number"),
            })?,
            None => 1.0,
        };

        rows.push(EdgeRow {
            line,
            edge: EdgeSpec {
                source: node_id(&source_type, &record[from_name_col]),
                target: node_id(&target_type, &record[to_name_col]),
                weight,
                edge_type,
            },
            source_type,
            target_type,
        });
    }

    Ok(rows)
}

fn node_id(resource_type: &ResourceType, name: &str) -> String {
    match resource_type {
        ResourceType::Dns => resource_id(resource_type, &normalize_dns_name(name)),
        _ => resource_id(resource_type, name.trim()),
    }
}

fn parse_bool(line: usize, column: &str, raw: &str, default: bool) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(GraphError::Parse {
            line,
            message: format!("{column} value {other:?} is not a boolean"),
        }),
    }
}

/// Header lookup for one table.
struct Columns {
    line: usize,
    index: HashMap<String, usize>,
    width: usize,
}

impl Columns {
    fn new(line: usize, header: &[String]) -> Self {
        Self {
            line,
            index: header
                .iter()
                .enumerate()
                .map(|(i, name)| (name.trim().to_ascii_lowercase(), i))
                .collect(),
            width: header.len(),
        }
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.optional(name).ok_or_else(|| GraphError::Parse {
            line: self.line,
            message: format!("missing required column {name:?}"),
        })
    }

    fn optional(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn check_width(&self, line: usize, record: &[String]) -> Result<()> {
        if record.len() == self.width {
            Ok(())
        } else {
            Err(GraphError::Parse {
                line,
                message: format!("expected {} columns, found {}", self.width, record.len()),
            })
        }
    }
}

/// Split CSV text into records, each tagged with the line it starts on.
///
/// Handles quoted fields containing commas, doubled quotes and line breaks.
/// Blank lines and a leading byte order mark are skipped.
fn parse_records(text: &str) -> Result<Vec<(usize, Vec<String>)>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                finish_record(&mut records, &mut record, &mut field, record_line);
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(GraphError::Parse {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    finish_record(&mut records, &mut record, &mut field, record_line);

    Ok(records)
}

fn finish_record(
    records: &mut Vec<(usize, Vec<String>)>,
    record: &mut Vec<String>,
    field: &mut String,
    line: usize,
) {
    if record.is_empty() && field.is_empty() {
        return;
    }
    record.push(std::mem::take(field));
    records.push((line, std::mem::take(record)));
}
