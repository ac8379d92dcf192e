//! Export module for handing classified graphs to external tools.
//!
//! Supports:
//! - **Payload**: the `elements` JSON consumed by the graph widget
//! - **DOT**: Graphviz visualization with the widget's color scheme
//! - **CSV**: Data analysis in spreadsheets/pandas

pub mod csv;
pub mod dot;
pub mod json;

pub use self::csv::{export_csv, export_csv_edges, export_csv_nodes};
pub use dot::{export_dot, export_dot_styled, DotOptions};
pub use json::{EdgeData, Element, NodeData, Payload};
