//! Import of inventory data produced outside this crate.
//!
//! JSON snapshots are read with [`crate::Snapshot::from_json_file`]; this
//! module handles the tabular output of the resource collector.

pub mod csv;

pub use csv::{parse_inventory, read_inventory};
