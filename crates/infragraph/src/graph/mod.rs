//! Core graph types and operations.
//!
//! This module defines the fundamental building blocks:
//! - [`Node`]: Infrastructure resources with their health signal
//! - [`Edge`]: Directed "source depends on target" relationships
//! - [`InfraGraph`]: The arena holding both, with critical adjacency and
//!   grouping indices

mod types;
mod infragraph;
pub mod algorithms;

pub use types::{
    Direction, Edge, EdgeIndex, EdgeType, Health, Liveness, Node, NodeIndex, ResourceType,
};
pub use infragraph::InfraGraph;
