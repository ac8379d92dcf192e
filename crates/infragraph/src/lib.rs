//! # infragraph
//!
//! A dependency graph of cloud infrastructure that tells you which resources
//! are dead, which are partly dead, and which matter most.
//!
//! ## Core Principles
//!
//! - **Collector Agnostic**: Bring your own inventory, we handle the graph
//! - **Deterministic**: The same snapshot always yields the same classification
//! - **Zero Magic**: Explicit over implicit, always
//!
//! ## Architecture
//!
//! infragraph is organized in layers:
//!
//! ```text
//! Inventory (collector CSV tables, JSON snapshots)
//!     ↓
//! Graph Store (resources, dependency edges, groups)
//!     ↓
//! Reachability Analyzer (root / leaf / dead / partly dead)
//!     ↓
//! Importance Scorer ([10, 100], dead capped at 20)
//!     ↓
//! Payload Exporter (elements JSON, DOT, CSV)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use infragraph::{helpers, Classifier, InfraGraph};
//!
//! # fn main() -> infragraph::Result<()> {
//! let mut graph = InfraGraph::new();
//! helpers::add_resource(&mut graph, "elb_front", "elb")?;
//! helpers::add_resource(&mut graph, "ec2_web", "ec2")?;
//! helpers::add_unreachable_resource(&mut graph, "rds_main", "rds")?;
//! helpers::add_dependency(&mut graph, "elb_front", "ec2_web")?;
//! helpers::add_dependency(&mut graph, "ec2_web", "rds_main")?;
//!
//! let classified = Classifier::default().classify_graph(graph)?;
//! let payload = classified.payload()?;
//! assert_eq!(payload.node("elb_front").map(|n| n.dead), Some(1));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod classifier;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod helpers;
pub mod import;
pub mod importance;
pub mod query;
pub mod reachability;
pub mod snapshot;

// Re-export main types
pub use classifier::{ClassifiedGraph, Classifier};
pub use config::{ClassifierConfig, DanglingPolicy};
pub use error::{GraphError, Result};
pub use export::Payload;
pub use graph::{
    Direction, Edge, EdgeIndex, EdgeType, Health, InfraGraph, Liveness, Node, NodeIndex,
    ResourceType,
};
pub use importance::ImportanceWeights;
pub use query::QueryBuilder;
pub use reachability::LivenessReport;
pub use snapshot::{EdgeSpec, NodeSpec, Snapshot};
