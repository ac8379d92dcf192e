//! End-to-end classification: snapshot → store → liveness → importance → payload.

use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::export::Payload;
use crate::graph::InfraGraph;
use crate::reachability::{self, LivenessReport};
use crate::snapshot::Snapshot;
use crate::{importance, import};
use log::{debug, info};
use rayon::prelude::*;
use std::path::Path;

/// Runs classification with a fixed configuration.
///
/// A classifier holds no per-run state, so one instance can classify any
/// number of snapshots, including concurrently.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GraphError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Build and classify the graph described by a snapshot.
    pub fn classify(&self, snapshot: Snapshot) -> Result<ClassifiedGraph> {
        self.classify_graph(snapshot.into_graph()?)
    }

    /// Classify an already constructed graph.
    ///
    /// Any classification from an earlier run is replaced.
    pub fn classify_graph(&self, mut graph: InfraGraph) -> Result<ClassifiedGraph> {
        if !graph.groups_resolved() {
            graph.resolve_groups()?;
        }
        let report = reachability::analyze(&mut graph)?;
        importance::score(&mut graph, &self.config.importance)?;
        debug!("Classification complete for {} nodes", graph.node_count());

        Ok(ClassifiedGraph { graph, report })
    }

    /// Read the collector's `nodes.csv` / `edges.csv` and classify them.
    ///
    /// Unknown edge endpoints are handled according to the configured
    /// [`crate::DanglingPolicy`].
    pub fn classify_inventory(
        &self,
        nodes_path: &Path,
        edges_path: &Path,
    ) -> Result<ClassifiedGraph> {
        let snapshot = import::read_inventory(nodes_path, edges_path, self.config.dangling)?;
        self.classify(snapshot)
    }

    /// Classify independent snapshots in parallel.
    ///
    /// Each snapshot gets its own graph; results come back in input order
    /// and a failing snapshot does not affect the others.
    pub fn classify_batch(&self, snapshots: Vec<Snapshot>) -> Vec<Result<Payload>> {
        info!("Classifying batch of {} snapshots", snapshots.len());
        snapshots
            .into_par_iter()
            .map(|snapshot| self.classify(snapshot)?.payload())
            .collect()
    }
}

/// A graph whose every node carries liveness and importance.
#[derive(Debug, Clone)]
pub struct ClassifiedGraph {
    graph: InfraGraph,
    report: LivenessReport,
}

impl ClassifiedGraph {
    /// The classified graph.
    pub fn graph(&self) -> &InfraGraph {
        &self.graph
    }

    /// Summary of the liveness run.
    pub fn report(&self) -> &LivenessReport {
        &self.report
    }

    /// The rendering payload.
    pub fn payload(&self) -> Result<Payload> {
        Payload::from_graph(&self.graph)
    }

    /// Nodes by descending importance, ties broken by id.
    pub fn ranking(&self) -> Vec<(&str, f64)> {
        importance::ranking(&self.graph)
    }

    /// Give up the classification summary and keep the graph.
    pub fn into_graph(self) -> InfraGraph {
        self.graph
    }
}
