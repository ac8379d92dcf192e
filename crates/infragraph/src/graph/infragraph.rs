//! Main InfraGraph interface: the node/edge arena and its indices.

use super::types::{Direction, Edge, EdgeIndex, Node, NodeIndex};
use crate::error::{GraphError, Result};
use log::{debug, trace, warn};
use std::collections::{HashMap, HashSet};

/// The infrastructure dependency graph for a single classification run.
///
/// Nodes live in an arena and are addressed by [`NodeIndex`] internally and
/// by their string id externally. Two independent indices sit over the arena:
/// the critical dependency adjacency (both directions) used for liveness,
/// and the grouping tree built from each node's `parent`.
#[derive(Debug, Clone, Default)]
pub struct InfraGraph {
    nodes: Vec<Node>,
    ids: HashMap<String, NodeIndex>,
    edges: Vec<Edge>,
    endpoints: Vec<(NodeIndex, NodeIndex)>,
    // Every edge, by node, in insertion order
    adjacency_out: Vec<Vec<EdgeIndex>>,
    adjacency_in: Vec<Vec<EdgeIndex>>,
    // Distinct neighbors over critical edges only
    critical_out: Vec<Vec<NodeIndex>>,
    critical_in: Vec<Vec<NodeIndex>>,
    critical_pairs: HashSet<(NodeIndex, NodeIndex)>,
    // Grouping tree, valid after resolve_groups()
    parents: Vec<Option<NodeIndex>>,
    children: Vec<Vec<NodeIndex>>,
    groups_resolved: bool,
}

impl InfraGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with room for the given number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            ids: HashMap::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            endpoints: Vec::with_capacity(edges),
            adjacency_out: Vec::with_capacity(nodes),
            adjacency_in: Vec::with_capacity(nodes),
            critical_out: Vec::with_capacity(nodes),
            critical_in: Vec::with_capacity(nodes),
            critical_pairs: HashSet::with_capacity(edges),
            parents: Vec::new(),
            children: Vec::new(),
            groups_resolved: false,
        }
    }

    /// Add a node to the graph.
    ///
    /// # Returns
    ///
    /// The arena index assigned to the node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateId`] if a node with the same id exists.
    pub fn add_node(&mut self, node: Node) -> Result<NodeIndex> {
        if self.ids.contains_key(&node.id) {
            return Err(GraphError::DuplicateId { node_id: node.id });
        }

        let index = self.nodes.len();
        debug!("Adding node: id={}, type={}", node.id, node.resource_type);
        self.ids.insert(node.id.clone(), index);
        self.nodes.push(node);
        self.adjacency_out.push(Vec::new());
        self.adjacency_in.push(Vec::new());
        self.critical_out.push(Vec::new());
        self.critical_in.push(Vec::new());
        self.groups_resolved = false;

        Ok(index)
    }

    /// Add an edge to the graph.
    ///
    /// Critical edges (positive weight, not advisory or replication) are
    /// also entered into the critical adjacency; a repeated critical edge
    /// between the same pair is kept for export but indexed only once.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DanglingReference`] if either endpoint is absent.
    /// - [`GraphError::InvalidWeight`] if the weight is negative or not finite.
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeIndex> {
        debug!(
            "Adding edge: source={}, target={}, weight={}",
            edge.source, edge.target, edge.weight
        );
        let (source, target) = self.check_edge(&edge)?;
        Ok(self.insert_edge(edge, source, target))
    }

    /// Add multiple nodes in one operation.
    ///
    /// Either all nodes are added or none are.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateId`] if any id clashes with the graph
    /// or with another node in the batch.
    pub fn add_nodes_batch(&mut self, nodes: Vec<Node>) -> Result<Vec<NodeIndex>> {
        debug!("Adding batch of {} nodes", nodes.len());
        let mut seen = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if self.ids.contains_key(&node.id) || !seen.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateId {
                    node_id: node.id.clone(),
                });
            }
        }

        nodes.into_iter().map(|node| self.add_node(node)).collect()
    }

    /// Add multiple edges in one operation.
    ///
    /// Either all edges are added or none are.
    pub fn add_edges_batch(&mut self, edges: Vec<Edge>) -> Result<Vec<EdgeIndex>> {
        debug!("Adding batch of {} edges", edges.len());
        let mut resolved = Vec::with_capacity(edges.len());
        for edge in &edges {
            resolved.push(self.check_edge(edge)?);
        }

        let indices = edges
            .into_iter()
            .zip(resolved)
            .map(|(edge, (source, target))| self.insert_edge(edge, source, target))
            .collect::<Vec<_>>();
        trace!("Batch of {} edges added successfully", indices.len());

        Ok(indices)
    }

    /// Get a node by id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node doesn't exist.
    pub fn get_node(&self, id: &str) -> Result<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    /// Resolve a node id to its arena index.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node doesn't exist.
    pub fn index_of(&self, id: &str) -> Result<NodeIndex> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: id.to_string(),
            })
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get the total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of distinct critical dependency pairs.
    pub fn critical_edge_count(&self) -> usize {
        self.critical_pairs.len()
    }

    /// Ids this node critically depends on, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node doesn't exist.
    pub fn outgoing_critical(&self, id: &str) -> Result<Vec<&str>> {
        let index = self.index_of(id)?;
        Ok(self.ids_of(&self.critical_out[index]))
    }

    /// Ids of nodes that critically depend on this node, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node doesn't exist.
    pub fn incoming_critical(&self, id: &str) -> Result<Vec<&str>> {
        let index = self.index_of(id)?;
        Ok(self.ids_of(&self.critical_in[index]))
    }

    /// Critical neighbors in the specified direction.
    ///
    /// With [`Direction::Both`] a node that is both a dependency and a
    /// dependent is listed once.
    pub fn get_neighbors(&self, id: &str, direction: Direction) -> Result<Vec<&str>> {
        let index = self.index_of(id)?;
        Ok(self.ids_of(&self.neighbor_indices(index, direction)))
    }

    /// All edges (critical or not) from `source` to `target`.
    pub fn edges_between(&self, source: &str, target: &str) -> Result<Vec<&Edge>> {
        let source = self.index_of(source)?;
        let target = self.index_of(target)?;

        Ok(self.adjacency_out[source]
            .iter()
            .filter(|&&edge| self.endpoints[edge].1 == target)
            .map(|&edge| &self.edges[edge])
            .collect())
    }

    /// All edges leaving `id`, critical or not.
    pub fn outgoing_edges(&self, id: &str) -> Result<Vec<&Edge>> {
        let index = self.index_of(id)?;
        Ok(self.adjacency_out[index]
            .iter()
            .map(|&edge| &self.edges[edge])
            .collect())
    }

    /// All edges arriving at `id`, critical or not.
    pub fn incoming_edges(&self, id: &str) -> Result<Vec<&Edge>> {
        let index = self.index_of(id)?;
        Ok(self.adjacency_in[index]
            .iter()
            .map(|&edge| &self.edges[edge])
            .collect())
    }

    /// Build the grouping tree from each node's `parent`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DanglingReference`] if a parent id is unknown.
    /// - [`GraphError::InvalidOperation`] if the parent relation has a cycle.
    pub fn resolve_groups(&mut self) -> Result<()> {
        let mut parents = vec![None; self.nodes.len()];
        let mut children = vec![Vec::new(); self.nodes.len()];

        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(parent_id) = &node.parent {
                let parent = self.ids.get(parent_id).copied().ok_or_else(|| {
                    GraphError::DanglingReference {
                        from: node.id.clone(),
                        to: parent_id.clone(),
                    }
                })?;
                parents[index] = Some(parent);
                children[parent].push(index);
            }
        }

        // 0 = unvisited, 1 = on the current chain, 2 = known to reach a top-level node
        let mut state = vec![0u8; self.nodes.len()];
        for start in 0..self.nodes.len() {
            let mut chain = Vec::new();
            let mut current = Some(start);
            while let Some(index) = current {
                match state[index] {
                    2 => break,
                    1 => {
                        return Err(GraphError::InvalidOperation {
                            message: format!(
                                "Grouping cycle through node {}",
                                self.nodes[index].id
                            ),
                        });
                    }
                    _ => {
                        state[index] = 1;
                        chain.push(index);
                        current = parents[index];
                    }
                }
            }
            for index in chain {
                state[index] = 2;
            }
        }

        self.parents = parents;
        self.children = children;
        self.groups_resolved = true;
        trace!("Grouping tree resolved for {} nodes", self.nodes.len());

        Ok(())
    }

    /// Whether [`InfraGraph::resolve_groups`] has run since the last node was added.
    pub fn groups_resolved(&self) -> bool {
        self.groups_resolved
    }

    /// Parent id of a node in the grouping tree.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidOperation`] if groups are not resolved.
    pub fn parent(&self, id: &str) -> Result<Option<&str>> {
        let index = self.index_of(id)?;
        self.require_groups()?;
        Ok(self.parents[index].map(|p| self.nodes[p].id.as_str()))
    }

    /// Direct children of a node in the grouping tree.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidOperation`] if groups are not resolved.
    pub fn children(&self, id: &str) -> Result<Vec<&str>> {
        let index = self.index_of(id)?;
        self.require_groups()?;
        Ok(self.ids_of(&self.children[index]))
    }

    /// Forget every classification written by a previous run.
    pub fn clear_classification(&mut self) {
        for node in &mut self.nodes {
            node.clear_classification();
        }
    }

    /// Whether every node carries both liveness and importance.
    pub fn is_classified(&self) -> bool {
        self.nodes
            .iter()
            .all(|n| n.liveness.is_some() && n.importance.is_some())
    }

    /// Create a new query builder for this graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use infragraph::{InfraGraph, ResourceType};
    ///
    /// # fn example() -> infragraph::Result<()> {
    /// let graph = InfraGraph::new();
    /// // ... populate and classify graph ...
    ///
    /// let dead_databases = graph.query()
    ///     .resource_type(ResourceType::Rds)
    ///     .dead()
    ///     .execute()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn query(&self) -> crate::query::QueryBuilder<'_> {
        crate::query::QueryBuilder::new(self)
    }

    // ===== Algorithm Methods =====

    /// Everything that transitively critically depends on `id`.
    ///
    /// These are the nodes impaired if `id` fails.
    pub fn dependents_closure(&self, id: &str) -> Result<Vec<&str>> {
        let start = self.index_of(id)?;
        let found = super::algorithms::bfs(self, start, Direction::Incoming, None);
        Ok(self.ids_of(&found))
    }

    /// Everything `id` transitively critically depends on.
    pub fn dependencies_closure(&self, id: &str) -> Result<Vec<&str>> {
        let start = self.index_of(id)?;
        let found = super::algorithms::bfs(self, start, Direction::Outgoing, None);
        Ok(self.ids_of(&found))
    }

    /// Groups of nodes forming critical dependency cycles.
    pub fn dependency_cycles(&self) -> Vec<Vec<&str>> {
        super::algorithms::find_strongly_connected_components(self)
            .iter()
            .map(|scc| self.ids_of(scc))
            .collect()
    }

    // ===== Export Methods =====

    /// Export the classified graph as the rendering payload JSON.
    ///
    /// **Warning**: Large graphs (>10K nodes) will produce warnings.
    /// Graphs over 100K nodes will fail.
    pub fn export_json(&self) -> Result<String> {
        self.check_export_size()?;
        crate::export::Payload::from_graph(self)?.to_string_pretty()
    }

    /// Export graph to Graphviz DOT format with classification colors.
    pub fn export_dot(&self) -> Result<String> {
        self.check_export_size()?;
        crate::export::export_dot(self)
    }

    /// Export nodes and edges to separate CSV files.
    pub fn export_csv(
        &self,
        nodes_path: &std::path::Path,
        edges_path: &std::path::Path,
    ) -> Result<()> {
        self.check_export_size()?;
        crate::export::export_csv(self, nodes_path, edges_path)
    }

    // ===== Crate-internal accessors =====

    pub(crate) fn node_at(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    pub(crate) fn node_at_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index]
    }

    pub(crate) fn critical_out_of(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.critical_out[index]
    }

    pub(crate) fn critical_in_of(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.critical_in[index]
    }

    pub(crate) fn neighbor_indices(
        &self,
        index: NodeIndex,
        direction: Direction,
    ) -> Vec<NodeIndex> {
        match direction {
            Direction::Outgoing => self.critical_out[index].clone(),
            Direction::Incoming => self.critical_in[index].clone(),
            Direction::Both => {
                let mut seen = HashSet::new();
                self.critical_out[index]
                    .iter()
                    .chain(&self.critical_in[index])
                    .copied()
                    .filter(|n| seen.insert(*n))
                    .collect()
            }
        }
    }

    // Private helper methods

    fn ids_of(&self, indices: &[NodeIndex]) -> Vec<&str> {
        indices
            .iter()
            .map(|&index| self.nodes[index].id.as_str())
            .collect()
    }

    fn check_edge(&self, edge: &Edge) -> Result<(NodeIndex, NodeIndex)> {
        if !edge.weight.is_finite() || edge.weight < 0.0 {
            return Err(GraphError::InvalidWeight {
                source_id: edge.source.clone(),
                target_id: edge.target.clone(),
                weight: edge.weight,
            });
        }

        let endpoint = |id: &String| {
            self.ids
                .get(id)
                .copied()
                .ok_or_else(|| GraphError::DanglingReference {
                    from: format!("{} -> {}", edge.source, edge.target),
                    to: id.clone(),
                })
        };

        Ok((endpoint(&edge.source)?, endpoint(&edge.target)?))
    }

    fn insert_edge(&mut self, edge: Edge, source: NodeIndex, target: NodeIndex) -> EdgeIndex {
        let index = self.edges.len();

        if edge.is_critical() && self.critical_pairs.insert((source, target)) {
            self.critical_out[source].push(target);
            self.critical_in[target].push(source);
        }

        self.adjacency_out[source].push(index);
        self.adjacency_in[target].push(index);
        self.endpoints.push((source, target));
        self.edges.push(edge);

        index
    }

    fn require_groups(&self) -> Result<()> {
        if self.groups_resolved {
            Ok(())
        } else {
            Err(GraphError::InvalidOperation {
                message: "Grouping tree not resolved; call resolve_groups() first".to_string(),
            })
        }
    }

    /// Check graph size for export operations and issue warnings/errors.
    fn check_export_size(&self) -> Result<()> {
        let node_count = self.node_count();

        if node_count > 100_000 {
            return Err(GraphError::InvalidOperation {
                message: format!(
                    "Graph too large for export ({node_count} nodes > 100K limit). Use a query to export a subset."
                ),
            });
        }

        if node_count > 10_000 {
            warn!("Exporting large graph ({node_count} nodes); the renderer may struggle");
        }

        Ok(())
    }
}
