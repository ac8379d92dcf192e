//! Query builder for fluent graph queries.
//!
//! Provides a fluent interface for selecting resources by type, grouping and
//! classification. Filters on classification flags only match nodes that
//! have been classified.

use crate::error::Result;
use crate::graph::{Health, InfraGraph, Node, ResourceType};

/// A filter predicate that can be applied to nodes.
type FilterFn = Box<dyn Fn(&Node) -> bool>;

/// Fluent query builder for graph operations.
///
/// Allows chaining multiple filters to find specific nodes in the graph.
/// Results are node ids in insertion order.
///
/// # Examples
///
/// ```
/// use infragraph::{helpers, reachability, InfraGraph, ResourceType};
///
/// # fn example() -> infragraph::Result<()> {
/// let mut graph = InfraGraph::new();
/// helpers::add_resource(&mut graph, "elb_front", "elb")?;
/// helpers::add_unreachable_resource(&mut graph, "rds_main", "rds")?;
/// helpers::add_dependency(&mut graph, "elb_front", "rds_main")?;
/// reachability::analyze(&mut graph)?;
///
/// let dead_databases = graph.query()
///     .resource_type(ResourceType::Rds)
///     .dead()
///     .execute()?;
/// assert_eq!(dead_databases, vec!["rds_main"]);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct QueryBuilder<'a> {
    graph: &'a InfraGraph,
    filters: Vec<FilterFn>,
    limit_value: Option<usize>,
}

impl<'a> QueryBuilder<'a> {
    /// Create a new query builder for the given graph.
    pub fn new(graph: &'a InfraGraph) -> Self {
        Self {
            graph,
            filters: Vec::new(),
            limit_value: None,
        }
    }

    /// Filter nodes by resource type.
    pub fn resource_type(mut self, resource_type: impl Into<ResourceType>) -> Self {
        let resource_type = resource_type.into();
        self.filters
            .push(Box::new(move |node| node.resource_type == resource_type));
        self
    }

    /// Only nodes with no critical dependents (or declared entry points).
    pub fn root(mut self) -> Self {
        self.filters.push(Box::new(Node::is_root));
        self
    }

    /// Only nodes with no critical dependencies.
    pub fn leaf(mut self) -> Self {
        self.filters.push(Box::new(Node::is_leaf));
        self
    }

    /// Only dead nodes.
    pub fn dead(mut self) -> Self {
        self.filters.push(Box::new(Node::is_dead));
        self
    }

    /// Only partly dead nodes.
    pub fn partly_dead(mut self) -> Self {
        self.filters.push(Box::new(Node::is_partly_dead));
        self
    }

    /// Only nodes classified as healthy.
    pub fn healthy(mut self) -> Self {
        self.filters
            .push(Box::new(|node| node.health() == Some(Health::Healthy)));
        self
    }

    /// Only declared entry points.
    pub fn entry_point(mut self) -> Self {
        self.filters.push(Box::new(|node| node.entry_point));
        self
    }

    /// Only nodes whose own health check failed.
    pub fn unreachable(mut self) -> Self {
        self.filters.push(Box::new(|node| !node.base_healthy));
        self
    }

    /// Only nodes scored at least `threshold`.
    pub fn min_importance(mut self, threshold: f64) -> Self {
        self.filters.push(Box::new(move |node| {
            node.importance.is_some_and(|i| i >= threshold)
        }));
        self
    }

    /// Filter node ids by glob pattern.
    ///
    /// `*` matches any run of characters.
    ///
    /// # Examples
    ///
    /// - `elb_*` - All classic load balancers by collector naming
    /// - `*prod*` - Anything with `prod` in its id
    pub fn id_pattern(mut self, pattern: &str) -> Self {
        let pattern = pattern.to_string();
        self.filters
            .push(Box::new(move |node| glob_match(&pattern, &node.id)));
        self
    }

    /// Only direct members of the compound node `parent`.
    pub fn child_of(mut self, parent: &str) -> Self {
        let parent = parent.to_string();
        self.filters
            .push(Box::new(move |node| node.parent.as_deref() == Some(parent.as_str())));
        self
    }

    /// Filter nodes using a custom predicate function.
    ///
    /// # Examples
    ///
    /// ```
    /// # use infragraph::InfraGraph;
    /// # fn example() -> infragraph::Result<()> {
    /// # let graph = InfraGraph::new();
    /// // Healthy resources the load balancer checks did not cover
    /// let results = graph.query()
    ///     .custom(|node| node.base_healthy && !node.entry_point)
    ///     .execute()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn custom<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Node) -> bool + 'static,
    {
        self.filters.push(Box::new(predicate));
        self
    }

    /// Limit the number of results returned.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit_value = Some(n);
        self
    }

    /// Execute the query and return matching node ids.
    pub fn execute(&self) -> Result<Vec<&'a str>> {
        let limit = self.limit_value.unwrap_or(usize::MAX);
        let graph = self.graph;

        Ok(graph
            .nodes()
            .iter()
            .filter(|node| self.matches_filters(node))
            .take(limit)
            .map(|node| node.id.as_str())
            .collect())
    }

    /// Count the number of matching nodes without allocating a result vector.
    pub fn count(&self) -> Result<usize> {
        Ok(self
            .graph
            .nodes()
            .iter()
            .filter(|node| self.matches_filters(node))
            .count())
    }

    /// Check if any nodes match the query (short-circuits on first match).
    pub fn exists(&self) -> Result<bool> {
        Ok(self
            .graph
            .nodes()
            .iter()
            .any(|node| self.matches_filters(node)))
    }

    /// Check if a node matches all filters.
    fn matches_filters(&self, node: &Node) -> bool {
        self.filters.iter().all(|filter| filter(node))
    }
}

/// Simple glob pattern matching.
///
/// Supports `*` (any characters) anywhere in the pattern.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_parts: Vec<&str> = pattern.split('*').collect();
    if pattern_parts.len() == 1 {
        // No wildcards - exact match
        return pattern == text;
    }

    let last = pattern_parts.len() - 1;
    let mut pos = 0;
    for (i, part) in pattern_parts.iter().enumerate() {
        if i == 0 {
            // First part must match start
            if !text.starts_with(part) {
                return false;
            }
            pos = part.len();
        } else if i == last {
            // Last part must match end without overlapping what was consumed
            return text.len() - pos >= part.len() && text.ends_with(part);
        } else if let Some(index) = text[pos..].find(part) {
            // Middle parts must exist in order
            pos += index + part.len();
        } else {
            return false;
        }
    }

    true
}
