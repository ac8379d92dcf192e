//! Convenience helpers for common resources and relationships.
//!
//! These reduce boilerplate when building graphs by hand, in tests, or from
//! inventory tables: adding resources, the different kinds of dependency
//! edges, and the naming conventions the inventory collector uses.

use crate::error::Result;
use crate::graph::{Edge, EdgeIndex, EdgeType, InfraGraph, Node, NodeIndex, ResourceType};

/// Add a healthy resource node.
///
/// # Arguments
///
/// * `graph` - The graph to add the resource to
/// * `id` - Unique node id
/// * `resource_type` - Resource kind (e.g. `"ec2"`, `ResourceType::Rds`)
///
/// # Returns
///
/// The arena index of the created node.
pub fn add_resource(
    graph: &mut InfraGraph,
    id: &str,
    resource_type: impl Into<ResourceType>,
) -> Result<NodeIndex> {
    graph.add_node(Node::new(id, resource_type))
}

/// Add a resource whose base health is unreachable.
pub fn add_unreachable_resource(
    graph: &mut InfraGraph,
    id: &str,
    resource_type: impl Into<ResourceType>,
) -> Result<NodeIndex> {
    graph.add_node(Node::new(id, resource_type).unreachable())
}

/// Add a resource nested inside a compound parent node.
///
/// The parent is only resolved by [`InfraGraph::resolve_groups`], so it may
/// be added before or after its members.
pub fn add_grouped_resource(
    graph: &mut InfraGraph,
    id: &str,
    resource_type: impl Into<ResourceType>,
    parent: &str,
) -> Result<NodeIndex> {
    graph.add_node(Node::new(id, resource_type).with_parent(parent))
}

/// Add a load-bearing dependency of weight 1: `source` needs `target`.
pub fn add_dependency(graph: &mut InfraGraph, source: &str, target: &str) -> Result<EdgeIndex> {
    add_weighted_dependency(graph, source, target, 1.0)
}

/// Add a load-bearing dependency with an explicit weight.
///
/// The weight only affects rendering emphasis; any positive value is critical.
pub fn add_weighted_dependency(
    graph: &mut InfraGraph,
    source: &str,
    target: &str,
    weight: f64,
) -> Result<EdgeIndex> {
    graph.add_edge(Edge::new(source, target, weight).with_type(EdgeType::Depends))
}

/// Add an advisory relationship (weight 0); failure of `target` never impairs `source`.
pub fn add_advisory(graph: &mut InfraGraph, source: &str, target: &str) -> Result<EdgeIndex> {
    graph.add_edge(Edge::new(source, target, 0.0).with_type(EdgeType::Advisory))
}

/// Add an asynchronous replication relationship.
///
/// Replication edges are rendered with their weight but never propagate failure.
pub fn add_replication(
    graph: &mut InfraGraph,
    source: &str,
    target: &str,
    weight: f64,
) -> Result<EdgeIndex> {
    graph.add_edge(Edge::new(source, target, weight).with_type(EdgeType::Replicates))
}

/// Node id the inventory collector uses for a resource: `{type}_{name}`.
///
/// A DNS record and the load balancer it aliases often share the same
/// name, so the type prefix keeps their ids apart.
pub fn resource_id(resource_type: &ResourceType, name: &str) -> String {
    format!("{}_{}", resource_type.as_str(), name)
}

/// Normalize a DNS name the way the collector does.
///
/// Lower-cases, strips the trailing root dot and the `dualstack.` prefix
/// load balancer aliases carry.
pub fn normalize_dns_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .trim_end_matches('.')
        .replace("dualstack.", "")
}

/// Ids of resources of the given type that critically depend on `id`.
pub fn dependents_of_type<'a>(
    graph: &'a InfraGraph,
    id: &str,
    resource_type: &ResourceType,
) -> Result<Vec<&'a str>> {
    let dependents = graph.incoming_critical(id)?;
    Ok(dependents
        .into_iter()
        .filter(|dependent| {
            graph
                .get_node(dependent)
                .is_ok_and(|node| &node.resource_type == resource_type)
        })
        .collect())
}
