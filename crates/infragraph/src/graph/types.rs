//! Core graph types: nodes, edges, resource kinds and health states.

use serde::{Deserialize, Serialize};

/// Position of a node in the graph arena (assigned in insertion order).
pub type NodeIndex = usize;

/// Position of an edge in the graph arena (assigned in insertion order).
pub type EdgeIndex = usize;

/// Kind of infrastructure resource a node stands for.
///
/// The set is fixed but extensible: any unrecognised wire name is kept in
/// [`ResourceType::Other`]. The type only drives rendering, never liveness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    /// EC2 compute instance
    Ec2,
    /// Classic load balancer (v1)
    Elb,
    /// Application/network load balancer (v2)
    ElbV2,
    /// CloudFront CDN distribution
    CloudFront,
    /// RDS relational database
    Rds,
    /// Auto-scaling group
    Asg,
    /// ElastiCache in-memory cache
    ElastiCache,
    /// S3 object store bucket
    S3,
    /// SQS message queue
    Sqs,
    /// Redshift data warehouse
    Redshift,
    /// Elasticsearch / OpenSearch cluster
    Elasticsearch,
    /// DNS record (Route53 name, public IP)
    Dns,
    /// External or unmanaged service
    External,
    /// Unresolved type, kept verbatim
    Other(String),
}

impl ResourceType {
    /// Wire name used in snapshots and payloads.
    pub fn as_str(&self) -> &str {
        match self {
            ResourceType::Ec2 => "ec2",
            ResourceType::Elb => "elb",
            ResourceType::ElbV2 => "elbv2",
            ResourceType::CloudFront => "cloudfront",
            ResourceType::Rds => "rds",
            ResourceType::Asg => "asg",
            ResourceType::ElastiCache => "elasticache",
            ResourceType::S3 => "s3",
            ResourceType::Sqs => "sqs",
            ResourceType::Redshift => "redshift",
            ResourceType::Elasticsearch => "elasticsearch",
            ResourceType::Dns => "dns",
            ResourceType::External => "external",
            ResourceType::Other(name) => name,
        }
    }

    /// Whether the wire name matched one of the known kinds.
    pub fn is_known(&self) -> bool {
        !matches!(self, ResourceType::Other(_))
    }
}

impl From<&str> for ResourceType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "ec2" => ResourceType::Ec2,
            "elb" => ResourceType::Elb,
            "elbv2" => ResourceType::ElbV2,
            "cloudfront" => ResourceType::CloudFront,
            "rds" => ResourceType::Rds,
            "asg" => ResourceType::Asg,
            "elasticache" => ResourceType::ElastiCache,
            "s3" => ResourceType::S3,
            "sqs" => ResourceType::Sqs,
            "redshift" => ResourceType::Redshift,
            "elasticsearch" | "es" => ResourceType::Elasticsearch,
            "dns" => ResourceType::Dns,
            "external" => ResourceType::External,
            _ => ResourceType::Other(value.to_string()),
        }
    }
}

impl From<String> for ResourceType {
    fn from(value: String) -> Self {
        ResourceType::from(value.as_str())
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        match value {
            ResourceType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of relationship carried by an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdgeType {
    /// Synchronous dependency: source needs target to function
    Depends,
    /// Asynchronous replication; never propagates failure
    Replicates,
    /// Advisory relationship; never propagates failure
    Advisory,
    /// Unrecognised relationship, treated like [`EdgeType::Depends`]
    Other(String),
}

impl EdgeType {
    /// Wire name used in snapshots and payloads.
    pub fn as_str(&self) -> &str {
        match self {
            EdgeType::Depends => "depends",
            EdgeType::Replicates => "replicates",
            EdgeType::Advisory => "advisory",
            EdgeType::Other(name) => name,
        }
    }

    /// Whether edges of this kind take part in liveness propagation.
    pub fn propagates_failure(&self) -> bool {
        !matches!(self, EdgeType::Replicates | EdgeType::Advisory)
    }
}

impl From<&str> for EdgeType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "depends" => EdgeType::Depends,
            "replicates" => EdgeType::Replicates,
            "advisory" => EdgeType::Advisory,
            _ => EdgeType::Other(value.to_string()),
        }
    }
}

impl From<String> for EdgeType {
    fn from(value: String) -> Self {
        EdgeType::from(value.as_str())
    }
}

impl From<EdgeType> for String {
    fn from(value: EdgeType) -> Self {
        match value {
            EdgeType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction for neighbor queries over critical edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Follow dependencies (source to target)
    Outgoing,
    /// Follow dependents (target to source)
    Incoming,
    /// Follow edges in both directions
    Both,
}

/// Liveness state of a node after classification.
///
/// Ordered so that transitions during propagation only ever increase:
/// `Healthy < PartlyDead < Dead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    /// Functioning with every critical dependency alive
    Healthy,
    /// Functioning but at least one critical dependency is dead
    #[serde(rename = "partlydead")]
    PartlyDead,
    /// Non-functional
    Dead,
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Health::Healthy => write!(f, "healthy"),
            Health::PartlyDead => write!(f, "partlydead"),
            Health::Dead => write!(f, "dead"),
        }
    }
}

/// Structural and health classification written by the reachability analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liveness {
    /// No incoming critical dependency, or designated entry point
    pub root: bool,
    /// No outgoing critical dependency
    pub leaf: bool,
    /// Healthy, partly dead or dead
    pub health: Health,
}

/// A resource node in the infrastructure graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique, stable identifier
    pub id: String,
    /// Kind of resource
    pub resource_type: ResourceType,
    /// External health signal (monitoring or declared state)
    pub base_healthy: bool,
    /// Externally designated entry point; always classified as root
    pub entry_point: bool,
    /// Enclosing compound node for grouped display
    pub parent: Option<String>,
    /// Written by the reachability analyzer
    pub liveness: Option<Liveness>,
    /// Written by the importance scorer
    pub importance: Option<f64>,
}

impl Node {
    /// Create a healthy, ungrouped node.
    pub fn new(id: impl Into<String>, resource_type: impl Into<ResourceType>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            base_healthy: true,
            entry_point: false,
            parent: None,
            liveness: None,
            importance: None,
        }
    }

    /// Builder: set the external health signal.
    pub fn with_health(mut self, base_healthy: bool) -> Self {
        self.base_healthy = base_healthy;
        self
    }

    /// Builder: mark the node as unreachable.
    pub fn unreachable(self) -> Self {
        self.with_health(false)
    }

    /// Builder: designate the node as an entry point.
    pub fn as_entry_point(mut self) -> Self {
        self.entry_point = true;
        self
    }

    /// Builder: place the node inside a compound parent.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Whether the node has been classified as root.
    pub fn is_root(&self) -> bool {
        self.liveness.is_some_and(|l| l.root)
    }

    /// Whether the node has been classified as leaf.
    pub fn is_leaf(&self) -> bool {
        self.liveness.is_some_and(|l| l.leaf)
    }

    /// Classified health, if the analyzer has run.
    pub fn health(&self) -> Option<Health> {
        self.liveness.map(|l| l.health)
    }

    /// Whether the node has been classified as dead.
    pub fn is_dead(&self) -> bool {
        self.health() == Some(Health::Dead)
    }

    /// Whether the node has been classified as partly dead.
    pub fn is_partly_dead(&self) -> bool {
        self.health() == Some(Health::PartlyDead)
    }

    /// Drop any classification from a previous run.
    pub fn clear_classification(&mut self) {
        self.liveness = None;
        self.importance = None;
    }
}

/// A directed dependency edge: `source` depends on `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Dependent node id
    pub source: String,
    /// Dependency node id
    pub target: String,
    /// `0` for advisory, `> 0` for load-bearing (magnitude is for rendering)
    pub weight: f64,
    /// Optional relationship kind
    pub edge_type: Option<EdgeType>,
}

impl Edge {
    /// Create an untyped edge.
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
            edge_type: None,
        }
    }

    /// Builder: set the relationship kind.
    pub fn with_type(mut self, edge_type: impl Into<EdgeType>) -> Self {
        self.edge_type = Some(edge_type.into());
        self
    }

    /// Whether this edge takes part in liveness propagation.
    ///
    /// Critical edges carry a positive weight and are neither advisory nor
    /// replication relationships.
    pub fn is_critical(&self) -> bool {
        self.weight > 0.0
            && self
                .edge_type
                .as_ref()
                .map_or(true, EdgeType::propagates_failure)
    }
}
