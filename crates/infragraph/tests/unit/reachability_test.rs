//! Unit tests for root/leaf detection and dead/partly-dead propagation.

use infragraph::{
    helpers, importance, reachability, Edge, GraphError, Health, ImportanceWeights, InfraGraph,
    Node,
};

fn health(graph: &InfraGraph, id: &str) -> Health {
    graph.get_node(id).unwrap().health().unwrap()
}

// A -> B -> C, C unreachable
fn chain_with_dead_tail() -> InfraGraph {
    let mut graph = InfraGraph::new();
    helpers::add_resource(&mut graph, "A", "elb").unwrap();
    helpers::add_resource(&mut graph, "B", "ec2").unwrap();
    helpers::add_unreachable_resource(&mut graph, "C", "rds").unwrap();
    helpers::add_dependency(&mut graph, "A", "B").unwrap();
    helpers::add_dependency(&mut graph, "B", "C").unwrap();
    graph
}

#[test]
fn test_dead_propagates_up_a_chain() {
    let mut graph = chain_with_dead_tail();
    let report = reachability::analyze(&mut graph).unwrap();

    for id in ["A", "B", "C"] {
        assert_eq!(health(&graph, id), Health::Dead, "{id}");
    }
    assert_eq!(report.dead, 3);
    assert!(graph.get_node("A").unwrap().is_root());
    assert!(graph.get_node("C").unwrap().is_leaf());
    assert!(!graph.get_node("B").unwrap().is_root());
    assert!(!graph.get_node("B").unwrap().is_leaf());
}

#[test]
fn test_healthy_alternative_makes_partly_dead() {
    let mut graph = chain_with_dead_tail();
    helpers::add_resource(&mut graph, "D", "ec2").unwrap();
    helpers::add_dependency(&mut graph, "A", "D").unwrap();

    reachability::analyze(&mut graph).unwrap();

    assert_eq!(health(&graph, "A"), Health::PartlyDead);
    assert_eq!(health(&graph, "B"), Health::Dead);
    assert_eq!(health(&graph, "C"), Health::Dead);
    assert_eq!(health(&graph, "D"), Health::Healthy);
    assert!(graph.get_node("D").unwrap().is_leaf());
}

#[test]
fn test_isolated_node_is_root_and_leaf() {
    let mut graph = InfraGraph::new();
    helpers::add_resource(&mut graph, "lonely", "s3").unwrap();
    let report = reachability::analyze(&mut graph).unwrap();

    let node = graph.get_node("lonely").unwrap();
    assert!(node.is_root());
    assert!(node.is_leaf());
    assert_eq!(node.health(), Some(Health::Healthy));
    assert_eq!(report.roots, 1);
    assert_eq!(report.leaves, 1);
}

#[test]
fn test_unreachable_isolated_node_is_dead() {
    let mut graph = InfraGraph::new();
    helpers::add_unreachable_resource(&mut graph, "gone", "ec2").unwrap();
    reachability::analyze(&mut graph).unwrap();

    let node = graph.get_node("gone").unwrap();
    assert!(node.is_dead());
    assert!(!node.is_partly_dead());
    assert!(node.is_root() && node.is_leaf());
}

#[test]
fn test_replication_and_advisory_edges_never_propagate() {
    let mut graph = InfraGraph::new();
    helpers::add_resource(&mut graph, "replica", "rds").unwrap();
    helpers::add_resource(&mut graph, "web", "ec2").unwrap();
    helpers::add_unreachable_resource(&mut graph, "primary", "rds").unwrap();
    helpers::add_unreachable_resource(&mut graph, "metrics", "es").unwrap();
    helpers::add_replication(&mut graph, "replica", "primary", 1.0).unwrap();
    helpers::add_advisory(&mut graph, "web", "metrics").unwrap();

    reachability::analyze(&mut graph).unwrap();

    assert_eq!(health(&graph, "replica"), Health::Healthy);
    assert_eq!(health(&graph, "web"), Health::Healthy);
    // Neither edge makes its target a non-root or its source a non-leaf
    assert!(graph.get_node("primary").unwrap().is_root());
    assert!(graph.get_node("replica").unwrap().is_leaf());
}

#[test]
fn test_zero_weight_edge_without_type_is_advisory() {
    let mut graph = InfraGraph::new();
    helpers::add_resource(&mut graph, "web", "ec2").unwrap();
    helpers::add_unreachable_resource(&mut graph, "cache", "elasticache").unwrap();
    graph.add_edge(Edge::new("web", "cache", 0.0)).unwrap();

    reachability::analyze(&mut graph).unwrap();
    assert_eq!(health(&graph, "web"), Health::Healthy);
}

#[test]
fn test_entry_point_with_dependents_is_root() {
    let mut graph = InfraGraph::new();
    graph.add_node(Node::new("cdn", "cloudfront").as_entry_point()).unwrap();
    helpers::add_resource(&mut graph, "dns", "dns").unwrap();
    helpers::add_dependency(&mut graph, "dns", "cdn").unwrap();

    reachability::analyze(&mut graph).unwrap();
    assert!(graph.get_node("cdn").unwrap().is_root());
    assert!(graph.get_node("dns").unwrap().is_root());
}

#[test]
fn test_diamond_with_one_dead_branch() {
    // top -> {left, right} -> bottom; left unreachable
    let mut graph = InfraGraph::new();
    helpers::add_resource(&mut graph, "top", "elbv2").unwrap();
    helpers::add_unreachable_resource(&mut graph, "left", "ec2").unwrap();
    helpers::add_resource(&mut graph, "right", "ec2").unwrap();
    helpers::add_resource(&mut graph, "bottom", "rds").unwrap();
    let edges = [
        ("top", "left"),
        ("top", "right"),
        ("left", "bottom"),
        ("right", "bottom"),
    ];
    for (source, target) in edges {
        helpers::add_dependency(&mut graph, source, target).unwrap();
    }

    reachability::analyze(&mut graph).unwrap();
    assert_eq!(health(&graph, "top"), Health::PartlyDead);
    assert_eq!(health(&graph, "bottom"), Health::Healthy);
    assert_eq!(health(&graph, "right"), Health::Healthy);
}

#[test]
fn test_partly_dead_does_not_propagate() {
    // a -> b -> {c, d}; d unreachable, so b is only degraded and a stays healthy
    let mut graph = InfraGraph::new();
    for id in ["a", "b", "c"] {
        helpers::add_resource(&mut graph, id, "ec2").unwrap();
    }
    helpers::add_unreachable_resource(&mut graph, "d", "ec2").unwrap();
    helpers::add_dependency(&mut graph, "a", "b").unwrap();
    helpers::add_dependency(&mut graph, "b", "c").unwrap();
    helpers::add_dependency(&mut graph, "b", "d").unwrap();

    reachability::analyze(&mut graph).unwrap();
    assert_eq!(health(&graph, "b"), Health::PartlyDead);
    assert_eq!(health(&graph, "a"), Health::Healthy);
}

#[test]
fn test_unknown_resource_type_classified_normally() {
    let mut graph = InfraGraph::new();
    helpers::add_resource(&mut graph, "thing", "quantum-widget").unwrap();
    helpers::add_unreachable_resource(&mut graph, "db", "rds").unwrap();
    helpers::add_dependency(&mut graph, "thing", "db").unwrap();

    reachability::analyze(&mut graph).unwrap();
    assert_eq!(health(&graph, "thing"), Health::Dead);
}

#[test]
fn test_self_loop_only_dependency() {
    let mut graph = InfraGraph::new();
    helpers::add_resource(&mut graph, "a", "sqs").unwrap();
    helpers::add_dependency(&mut graph, "a", "a").unwrap();

    let report = reachability::analyze(&mut graph).unwrap();
    let node = graph.get_node("a").unwrap();
    assert!(!node.is_root());
    assert!(!node.is_leaf());
    assert_eq!(node.health(), Some(Health::Healthy));
    assert_eq!(report.cycles, 1);
}

#[test]
fn test_rerun_replaces_previous_classification() {
    let mut graph = chain_with_dead_tail();
    reachability::analyze(&mut graph).unwrap();
    assert!(graph.nodes().iter().all(|n| n.liveness.is_some()));
    // Importance is still missing until the scorer runs
    assert!(!graph.is_classified());
    importance::score(&mut graph, &ImportanceWeights::default()).unwrap();
    assert!(graph.is_classified());

    graph.clear_classification();
    assert!(!graph.is_classified());
    assert!(graph.get_node("A").unwrap().health().is_none());

    reachability::analyze(&mut graph).unwrap();
    assert_eq!(health(&graph, "A"), Health::Dead);
    reachability::check_consistency(&graph).unwrap();
}

#[test]
fn test_consistency_requires_classification() {
    let graph = chain_with_dead_tail();
    assert!(matches!(
        reachability::check_consistency(&graph),
        Err(GraphError::InconsistentState { .. })
    ));
}

#[test]
fn test_insertion_order_does_not_matter() {
    let ids = ["a", "b", "c", "d", "e"];
    let edges = [("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("c", "e")];

    let build = |reverse: bool| {
        let mut graph = InfraGraph::new();
        let mut node_ids = ids.to_vec();
        let mut edge_list = edges.to_vec();
        if reverse {
            node_ids.reverse();
            edge_list.reverse();
        }
        for id in node_ids {
            if id == "d" {
                helpers::add_unreachable_resource(&mut graph, id, "rds").unwrap();
            } else {
                helpers::add_resource(&mut graph, id, "ec2").unwrap();
            }
        }
        for (source, target) in edge_list {
            helpers::add_dependency(&mut graph, source, target).unwrap();
        }
        reachability::analyze(&mut graph).unwrap();
        ids.iter()
            .map(|id| graph.get_node(id).unwrap().liveness)
            .collect::<Vec<_>>()
    };

    assert_eq!(build(false), build(true));
}
