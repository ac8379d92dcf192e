//! Unit tests for QueryBuilder
//!
//! These tests verify the fluent query interface for finding resources by
//! type, grouping and classification.

use infragraph::{helpers, Classifier, InfraGraph, ResourceType};

fn fleet() -> InfraGraph {
    let mut graph = InfraGraph::new();
    helpers::add_resource(&mut graph, "elb_front", "elb").unwrap();
    helpers::add_resource(&mut graph, "asg_web", "asg").unwrap();
    helpers::add_grouped_resource(&mut graph, "ec2_web1", "ec2", "asg_web").unwrap();
    helpers::add_grouped_resource(&mut graph, "ec2_web2", "ec2", "asg_web").unwrap();
    helpers::add_unreachable_resource(&mut graph, "rds_orders", "rds").unwrap();
    helpers::add_resource(&mut graph, "rds_users", "rds").unwrap();
    helpers::add_dependency(&mut graph, "elb_front", "ec2_web1").unwrap();
    helpers::add_dependency(&mut graph, "elb_front", "ec2_web2").unwrap();
    helpers::add_dependency(&mut graph, "ec2_web1", "rds_orders").unwrap();
    helpers::add_dependency(&mut graph, "ec2_web2", "rds_orders").unwrap();
    helpers::add_dependency(&mut graph, "ec2_web2", "rds_users").unwrap();

    Classifier::default().classify_graph(graph).unwrap().into_graph()
}

#[test]
fn test_query_builder_resource_type_filter() {
    let graph = fleet();

    let results = graph
        .query()
        .resource_type(ResourceType::Rds)
        .execute()
        .unwrap();
    assert_eq!(results, vec!["rds_orders", "rds_users"]);

    // Wire names work too
    assert_eq!(graph.query().resource_type("ec2").count().unwrap(), 2);
}

#[test]
fn test_query_builder_health_filters() {
    let graph = fleet();

    assert_eq!(
        graph.query().dead().execute().unwrap(),
        vec!["ec2_web1", "rds_orders"]
    );
    assert_eq!(
        graph.query().partly_dead().execute().unwrap(),
        vec!["elb_front", "ec2_web2"]
    );
    assert_eq!(
        graph.query().healthy().execute().unwrap(),
        vec!["asg_web", "rds_users"]
    );
    assert_eq!(
        graph.query().unreachable().execute().unwrap(),
        vec!["rds_orders"]
    );
}

#[test]
fn test_query_builder_structure_filters() {
    let graph = fleet();

    assert_eq!(
        graph.query().root().execute().unwrap(),
        vec!["elb_front", "asg_web"]
    );
    assert_eq!(
        graph.query().leaf().execute().unwrap(),
        vec!["asg_web", "rds_orders", "rds_users"]
    );
    assert_eq!(
        graph.query().child_of("asg_web").execute().unwrap(),
        vec!["ec2_web1", "ec2_web2"]
    );
}

#[test]
fn test_query_builder_multiple_filters() {
    let graph = fleet();

    let results = graph
        .query()
        .resource_type("ec2")
        .dead()
        .child_of("asg_web")
        .execute()
        .unwrap();
    assert_eq!(results, vec!["ec2_web1"]);
}

#[test]
fn test_query_builder_id_pattern() {
    let graph = fleet();

    assert_eq!(graph.query().id_pattern("rds_*").count().unwrap(), 2);
    assert_eq!(
        graph.query().id_pattern("*web2").execute().unwrap(),
        vec!["ec2_web2"]
    );
    assert!(!graph.query().id_pattern("lambda_*").exists().unwrap());
}

#[test]
fn test_query_builder_min_importance() {
    let graph = fleet();

    let important = graph.query().min_importance(50.0).execute().unwrap();
    assert!(!important.is_empty());
    for id in important {
        assert!(graph.get_node(id).unwrap().importance.unwrap() >= 50.0);
    }
    // Dead nodes never exceed the cap
    assert!(!graph.query().dead().min_importance(20.01).exists().unwrap());
}

#[test]
fn test_query_builder_custom_and_limit() {
    let graph = fleet();

    let results = graph
        .query()
        .custom(|node| node.parent.is_some() || node.entry_point)
        .limit(1)
        .execute()
        .unwrap();
    assert_eq!(results, vec!["ec2_web1"]);

    assert_eq!(graph.query().limit(3).execute().unwrap().len(), 3);
}

#[test]
fn test_query_builder_unclassified_graph() {
    let mut graph = InfraGraph::new();
    helpers::add_resource(&mut graph, "a", "ec2").unwrap();

    assert_eq!(graph.query().count().unwrap(), 1);
    assert!(!graph.query().root().exists().unwrap());
    assert!(!graph.query().healthy().exists().unwrap());
    assert!(graph.query().entry_point().execute().unwrap().is_empty());
}
