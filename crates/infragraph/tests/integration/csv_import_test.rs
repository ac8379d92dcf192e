//! Integration tests for reading the collector's `nodes.csv` / `edges.csv`.

use infragraph::import::{parse_inventory, read_inventory};
use infragraph::{Classifier, ClassifierConfig, DanglingPolicy, EdgeType, GraphError, Health};
use std::path::PathBuf;
use tempfile::TempDir;

const NODES: &str = "\
type,name,description,weight,healthy
elb,front,Classic LB,1,
ec2,i-0abc,\"web, primary\",1,true
rds,orders,,1,false
dns,Shop.Example.com.,,1,
";

const EDGES: &str = "\
from_type,from_name,edge,to_type,to_name,weight
dns,shop.example.com,alias,elb,front,1
elb,front,,ec2,i-0abc,1
ec2,i-0abc,depends,rds,orders,
ec2,i-0abc,advisory,s3,logs,0
";

fn write_inventory(dir: &TempDir) -> (PathBuf, PathBuf) {
    let nodes = dir.path().join("nodes.csv");
    let edges = dir.path().join("edges.csv");
    std::fs::write(&nodes, NODES).unwrap();
    std::fs::write(&edges, EDGES).unwrap();
    (nodes, edges)
}

#[test]
fn test_collector_ids_and_columns() {
    let snapshot = parse_inventory(NODES, EDGES, DanglingPolicy::Materialize).unwrap();

    let ids: Vec<_> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["elb_front", "ec2_i-0abc", "rds_orders", "dns_shop.example.com", "s3_logs"]
    );
    assert!(snapshot.nodes[0].base_healthy);
    assert!(!snapshot.nodes[2].base_healthy);

    assert_eq!(snapshot.edges.len(), 4);
    assert_eq!(snapshot.edges[0].source, "dns_shop.example.com");
    assert_eq!(
        snapshot.edges[0].edge_type,
        Some(EdgeType::Other("alias".to_string()))
    );
    assert_eq!(snapshot.edges[1].edge_type, None);
    assert_eq!(snapshot.edges[2].weight, 1.0);
    assert_eq!(snapshot.edges[3].weight, 0.0);
}

#[test]
fn test_dangling_endpoint_rejected_by_default() {
    let err = parse_inventory(NODES, EDGES, DanglingPolicy::Reject).unwrap_err();
    assert!(matches!(err, GraphError::DanglingReference { ref to, .. } if to == "s3_logs"));
    assert!(err.is_construction_error());
}

#[test]
fn test_classify_inventory_files() {
    let dir = TempDir::new().unwrap();
    let (nodes, edges) = write_inventory(&dir);

    let config = ClassifierConfig {
        dangling: DanglingPolicy::Materialize,
        ..ClassifierConfig::default()
    };
    let classified = Classifier::new(config)
        .unwrap()
        .classify_inventory(&nodes, &edges)
        .unwrap();
    let graph = classified.graph();

    for id in ["rds_orders", "ec2_i-0abc", "elb_front", "dns_shop.example.com"] {
        assert!(graph.get_node(id).unwrap().is_dead(), "{id}");
    }
    let logs = graph.get_node("s3_logs").unwrap();
    assert_eq!(logs.health(), Some(Health::Healthy));
    assert!(logs.is_root());
    assert_eq!(classified.report().dead, 4);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let (nodes, _) = write_inventory(&dir);
    let err = read_inventory(&nodes, &dir.path().join("missing.csv"), DanglingPolicy::Reject)
        .unwrap_err();
    assert!(matches!(err, GraphError::Io { .. }));
}

#[test]
fn test_parse_errors_carry_line_numbers() {
    let nodes = "type,name\nec2,a\nec2,b\n";

    let err = parse_inventory(nodes, "from_type,from_name,to_type\n", DanglingPolicy::Reject)
        .unwrap_err();
    assert!(matches!(err, GraphError::Parse { line: 1, .. }));

    let edges = "from_type,from_name,to_type,to_name,weight\nec2,a,ec2,b,heavy\n";
    let err = parse_inventory(nodes, edges, DanglingPolicy::Reject).unwrap_err();
    assert!(matches!(err, GraphError::Parse { line: 2, .. }));

    let err = parse_inventory("type,name\nec2,a,extra\n", "", DanglingPolicy::Reject).unwrap_err();
    assert!(matches!(err, GraphError::Parse { line: 2, .. }));

    let err = parse_inventory("type,name,healthy\nec2,a,perhaps\n", "", DanglingPolicy::Reject)
        .unwrap_err();
    assert!(matches!(err, GraphError::Parse { line: 2, .. }));
}

#[test]
fn test_duplicate_rows_rejected_at_construction() {
    let nodes = "type,name\nec2,a\nEC2,a\n";
    let snapshot = parse_inventory(nodes, "", DanglingPolicy::Reject).unwrap();
    let err = Classifier::default().classify(snapshot).unwrap_err();
    assert!(matches!(err, GraphError::DuplicateId { ref node_id } if node_id == "ec2_a"));
}

#[test]
fn test_grouping_and_entry_point_columns() {
    let nodes = "name,type,parent,entry_point\nweb,asg,,\ni-1,ec2,asg_web,\ncdn,cloudfront,,yes\n";
    let edges = "from_type,from_name,to_type,to_name\nec2,i-1,cloudfront,cdn\n";

    let snapshot = parse_inventory(nodes, edges, DanglingPolicy::Reject).unwrap();
    let classified = Classifier::default().classify(snapshot).unwrap();
    let graph = classified.graph();

    assert_eq!(graph.parent("ec2_i-1").unwrap(), Some("asg_web"));
    assert!(graph.get_node("cloudfront_cdn").unwrap().is_root());
    assert!(graph.get_node("cloudfront_cdn").unwrap().entry_point);
}

#[test]
fn test_spreadsheet_byte_order_mark() {
    let nodes = format!("\u{feff}{NODES}");
    let edges = format!("\u{feff}{EDGES}");
    let snapshot = parse_inventory(&nodes, &edges, DanglingPolicy::Materialize).unwrap();
    assert_eq!(snapshot.nodes[0].id, "elb_front");
    assert_eq!(snapshot.edges.len(), 4);
}
