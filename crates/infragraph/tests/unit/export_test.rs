//! Unit tests for the rendering payload and the DOT/CSV exports.

use infragraph::export::{export_dot_styled, DotOptions, Payload};
use infragraph::{helpers, Classifier, GraphError, InfraGraph};
use serde_json::{json, Value};
use tempfile::TempDir;

// elb -> web -> db (unreachable), elb -> cache, web ~> logs (advisory)
fn classified() -> InfraGraph {
    let mut graph = InfraGraph::new();
    helpers::add_resource(&mut graph, "elb", "elb").unwrap();
    helpers::add_grouped_resource(&mut graph, "web", "ec2", "asg").unwrap();
    helpers::add_resource(&mut graph, "asg", "asg").unwrap();
    helpers::add_unreachable_resource(&mut graph, "db", "rds").unwrap();
    helpers::add_resource(&mut graph, "cache", "elasticache").unwrap();
    helpers::add_resource(&mut graph, "logs", "s3").unwrap();
    helpers::add_dependency(&mut graph, "elb", "web").unwrap();
    helpers::add_dependency(&mut graph, "elb", "cache").unwrap();
    helpers::add_dependency(&mut graph, "web", "db").unwrap();
    helpers::add_advisory(&mut graph, "web", "logs").unwrap();

    Classifier::default().classify_graph(graph).unwrap().into_graph()
}

#[test]
fn test_payload_shape() {
    let payload = Payload::from_graph(&classified()).unwrap();
    let value: Value = serde_json::from_str(&payload.to_string_pretty().unwrap()).unwrap();

    assert_eq!(value["nodes"].as_array().unwrap().len(), 6);
    assert_eq!(value["edges"].as_array().unwrap().len(), 4);

    assert_eq!(
        value["nodes"][1]["data"],
        json!({
            "id": "web", "type": "ec2", "importance": 20.0,
            "root": 0, "leaf": 0, "dead": 1, "partlydead": 0,
            "parent": "asg"
        })
    );
    assert_eq!(value["nodes"][0]["data"]["partlydead"], json!(1));
    assert_eq!(value["nodes"][0]["data"]["dead"], json!(0));
    assert!(value["nodes"][0]["data"].get("parent").is_none());

    assert_eq!(
        value["edges"][3]["data"],
        json!({"source": "web", "target": "logs", "weight": 0.0, "type": "advisory"})
    );
}

#[test]
fn test_payload_flags_are_exclusive() {
    let payload = Payload::from_graph(&classified()).unwrap();
    for element in &payload.nodes {
        let data = &element.data;
        assert!(data.dead + data.partlydead <= 1, "{}", data.id);
        assert!((0.0..=100.0).contains(&data.importance));
    }
}

#[test]
fn test_payload_requires_classification() {
    let mut graph = InfraGraph::new();
    helpers::add_resource(&mut graph, "a", "ec2").unwrap();
    assert!(matches!(
        Payload::from_graph(&graph),
        Err(GraphError::InconsistentState { .. })
    ));
}

#[test]
fn test_filtered_payload_drops_dangling_pieces() {
    let graph = classified();
    let payload =
        Payload::from_graph_filtered(&graph, |node| node.id != "asg" && node.id != "db").unwrap();

    assert_eq!(payload.nodes.len(), 4);
    assert!(payload.node("web").unwrap().parent.is_none());
    assert!(payload
        .edges
        .iter()
        .all(|e| e.data.source != "db" && e.data.target != "db"));
    assert_eq!(payload.edges.len(), 3);
}

#[test]
fn test_payload_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("elements.json");

    let payload = Payload::from_graph(&classified()).unwrap();
    payload.write_to(&path).unwrap();
    assert_eq!(Payload::from_json_file(&path).unwrap(), payload);
}

#[test]
fn test_payload_script() {
    let payload = Payload::from_graph(&classified()).unwrap();
    let script = payload.to_script("elements").unwrap();
    assert!(script.starts_with("var elements = {\"nodes\":["));
    assert!(script.ends_with("};\n"));
}

#[test]
fn test_export_json_matches_payload() {
    let graph = classified();
    let json = graph.export_json().unwrap();
    assert_eq!(
        Payload::from_json_str(&json).unwrap(),
        Payload::from_graph(&graph).unwrap()
    );
}

#[test]
fn test_dot_export() {
    let dot = classified().export_dot().unwrap();

    assert!(dot.starts_with("digraph infrastructure {"));
    assert!(dot.contains(r##""db" [label="db\n(rds)", fillcolor="#FC0000"];"##));
    assert!(dot.contains(r##""elb" [label="elb\n(elb)", fillcolor="#FCA500"];"##));
    assert!(dot.contains(r##""cache" [label="cache\n(elasticache)", fillcolor="#0000FC"];"##));
    assert!(dot.contains(r##""web" -> "logs" [penwidth=1, style=dashed, label="advisory"];"##));
    assert!(dot.contains(r##""elb" -> "web" [penwidth=1, label="depends"];"##));
    assert!(dot.trim_end().ends_with('}'));
}

#[test]
fn test_dot_export_styled() {
    let options = DotOptions {
        rankdir: "TB".to_string(),
        show_importance: true,
        ..DotOptions::default()
    };
    let dot = export_dot_styled(&classified(), &options).unwrap();

    assert!(dot.contains("rankdir=TB;"));
    assert!(dot.contains(r#"label="db\n(rds)\nimportance: 20""#));
}

#[test]
fn test_csv_export() {
    let dir = TempDir::new().unwrap();
    let nodes_path = dir.path().join("nodes.csv");
    let edges_path = dir.path().join("edges.csv");

    classified().export_csv(&nodes_path, &edges_path).unwrap();

    let nodes = std::fs::read_to_string(&nodes_path).unwrap();
    let mut lines = nodes.lines();
    assert_eq!(
        lines.next(),
        Some("id,type,parent,importance,root,leaf,dead,partlydead")
    );
    assert_eq!(lines.next(), Some("elb,elb,,10,1,0,0,1"));
    assert_eq!(lines.next(), Some("web,ec2,asg,20,0,0,1,0"));

    let edges = std::fs::read_to_string(&edges_path).unwrap();
    assert_eq!(
        edges.lines().collect::<Vec<_>>(),
        vec![
            "source,target,weight,type",
            "elb,web,1,depends",
            "elb,cache,1,depends",
            "web,db,1,depends",
            "web,logs,0,advisory",
        ]
    );
}

#[test]
fn test_csv_export_bad_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no/such/dir/nodes.csv");
    let err = classified()
        .export_csv(&missing, &dir.path().join("edges.csv"))
        .unwrap_err();
    assert!(matches!(err, GraphError::Io { .. }));
}
