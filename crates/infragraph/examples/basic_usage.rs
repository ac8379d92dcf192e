//! Basic usage example for infragraph
//!
//! This example demonstrates:
//! - Building a small web stack by hand
//! - Classifying liveness and importance
//! - Querying and exporting the result

use infragraph::{helpers, Classifier, InfraGraph, Node};

fn main() -> infragraph::Result<()> {
    let mut graph = InfraGraph::new();

    println!("Building a small web stack...\n");

    graph.add_node(Node::new("cloudfront_shop", "cloudfront").as_entry_point())?;
    helpers::add_resource(&mut graph, "elbv2_front", "elbv2")?;
    helpers::add_resource(&mut graph, "asg_web", "asg")?;
    helpers::add_grouped_resource(&mut graph, "ec2_web1", "ec2", "asg_web")?;
    helpers::add_grouped_resource(&mut graph, "ec2_web2", "ec2", "asg_web")?;
    helpers::add_resource(&mut graph, "rds_orders", "rds")?;
    helpers::add_unreachable_resource(&mut graph, "elasticache_sessions", "elasticache")?;
    helpers::add_resource(&mut graph, "s3_logs", "s3")?;
    println!("✓ Added {} resources", graph.node_count());

    helpers::add_weighted_dependency(&mut graph, "cloudfront_shop", "elbv2_front", 3.0)?;
    helpers::add_dependency(&mut graph, "elbv2_front", "ec2_web1")?;
    helpers::add_dependency(&mut graph, "elbv2_front", "ec2_web2")?;
    helpers::add_dependency(&mut graph, "ec2_web1", "rds_orders")?;
    helpers::add_dependency(&mut graph, "ec2_web2", "rds_orders")?;
    helpers::add_dependency(&mut graph, "ec2_web2", "elasticache_sessions")?;
    helpers::add_advisory(&mut graph, "ec2_web1", "s3_logs")?;
    println!("✓ Added {} relationships", graph.edge_count());

    let classified = Classifier::default().classify_graph(graph)?;
    let report = classified.report();
    println!(
        "\n--- Classification ---\n{} healthy, {} partly dead, {} dead",
        report.healthy, report.partly_dead, report.dead
    );

    println!("\n--- Ranking ---");
    for (id, importance) in classified.ranking() {
        let node = classified.graph().get_node(id)?;
        let health = node.health().map(|h| h.to_string()).unwrap_or_default();
        println!("  {importance:>6.2}  {id} ({health})");
    }

    let degraded = classified.graph().query().partly_dead().execute()?;
    println!("\nDegraded resources: {degraded:?}");

    println!("\n--- Payload ---");
    println!("{}", classified.payload()?.to_string_pretty()?);

    Ok(())
}
