//! Classify the collector's inventory tables and write the widget payload.
//!
//! Usage:
//!
//! ```text
//! cargo run --example classify_inventory -- nodes.csv edges.csv [config.json] > elements.js
//! ```

use infragraph::{Classifier, ClassifierConfig};
use std::path::PathBuf;

fn main() -> infragraph::Result<()> {
    let args: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    let (nodes, edges) = match args.as_slice() {
        [nodes, edges] | [nodes, edges, _] => (nodes, edges),
        _ => {
            eprintln!("usage: classify_inventory <nodes.csv> <edges.csv> [config.json]");
            std::process::exit(2);
        }
    };

    let config = match args.get(2) {
        Some(path) => ClassifierConfig::from_json_file(path)?,
        None => ClassifierConfig::default(),
    };
    let variable = config.payload_variable.clone();
    let classified = Classifier::new(config)?.classify_inventory(nodes, edges)?;

    let report = classified.report();
    eprintln!(
        "{} resources: {} roots, {} leaves, {} partly dead, {} dead, {} cycles",
        report.nodes, report.roots, report.leaves, report.partly_dead, report.dead, report.cycles
    );

    print!("{}", classified.payload()?.to_script(&variable)?);
    Ok(())
}
