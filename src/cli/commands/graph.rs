//! Graph command handler

use std::path::PathBuf;
use tracing::info;

use super::write_output;
use crate::graph::NodeLinkGraph;
use crate::loader::load_records;

pub async fn cmd_graph(paths: &[PathBuf], output: Option<PathBuf>) -> anyhow::Result<()> {
    let records = load_records(paths).await?;
    let graph = NodeLinkGraph::from_records(&records);
    let json = graph.to_json()?;

    info!(
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "Built relation graph"
    );

    match output {
        Some(path) => {
            write_output(&path, &json).await?;
            println!(
                "✓ Wrote {} nodes and {} links to {}",
                graph.nodes.len(),
                graph.links.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
