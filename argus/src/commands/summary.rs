// argus/src/commands/summary.rs
//
// USE CASE: Graph overview (node/edge counts + vulnerability histogram).

use comfy_table::Table;

use argus_core::application::SummaryService;

use crate::commands::AppContext;

pub async fn execute(ctx: &AppContext) -> anyhow::Result<()> {
    let service = SummaryService::new(ctx.graph());

    let graph = service.graph_summary().await?;
    let mut nodes = Table::new();
    nodes.set_header(vec!["Label", "Nodes"]);
    for (label, count) in &graph.nodes {
        nodes.add_row(vec![label.clone(), count.to_string()]);
    }
    println!("{nodes}");

    let mut edges = Table::new();
    edges.set_header(vec!["Relationship", "Edges"]);
    for (edge_type, count) in &graph.edges {
        edges.add_row(vec![edge_type.clone(), count.to_string()]);
    }
    println!("{edges}");

    let vulns = service.vulnerability_summary().await?;
    if !vulns.images.is_empty() {
        let mut images = Table::new();
        images.set_header(vec!["Image", "Total", "Severities"]);
        for image in &vulns.images {
            let severities = image
                .severity_counts
                .iter()
                .map(|(s, c)| format!("{s}={c}"))
                .collect::<Vec<_>>()
                .join(", ");
            images.add_row(vec![
                image.image_name.clone(),
                image.total.to_string(),
                severities,
            ]);
        }
        println!("{images}");
    }
    Ok(())
}
