// argus/src/commands/project.rs
//
// USE CASE: Rebuild the graph projection of one family (or all).

use comfy_table::Table;
use std::str::FromStr;

use argus_core::application::GraphProjector;
use argus_core::domain::graph::EntityFamily;

use crate::commands::AppContext;

pub async fn execute(ctx: &AppContext, family: String) -> anyhow::Result<()> {
    let projector = GraphProjector::new(ctx.documents(), ctx.graph());

    let reports = if family.eq_ignore_ascii_case("all") {
        projector.rebuild_all().await?
    } else {
        let family = EntityFamily::from_str(&family).map_err(anyhow::Error::msg)?;
        vec![projector.rebuild(family).await?]
    };

    let mut table = Table::new();
    table.set_header(vec!["Family", "Labels", "Nodes", "Edges"]);

    for report in reports {
        table.add_row(vec![
            report.family.to_string(),
            report.labels_rebuilt.join(", "),
            report.nodes_created.to_string(),
            report.edges_created.to_string(),
        ]);
    }

    ctx.save_graph().await?;
    println!("{table}");
    println!("✨ Projection rebuilt");
    Ok(())
}
