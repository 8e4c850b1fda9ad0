// argus/src/commands/relate.rs
//
// USE CASE: Execute a relationship statement batch.

use comfy_table::Table;
use std::path::PathBuf;

use argus_core::application::RelationshipBuilder;
use argus_core::infrastructure::statements::{builtin_statements, load_statements};

use crate::commands::AppContext;

pub async fn execute(ctx: &AppContext, statements_path: Option<PathBuf>) -> anyhow::Result<()> {
    let statements = match statements_path
        .or_else(|| ctx.config.statements_path.as_ref().map(PathBuf::from))
    {
        Some(path) => {
            let path = if path.is_absolute() {
                path
            } else {
                ctx.config_dir.join(path)
            };
            load_statements(&path)?
        }
        None => builtin_statements(),
    };

    let builder = RelationshipBuilder::new(ctx.graph());
    let report = builder.build(&statements).await?;
    ctx.save_graph().await?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Type", "Created", "Status"]);
    for outcome in &report.details {
        let (created, status) = match (&outcome.counters, &outcome.error) {
            (Some(c), _) => (c.relationships_created.to_string(), "ok".to_string()),
            (None, Some(e)) => ("-".to_string(), format!("failed: {e}")),
            (None, None) => ("-".to_string(), "skipped".to_string()),
        };
        table.add_row(vec![
            outcome.index.to_string(),
            outcome.relationship_type.clone(),
            created,
            status,
        ]);
    }
    println!("{table}");

    if report.failed > 0 {
        eprintln!(
            "⚠️  {} of {} statements failed ({} relationships created)",
            report.failed, report.total_statements, report.relationships_created
        );
    } else {
        println!(
            "✨ {} statements executed, {} relationships created",
            report.total_statements, report.relationships_created
        );
    }
    Ok(())
}
