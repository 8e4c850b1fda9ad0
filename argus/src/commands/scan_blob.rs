// argus/src/commands/scan_blob.rs
//
// USE CASE: PII scan over an object store directory.

use comfy_table::Table;
use std::path::PathBuf;

use argus_core::application::BlobScanner;
use argus_core::domain::pii::PatternRegistry;
use argus_core::infrastructure::adapters::DirBlobSource;

use crate::commands::AppContext;

pub async fn execute(ctx: &AppContext, root: PathBuf) -> anyhow::Result<()> {
    println!("🗂️  Scanning {} ...", root.display());

    let source = DirBlobSource::new(root);
    let scanner = BlobScanner::new(ctx.documents(), PatternRegistry::builtin()?);
    let report = scanner.run(&source).await?;

    let mut table = Table::new();
    table.set_header(vec!["Object", "Category", "Criticality", "Matches", "Samples"]);
    for finding in &report.findings {
        table.add_row(vec![
            finding.key.clone(),
            finding.pii_type.clone(),
            finding.criticality.as_str().to_string(),
            finding.match_count.to_string(),
            finding.masked_samples.join(", "),
        ]);
    }
    println!("{table}");
    println!(
        "✨ {} objects scanned ({} skipped), {} findings stored as run {}",
        report.scanned_objects.len(),
        report.skipped_objects.len(),
        report.total_findings,
        report.id
    );
    Ok(())
}
