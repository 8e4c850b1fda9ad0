// argus/src/commands/scan_db.rs
//
// USE CASE: PII scan over a relational database. The credential must
// resolve (including its password) before any table is touched.

use comfy_table::Table;

use argus_core::application::TabularScanner;
use argus_core::domain::pii::PatternRegistry;
use argus_core::infrastructure::adapters::DuckDbSource;
use argus_core::infrastructure::config::ConfigCredentialResolver;
use argus_core::ports::credentials::CredentialResolver;

use crate::commands::AppContext;

pub async fn execute(ctx: &AppContext, credential_name: String) -> anyhow::Result<()> {
    let resolver = ConfigCredentialResolver::new(&ctx.config);
    let credential = resolver.resolve(&credential_name)?;
    // Fail before scanning when the secret is missing or undecryptable.
    credential.password()?;

    let db_file = credential
        .database
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Connection '{credential_name}' names no database"))?;
    let db_path = ctx.config_dir.join(&db_file);
    let source = DuckDbSource::new(&db_path.to_string_lossy())?;

    let target = format!(
        "{}://{}@{}:{}/{}",
        credential.db_type, credential.username, credential.host, credential.port, db_file
    );
    println!("🕵️  Scanning {target} ...");

    let scanner = TabularScanner::new(ctx.documents(), PatternRegistry::builtin()?);
    let report = scanner.run(&source, &target).await?;

    let mut table = Table::new();
    table.set_header(vec!["Table", "Column", "Category", "Criticality", "Rows"]);
    for finding in &report.findings {
        table.add_row(vec![
            format!("{}.{}", finding.database, finding.table),
            finding.column.clone(),
            finding.pii_type.clone(),
            finding.criticality.as_str().to_string(),
            finding.row_count.to_string(),
        ]);
    }
    println!("{table}");
    println!(
        "✨ {} tables scanned ({} skipped), {} findings stored as run {}",
        report.scanned_tables.len(),
        report.skipped_tables.len(),
        report.total_findings,
        report.id
    );
    Ok(())
}
