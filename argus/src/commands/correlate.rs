// argus/src/commands/correlate.rs
//
// USE CASE: KEV-to-container correlation view.

use comfy_table::Table;

use argus_core::application::CorrelationService;

use crate::commands::AppContext;

pub async fn execute(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let result = CorrelationService::new(ctx.documents()).run().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let summary = &result.summary;
    let mut table = Table::new();
    table.set_header(vec!["KEV entries", "Matched", "Matched %", "Affected images"]);
    table.add_row(vec![
        summary.total_kev_vulnerabilities.to_string(),
        summary.total_matched_in_docker.to_string(),
        format!("{:.2}", summary.percentage_matched),
        summary.affected_images.to_string(),
    ]);
    println!("{table}");

    if !result.correlated_vulnerabilities.is_empty() {
        let mut detail = Table::new();
        detail.set_header(vec!["CVE", "Severity", "Package", "Version", "Image"]);
        for finding in &result.correlated_vulnerabilities {
            detail.add_row(vec![
                finding.cve_id.clone(),
                finding.severity.clone(),
                finding.package_name.clone(),
                finding.installed_version.clone(),
                finding.image_name.clone(),
            ]);
        }
        println!("{detail}");
    }
    Ok(())
}
