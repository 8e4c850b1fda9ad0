// argus/src/commands/kev_sync.rs
//
// USE CASE: Refresh the KEV catalog from a feed document on disk.

use std::path::PathBuf;

use argus_core::application::KevCatalogService;
use argus_core::domain::kev::KevFeed;

use crate::commands::AppContext;

pub async fn execute(ctx: &AppContext, feed_path: PathBuf) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&feed_path)?;
    let feed: KevFeed = serde_json::from_str(&content)?;

    let service = KevCatalogService::new(ctx.documents());
    let report = service.refresh_catalog(feed).await?;

    println!(
        "✨ Catalog refreshed: {} feed entries, {} imported, {} replaced",
        report.feed_entries, report.imported, report.removed
    );
    Ok(())
}
