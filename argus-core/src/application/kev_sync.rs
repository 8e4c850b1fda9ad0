// argus-core/src/application/kev_sync.rs
//
// Full-replace refresh of the Known Exploited Vulnerabilities catalog
// from an upstream feed document, plus the filtered read view.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::graph::Collection;
use crate::domain::kev::{KevEntry, KevFeed, cap_catalog};
use crate::error::ArgusError;
use crate::ports::document_store::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KevSyncReport {
    /// Entries in the feed before capping.
    pub feed_entries: usize,
    pub imported: usize,
    pub removed: u64,
}

/// Case-insensitive substring filters over the catalog.
#[derive(Debug, Clone, Default)]
pub struct KevFilter {
    pub vendor: Option<String>,
    pub product: Option<String>,
    pub cve_id: Option<String>,
}

impl KevFilter {
    fn matches(&self, entry: &KevEntry) -> bool {
        contains_ci(&entry.vendor_project, self.vendor.as_deref())
            && contains_ci(&entry.product, self.product.as_deref())
            && contains_ci(&entry.cve_id, self.cve_id.as_deref())
    }
}

fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
    }
}

pub struct KevCatalogService {
    documents: Arc<dyn DocumentStore>,
}

impl KevCatalogService {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    /// Replaces the stored catalog with the newest feed entries, capped
    /// and stamped with the import time.
    #[instrument(skip(self, feed), fields(feed.len = feed.vulnerabilities.len()))]
    pub async fn refresh_catalog(&self, feed: KevFeed) -> Result<KevSyncReport, ArgusError> {
        let feed_entries = feed.vulnerabilities.len();
        let capped = cap_catalog(feed.vulnerabilities, Utc::now());

        let mut docs = Vec::with_capacity(capped.len());
        for entry in &capped {
            docs.push(serde_json::to_value(entry)?);
        }

        let removed = self.documents.delete_all(Collection::KevCatalog).await?;
        let imported = docs.len();
        self.documents
            .insert_many(Collection::KevCatalog, docs)
            .await?;

        info!(feed_entries, imported, removed, "KEV catalog refreshed");
        Ok(KevSyncReport {
            feed_entries,
            imported,
            removed,
        })
    }

    /// Catalog entries matching the filter, newest first.
    pub async fn list(&self, filter: &KevFilter) -> Result<Vec<KevEntry>, ArgusError> {
        let docs = self.documents.find_all(Collection::KevCatalog).await?;

        let mut entries: Vec<KevEntry> = Vec::with_capacity(docs.len());
        for doc in docs {
            match serde_json::from_value::<KevEntry>(doc) {
                Ok(entry) if filter.matches(&entry) => entries.push(entry),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Skipping malformed KEV catalog document"),
            }
        }

        entries.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        Ok(entries)
    }
}
