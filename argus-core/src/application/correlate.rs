// argus-core/src/application/correlate.rs
//
// Derives the KEV/container correlation view from the live collections.
// Results are computed per request and never persisted.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::correlation::{CorrelationResult, correlate};
use crate::domain::graph::Collection;
use crate::domain::kev::KevEntry;
use crate::error::ArgusError;
use crate::ports::document_store::DocumentStore;

pub struct CorrelationService {
    documents: Arc<dyn DocumentStore>,
}

impl CorrelationService {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<CorrelationResult, ArgusError> {
        let kev_docs = self.documents.find_all(Collection::KevCatalog).await?;
        let docker_docs = self
            .documents
            .find_all(Collection::ContainerVulnerabilities)
            .await?;

        let mut kev_entries: Vec<KevEntry> = Vec::with_capacity(kev_docs.len());
        for doc in kev_docs {
            match serde_json::from_value(doc) {
                Ok(entry) => kev_entries.push(entry),
                Err(e) => warn!(error = %e, "Skipping malformed KEV catalog document"),
            }
        }

        let result = correlate(&kev_entries, &docker_docs);
        info!(
            kev = result.summary.total_kev_vulnerabilities,
            matched = result.summary.total_matched_in_docker,
            images = result.summary.affected_images,
            "Correlation computed"
        );
        Ok(result)
    }
}
