// argus-core/src/application/blob_scan.rs
//
// PII scan over an object store: decode each object as text, run the
// pattern registry over the whole blob, persist one scan run document.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::graph::Collection;
use crate::domain::pii::classifier::classify_text;
use crate::domain::pii::patterns::{Criticality, PatternRegistry};
use crate::error::ArgusError;
use crate::ports::blob::BlobSource;
use crate::ports::document_store::DocumentStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectFinding {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<String>,
    pub pii_type: String,
    pub criticality: Criticality,
    pub compliance_standards: Vec<String>,
    /// Distinct matched values in the object.
    pub match_count: usize,
    /// Masked form of the first distinct matches.
    pub masked_samples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlobScanReport {
    pub id: String,
    pub target: String,
    pub timestamp: String,
    /// Distinct object keys actually decoded and classified.
    pub scanned_objects: Vec<String>,
    pub skipped_objects: Vec<String>,
    pub total_findings: usize,
    pub findings: Vec<ObjectFinding>,
}

pub struct BlobScanner {
    documents: Arc<dyn DocumentStore>,
    registry: PatternRegistry,
}

impl BlobScanner {
    pub fn new(documents: Arc<dyn DocumentStore>, registry: PatternRegistry) -> Self {
        Self {
            documents,
            registry,
        }
    }

    /// Scans every object the source lists. Binary or unreadable objects
    /// are logged and skipped; an empty target is an error.
    #[instrument(skip(self, source), fields(target = %source.target()))]
    pub async fn run(&self, source: &dyn BlobSource) -> Result<BlobScanReport, ArgusError> {
        let target = source.target();
        let objects = source.list_objects().await?;
        if objects.is_empty() {
            return Err(ArgusError::Domain(DomainError::EmptyTarget(target)));
        }

        let mut findings = Vec::new();
        let mut skipped = Vec::new();
        let mut scanned = Vec::new();

        for object in &objects {
            let bytes = match source.fetch(&object.key).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(key = %object.key, error = %e, "Object unreadable, skipping");
                    skipped.push(object.key.clone());
                    continue;
                }
            };
            let Some(text) = decode_text(&bytes) else {
                debug!(key = %object.key, "Binary object, skipping");
                skipped.push(object.key.clone());
                continue;
            };
            scanned.push(object.key.clone());

            for finding in classify_text(&self.registry, &text) {
                findings.push(ObjectFinding {
                    key: object.key.clone(),
                    size: object.size,
                    last_modified: object.last_modified.map(|t| t.to_rfc3339()),
                    pii_type: finding.pii_type,
                    criticality: finding.criticality,
                    compliance_standards: finding.compliance_standards,
                    match_count: finding.match_count,
                    masked_samples: finding.masked_samples,
                });
            }
        }

        let report = BlobScanReport {
            id: uuid::Uuid::new_v4().to_string(),
            target,
            timestamp: Utc::now().to_rfc3339(),
            scanned_objects: scanned,
            skipped_objects: skipped,
            total_findings: findings.len(),
            findings,
        };

        self.documents
            .insert_many(
                Collection::BlobScanRuns,
                vec![serde_json::to_value(&report)?],
            )
            .await?;

        info!(
            target = %report.target,
            scanned = report.scanned_objects.len(),
            skipped = report.skipped_objects.len(),
            findings = report.total_findings,
            "Blob scan stored"
        );
        Ok(report)
    }
}

/// Lossy UTF-8 decode, rejecting content that is clearly not text.
/// NUL bytes or a high replacement-character share mark a binary blob.
fn decode_text(bytes: &[u8]) -> Option<String> {
    if bytes.contains(&0) {
        return None;
    }
    let text = String::from_utf8_lossy(bytes);
    let replacements = text.chars().filter(|c| *c == '\u{FFFD}').count();
    if replacements * 10 > text.chars().count().max(1) {
        return None;
    }
    Some(text.into_owned())
}
