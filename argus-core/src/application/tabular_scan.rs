// argus-core/src/application/tabular_scan.rs
//
// PII scan over a tabular source: sample every reachable table, run the
// pattern registry per column, persist one scan run document.

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::graph::Collection;
use crate::domain::pii::classifier::{SAMPLE_ROW_REFS, classify_columns};
use crate::domain::pii::patterns::{Criticality, PatternRegistry};
use crate::error::ArgusError;
use crate::ports::document_store::DocumentStore;
use crate::ports::tabular::TabularSource;

/// Rows sampled per table.
pub const SAMPLE_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableFinding {
    pub database: String,
    pub table: String,
    pub column: String,
    pub pii_type: String,
    pub criticality: Criticality,
    pub compliance_standards: Vec<String>,
    /// Matching rows within the sample.
    pub row_count: usize,
    /// 1-based numbers of the first matching rows.
    pub sample_row_numbers: Vec<usize>,
    /// Full row context of the first matches, masked.
    pub sample_rows: Vec<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularScanReport {
    pub id: String,
    pub target: String,
    pub timestamp: String,
    /// Distinct `database.table` locations actually sampled.
    pub scanned_tables: Vec<String>,
    pub skipped_tables: Vec<String>,
    pub total_findings: usize,
    pub findings: Vec<TableFinding>,
}

pub struct TabularScanner {
    documents: Arc<dyn DocumentStore>,
    registry: PatternRegistry,
}

impl TabularScanner {
    pub fn new(documents: Arc<dyn DocumentStore>, registry: PatternRegistry) -> Self {
        Self {
            documents,
            registry,
        }
    }

    /// Scans every table the source exposes. An unreadable table is
    /// logged and skipped; an empty source is an error because a scan
    /// run over nothing would report a misleading clean result.
    #[instrument(skip(self, source))]
    pub async fn run(
        &self,
        source: &dyn TabularSource,
        target: &str,
    ) -> Result<TabularScanReport, ArgusError> {
        let tables = source.list_tables().await?;
        if tables.is_empty() {
            return Err(ArgusError::Domain(DomainError::EmptyTarget(
                target.to_string(),
            )));
        }

        let mut findings = Vec::new();
        let mut skipped = Vec::new();
        let mut scanned = Vec::new();

        for table in &tables {
            let sample = match source.sample_rows(table, SAMPLE_LIMIT).await {
                Ok(sample) => sample,
                Err(e) => {
                    warn!(table = %table, error = %e, "Table unreadable, skipping");
                    skipped.push(table.to_string());
                    continue;
                }
            };
            scanned.push(table.to_string());

            for finding in classify_columns(&self.registry, &sample.columns, &sample.rows) {
                findings.push(TableFinding {
                    database: table.database.clone(),
                    table: table.table.clone(),
                    column: finding.column,
                    pii_type: finding.pii_type,
                    criticality: finding.criticality,
                    compliance_standards: finding.compliance_standards,
                    row_count: finding.row_numbers.len(),
                    sample_row_numbers: finding
                        .row_numbers
                        .into_iter()
                        .take(SAMPLE_ROW_REFS)
                        .collect(),
                    sample_rows: finding.sample_rows,
                });
            }
        }

        let report = TabularScanReport {
            id: uuid::Uuid::new_v4().to_string(),
            target: target.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            scanned_tables: scanned,
            skipped_tables: skipped,
            total_findings: findings.len(),
            findings,
        };

        self.documents
            .insert_many(
                Collection::TabularScanRuns,
                vec![serde_json::to_value(&report)?],
            )
            .await?;

        info!(
            target,
            scanned = report.scanned_tables.len(),
            skipped = report.skipped_tables.len(),
            findings = report.total_findings,
            "Tabular scan stored"
        );
        Ok(report)
    }
}
