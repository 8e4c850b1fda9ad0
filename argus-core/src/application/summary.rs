// argus-core/src/application/summary.rs
//
// Read-only views over the projected graph, served entirely through the
// graph port's read surface.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::canonical::CanonicalValue;
use crate::error::ArgusError;
use crate::ports::graph_store::GraphStore;

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct GraphSummary {
    /// Node count per label.
    pub nodes: BTreeMap<String, u64>,
    /// Relationship count per type.
    pub edges: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageVulnerabilityTotal {
    pub image_id: String,
    pub image_name: String,
    pub total: u64,
    pub severity_counts: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct VulnerabilitySummary {
    /// Severity histogram across every vulnerability node.
    pub severity_counts: BTreeMap<String, u64>,
    pub images: Vec<ImageVulnerabilityTotal>,
}

pub struct SummaryService {
    graph: Arc<dyn GraphStore>,
}

impl SummaryService {
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self { graph }
    }

    pub async fn graph_summary(&self) -> Result<GraphSummary, ArgusError> {
        let session = self.graph.session().await?;

        let mut summary = GraphSummary::default();
        for label in session.labels().await? {
            let count = session.count_nodes(&label).await?;
            summary.nodes.insert(label, count);
        }
        for edge_type in session.edge_types().await? {
            let count = session.count_edges(&edge_type).await?;
            summary.edges.insert(edge_type, count);
        }
        Ok(summary)
    }

    pub async fn vulnerability_summary(&self) -> Result<VulnerabilitySummary, ArgusError> {
        let session = self.graph.session().await?;

        let mut summary = VulnerabilitySummary::default();
        let mut per_image: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();

        for node in session.nodes_with_label("vulnerability").await? {
            let severity = node
                .properties
                .get("severity")
                .and_then(CanonicalValue::as_str)
                .unwrap_or("unknown")
                .to_string();
            *summary.severity_counts.entry(severity.clone()).or_insert(0) += 1;

            if let Some(image_id) = node
                .properties
                .get("image_id")
                .and_then(CanonicalValue::as_str)
            {
                *per_image
                    .entry(image_id.to_string())
                    .or_default()
                    .entry(severity)
                    .or_insert(0) += 1;
            }
        }

        // Resolve display names from the image nodes.
        let mut names: BTreeMap<String, String> = BTreeMap::new();
        for image in session.nodes_with_label("dockerimage").await? {
            if let Some(id) = image.id() {
                let name = image
                    .properties
                    .get("artifact_name")
                    .and_then(CanonicalValue::as_str)
                    .unwrap_or(id)
                    .to_string();
                names.insert(id.to_string(), name);
            }
        }

        for (image_id, severity_counts) in per_image {
            let image_name = names.get(&image_id).cloned().unwrap_or_else(|| image_id.clone());
            summary.images.push(ImageVulnerabilityTotal {
                total: severity_counts.values().sum(),
                image_id,
                image_name,
                severity_counts,
            });
        }
        summary.images.sort_by(|a, b| b.total.cmp(&a.total));
        Ok(summary)
    }
}
