// argus-core/src/application/projector.rs
//
// Full-replace projection of document collections into the property
// graph. A rebuild deletes every label a family owns, then re-creates
// nodes (and substructure) from the live collection.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::domain::canonical::{CanonicalValue, canonicalize, property_key, sanitize_label};
use crate::domain::error::DomainError;
use crate::domain::graph::{EntityFamily, GraphEdge, GraphNode, Properties};
use crate::error::ArgusError;
use crate::infrastructure::statements::builtin_statements;
use crate::ports::document_store::DocumentStore;
use crate::ports::graph_store::{GraphSession, GraphStore};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ProjectionReport {
    pub family: EntityFamily,
    pub labels_rebuilt: Vec<String>,
    pub nodes_created: u64,
    pub edges_created: u64,
}

/// One rebuild lock per family: delete and reinsert are never interleaved
/// for the same family, while different families rebuild concurrently.
pub struct GraphProjector {
    documents: Arc<dyn DocumentStore>,
    graph: Arc<dyn GraphStore>,
    locks: HashMap<EntityFamily, Mutex<()>>,
}

impl GraphProjector {
    pub fn new(documents: Arc<dyn DocumentStore>, graph: Arc<dyn GraphStore>) -> Self {
        let locks = EntityFamily::ALL
            .into_iter()
            .map(|family| (family, Mutex::new(())))
            .collect();
        Self {
            documents,
            graph,
            locks,
        }
    }

    #[instrument(skip(self))]
    pub async fn rebuild(&self, family: EntityFamily) -> Result<ProjectionReport, ArgusError> {
        let lock = self
            .locks
            .get(&family)
            .ok_or_else(|| ArgusError::InternalError(format!("no rebuild lock for {family}")))?;
        let _guard = lock.lock().await;

        let docs = self.documents.find_all(family.collection()).await?;
        let mut session = self.graph.session().await?;

        let labels = self.labels_for(family).await?;
        for label in &labels {
            let removed = session.delete_label(label).await?;
            if removed > 0 {
                info!(label, removed, "Cleared label before rebuild");
            }
        }

        let mut report = ProjectionReport {
            family,
            labels_rebuilt: labels,
            nodes_created: 0,
            edges_created: 0,
        };

        let projected = match family {
            EntityFamily::CloudAsset => {
                project_cloud_assets(session.as_mut(), &docs, &mut report).await
            }
            EntityFamily::ContainerVulnerability => {
                project_container_scans(session.as_mut(), &docs, &mut report).await
            }
            EntityFamily::KevCatalog => {
                project_kev_catalog(session.as_mut(), &docs, &mut report).await
            }
            EntityFamily::BlobCompliance | EntityFamily::DatabaseCompliance => {
                project_compliance_summary(session.as_mut(), family, &docs, &mut report).await
            }
        };
        if let Err(cause) = projected {
            // The label set was already cleared, so the family sits in a
            // partially rebuilt state until the next rebuild.
            error!(family = %family, %cause, "Rebuild aborted after label deletion");
            return Err(ArgusError::Domain(DomainError::ConsistencyGap {
                family: family.to_string(),
            }));
        }

        info!(
            family = %family,
            nodes = report.nodes_created,
            edges = report.edges_created,
            "Rebuild complete"
        );
        Ok(report)
    }

    /// Rebuilds every family. Independent families run concurrently;
    /// KevCatalog goes last because its exploits edges join against the
    /// vulnerability nodes of the container rebuild.
    pub async fn rebuild_all(&self) -> Result<Vec<ProjectionReport>, ArgusError> {
        let first_wave = EntityFamily::ALL
            .into_iter()
            .filter(|f| *f != EntityFamily::KevCatalog);
        let mut reports: Vec<ProjectionReport> =
            futures::future::join_all(first_wave.map(|family| self.rebuild(family)))
                .await
                .into_iter()
                .collect::<Result<_, _>>()?;
        reports.push(self.rebuild(EntityFamily::KevCatalog).await?);
        Ok(reports)
    }

    /// Labels owned by the family. CloudAsset labels are the distinct
    /// sanitized `resource_type` values currently in the collection, plus
    /// the `unknown` fallback so untyped leftovers are replaced too.
    async fn labels_for(&self, family: EntityFamily) -> Result<Vec<String>, ArgusError> {
        match family {
            EntityFamily::CloudAsset => {
                let mut labels: Vec<String> = self
                    .documents
                    .distinct(family.collection(), "resource_type")
                    .await?
                    .iter()
                    .map(|v| sanitize_label(v))
                    .collect();
                labels.push("unknown".to_string());
                labels.sort();
                labels.dedup();
                Ok(labels)
            }
            _ => Ok(family
                .fixed_labels()
                .iter()
                .map(|l| l.to_string())
                .collect()),
        }
    }
}

/// Canonicalizes a document into graph properties: keys lowercased,
/// values canonicalized, the store's `_id` dropped, an `id` generated
/// when the document has none. A non-string document id is stored in
/// its textual form, since node ids are compared as strings across the
/// session surface. `skip` names document keys projected as
/// substructure instead of properties.
fn prepare_properties(doc: &Map<String, Value>, skip: &[&str]) -> Properties {
    let mut props = Properties::new();
    for (key, value) in doc {
        if key == "_id" || skip.contains(&key.as_str()) {
            continue;
        }
        props.insert(property_key(key), canonicalize(value));
    }
    let id = match props.get("id") {
        Some(CanonicalValue::Str(_)) => None,
        Some(other) => Some(other.to_string()),
        None => Some(uuid::Uuid::new_v4().to_string()),
    };
    if let Some(id) = id {
        props.insert("id".to_string(), CanonicalValue::Str(id));
    }
    props
}

fn as_object(doc: &Value) -> Option<&Map<String, Value>> {
    doc.as_object()
}

async fn project_cloud_assets(
    session: &mut (dyn GraphSession + '_),
    docs: &[Value],
    report: &mut ProjectionReport,
) -> Result<(), ArgusError> {
    for doc in docs {
        let Some(obj) = as_object(doc) else {
            warn!("Skipping non-object cloud asset document");
            continue;
        };
        let label = sanitize_label(obj.get("resource_type").and_then(Value::as_str).unwrap_or(""));
        session
            .create_node(GraphNode {
                label,
                properties: prepare_properties(obj, &[]),
            })
            .await?;
        report.nodes_created += 1;
    }
    Ok(())
}

async fn project_container_scans(
    session: &mut (dyn GraphSession + '_),
    docs: &[Value],
    report: &mut ProjectionReport,
) -> Result<(), ArgusError> {
    for doc in docs {
        let Some(obj) = as_object(doc) else {
            warn!("Skipping non-object container scan document");
            continue;
        };

        let image_props = prepare_properties(obj, &["vulnerabilities"]);
        let Some(image_id) = image_props.get("id").map(ToString::to_string) else {
            continue;
        };
        session
            .create_node(GraphNode {
                label: "dockerimage".to_string(),
                properties: image_props,
            })
            .await?;
        report.nodes_created += 1;

        // Scan documents nest findings two levels deep; a document
        // without that substructure still yields its image node.
        let mut severity_counts: BTreeMap<String, i64> = BTreeMap::new();
        let targets = obj
            .get("vulnerabilities")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for target in targets {
            let findings = target
                .get("Vulnerabilities")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            for finding in findings {
                let Some(finding_obj) = as_object(finding) else {
                    continue;
                };
                let mut props = prepare_properties(finding_obj, &[]);
                props.insert(
                    "image_id".to_string(),
                    CanonicalValue::Str(image_id.clone()),
                );
                if let Some(target_name) = target.get("Target").and_then(Value::as_str) {
                    props.insert("target".to_string(), CanonicalValue::from(target_name));
                }
                let severity = props
                    .get("severity")
                    .and_then(CanonicalValue::as_str)
                    .unwrap_or("unknown")
                    .to_string();
                *severity_counts.entry(severity).or_insert(0) += 1;

                let Some(vuln_id) = props.get("id").map(ToString::to_string) else {
                    continue;
                };
                session
                    .create_node(GraphNode {
                        label: "vulnerability".to_string(),
                        properties: props,
                    })
                    .await?;
                report.nodes_created += 1;

                session
                    .create_edge(GraphEdge {
                        edge_type: "has_vulnerability".to_string(),
                        source_label: "dockerimage".to_string(),
                        source_id: image_id.clone(),
                        target_label: "vulnerability".to_string(),
                        target_id: vuln_id,
                        properties: Properties::new(),
                    })
                    .await?;
                report.edges_created += 1;
            }
        }

        // Severity counters written back onto the image node.
        let mut counters = Properties::new();
        for severity in ["critical", "high", "medium", "low", "unknown"] {
            counters.insert(
                format!("{severity}_count"),
                CanonicalValue::Int(*severity_counts.get(severity).unwrap_or(&0)),
            );
        }
        counters.insert(
            "total_vulnerabilities".to_string(),
            CanonicalValue::Int(severity_counts.values().sum()),
        );
        session
            .set_node_properties("dockerimage", &image_id, counters)
            .await?;
    }
    Ok(())
}

async fn project_kev_catalog(
    session: &mut (dyn GraphSession + '_),
    docs: &[Value],
    report: &mut ProjectionReport,
) -> Result<(), ArgusError> {
    for doc in docs {
        let Some(obj) = as_object(doc) else {
            warn!("Skipping non-object KEV catalog document");
            continue;
        };
        let mut props = prepare_properties(obj, &[]);
        // The CVE identifier doubles as node id when present.
        if let Some(cve) = props.get("cveid").and_then(CanonicalValue::as_str) {
            let cve = cve.to_string();
            props.insert("id".to_string(), CanonicalValue::Str(cve));
        }
        session
            .create_node(GraphNode {
                label: "knownexploitedvulnerability".to_string(),
                properties: props,
            })
            .await?;
        report.nodes_created += 1;
    }

    // Link catalog entries to container findings sharing the identifier.
    for statement in builtin_statements() {
        let counters = session.apply(&statement).await?;
        report.edges_created += counters.relationships_created;
    }
    Ok(())
}

async fn project_compliance_summary(
    session: &mut (dyn GraphSession + '_),
    family: EntityFamily,
    docs: &[Value],
    report: &mut ProjectionReport,
) -> Result<(), ArgusError> {
    let label = family
        .fixed_labels()
        .first()
        .copied()
        .unwrap_or("unknown")
        .to_string();

    let mut criticality_counts: BTreeMap<String, i64> = BTreeMap::new();
    let mut standards: Vec<String> = Vec::new();
    let mut targets: Vec<String> = Vec::new();
    let mut all_findings: Vec<Value> = Vec::new();
    let mut total_findings: i64 = 0;

    for doc in docs {
        let Some(obj) = as_object(doc) else { continue };
        if let Some(target) = obj.get("target").and_then(Value::as_str) {
            let target = target.to_lowercase();
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        let findings = obj
            .get("findings")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for finding in findings {
            total_findings += 1;
            all_findings.push(finding.clone());
            let criticality = finding
                .get("criticality")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_lowercase();
            *criticality_counts.entry(criticality).or_insert(0) += 1;
            for std_name in finding
                .get("compliance_standards")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[])
            {
                if let Some(name) = std_name.as_str() {
                    let name = name.to_lowercase();
                    if !standards.contains(&name) {
                        standards.push(name);
                    }
                }
            }
        }
    }
    standards.sort();
    targets.sort();

    let mut props = Properties::new();
    props.insert("id".to_string(), CanonicalValue::Str(label.clone()));
    props.insert("scan_runs".to_string(), CanonicalValue::Int(docs.len() as i64));
    props.insert(
        "total_findings".to_string(),
        CanonicalValue::Int(total_findings),
    );
    for (criticality, count) in &criticality_counts {
        props.insert(
            format!("{criticality}_count"),
            CanonicalValue::Int(*count),
        );
    }
    props.insert(
        "compliance_standards".to_string(),
        canonicalize(&Value::from(standards)),
    );
    props.insert("targets".to_string(), canonicalize(&Value::from(targets)));
    // Findings already carry masked samples only; safe to flatten whole.
    props.insert(
        "findings".to_string(),
        canonicalize(&Value::Array(all_findings)),
    );

    session
        .create_node(GraphNode {
            label,
            properties: props,
        })
        .await?;
    report.nodes_created += 1;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::graph::Collection;
    use crate::infrastructure::adapters::memory_document::MemoryDocumentStore;
    use crate::infrastructure::adapters::memory_graph::MemoryGraphStore;
    use serde_json::json;

    fn projector(docs: &MemoryDocumentStore, graph: &MemoryGraphStore) -> GraphProjector {
        GraphProjector::new(Arc::new(docs.clone()), Arc::new(graph.clone()))
    }

    #[tokio::test]
    async fn test_cloud_asset_rebuild_is_full_replace() {
        let docs = MemoryDocumentStore::new();
        let graph = MemoryGraphStore::new();
        docs.seed(
            Collection::CloudAssets,
            vec![
                json!({"resource_type": "EC2-Instance", "InstanceId": "i-1"}),
                json!({"resource_type": "EC2-Instance", "InstanceId": "i-2"}),
                json!({"name": "untyped"}),
            ],
        )
        .await;

        let projector = projector(&docs, &graph);
        let first = projector.rebuild(EntityFamily::CloudAsset).await.unwrap();
        assert_eq!(first.nodes_created, 3);

        // Second run replaces rather than accumulates.
        let second = projector.rebuild(EntityFamily::CloudAsset).await.unwrap();
        assert_eq!(second.nodes_created, 3);

        let session = graph.session().await.unwrap();
        assert_eq!(session.count_nodes("ec2_instance").await.unwrap(), 2);
        assert_eq!(session.count_nodes("unknown").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_container_substructure_and_counters() {
        let docs = MemoryDocumentStore::new();
        let graph = MemoryGraphStore::new();
        docs.seed(
            Collection::ContainerVulnerabilities,
            vec![json!({
                "id": "img-1",
                "artifact_name": "registry/app:1.0",
                "vulnerabilities": [{
                    "Target": "app (alpine 3.19)",
                    "Vulnerabilities": [
                        {"VulnerabilityID": "CVE-2025-0001", "Severity": "HIGH"},
                        {"VulnerabilityID": "CVE-2025-0002", "Severity": "HIGH"},
                        {"VulnerabilityID": "CVE-2025-0003", "Severity": "LOW"}
                    ]
                }]
            })],
        )
        .await;

        let report = projector(&docs, &graph)
            .rebuild(EntityFamily::ContainerVulnerability)
            .await
            .unwrap();
        assert_eq!(report.nodes_created, 4);
        assert_eq!(report.edges_created, 3);

        let session = graph.session().await.unwrap();
        assert_eq!(session.count_edges("has_vulnerability").await.unwrap(), 3);
        let images = session.nodes_with_label("dockerimage").await.unwrap();
        let image = &images[0];
        assert_eq!(image.properties.get("high_count").unwrap().as_i64(), Some(2));
        assert_eq!(image.properties.get("low_count").unwrap().as_i64(), Some(1));
        assert_eq!(
            image.properties.get("total_vulnerabilities").unwrap().as_i64(),
            Some(3)
        );
    }

    #[tokio::test]
    async fn test_document_without_substructure_gets_zero_counters() {
        let docs = MemoryDocumentStore::new();
        let graph = MemoryGraphStore::new();
        docs.seed(
            Collection::ContainerVulnerabilities,
            vec![json!({"id": "img-solo", "artifact_name": "registry/solo:1"})],
        )
        .await;

        let report = projector(&docs, &graph)
            .rebuild(EntityFamily::ContainerVulnerability)
            .await
            .unwrap();
        assert_eq!(report.nodes_created, 1);
        assert_eq!(report.edges_created, 0);

        let session = graph.session().await.unwrap();
        let image = &session.nodes_with_label("dockerimage").await.unwrap()[0];
        assert_eq!(
            image.properties.get("total_vulnerabilities").unwrap().as_i64(),
            Some(0)
        );
    }

    #[tokio::test]
    async fn test_kev_rebuild_links_exploits() {
        let docs = MemoryDocumentStore::new();
        let graph = MemoryGraphStore::new();
        docs.seed(
            Collection::ContainerVulnerabilities,
            vec![json!({
                "id": "img-1",
                "vulnerabilities": [{
                    "Target": "app",
                    "Vulnerabilities": [
                        {"VulnerabilityID": "CVE-2025-30154", "Severity": "CRITICAL"}
                    ]
                }]
            })],
        )
        .await;
        docs.seed(
            Collection::KevCatalog,
            vec![json!({"cveID": "CVE-2025-30154", "vendorProject": "reviewdog"})],
        )
        .await;

        let projector = projector(&docs, &graph);
        projector
            .rebuild(EntityFamily::ContainerVulnerability)
            .await
            .unwrap();
        let report = projector.rebuild(EntityFamily::KevCatalog).await.unwrap();
        assert_eq!(report.nodes_created, 1);
        assert_eq!(report.edges_created, 1);

        let session = graph.session().await.unwrap();
        assert_eq!(session.count_edges("exploits").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_compliance_summary_node() {
        let docs = MemoryDocumentStore::new();
        let graph = MemoryGraphStore::new();
        docs.seed(
            Collection::BlobScanRuns,
            vec![json!({
                "id": "run-1",
                "target": "exports-bucket",
                "findings": [
                    {"criticality": "critical", "compliance_standards": ["GDPR", "PCI DSS"]},
                    {"criticality": "medium", "compliance_standards": ["GDPR"]}
                ]
            })],
        )
        .await;

        let report = projector(&docs, &graph)
            .rebuild(EntityFamily::BlobCompliance)
            .await
            .unwrap();
        assert_eq!(report.nodes_created, 1);

        let session = graph.session().await.unwrap();
        let node = &session
            .nodes_with_label("blobcompliancesummary")
            .await
            .unwrap()[0];
        assert_eq!(node.properties.get("total_findings").unwrap().as_i64(), Some(2));
        assert_eq!(node.properties.get("critical_count").unwrap().as_i64(), Some(1));
        let standards = node
            .properties
            .get("compliance_standards")
            .unwrap()
            .as_str()
            .unwrap();
        assert!(standards.contains("gdpr"));
        assert!(standards.contains("pci dss"));
        let findings = node.properties.get("findings").unwrap().as_str().unwrap();
        assert!(findings.contains("\"criticality\":\"critical\""));
    }

    #[tokio::test]
    async fn test_numeric_document_id_projected_as_text() {
        let docs = MemoryDocumentStore::new();
        let graph = MemoryGraphStore::new();
        docs.seed(
            Collection::ContainerVulnerabilities,
            vec![json!({"id": 77, "artifact_name": "registry/app:1.0"})],
        )
        .await;

        let report = projector(&docs, &graph)
            .rebuild(EntityFamily::ContainerVulnerability)
            .await
            .unwrap();
        assert_eq!(report.nodes_created, 1);

        let session = graph.session().await.unwrap();
        let image = &session.nodes_with_label("dockerimage").await.unwrap()[0];
        assert_eq!(image.id(), Some("77"));
        // The counter write-back resolves the node through the same
        // textual id.
        assert_eq!(
            image.properties.get("total_vulnerabilities").unwrap().as_i64(),
            Some(0)
        );
    }

    /// Session double whose node inserts fail after the delete phase
    /// succeeded.
    struct FlakyGraph {
        inner: MemoryGraphStore,
    }

    #[async_trait::async_trait]
    impl GraphStore for FlakyGraph {
        async fn session(&self) -> Result<Box<dyn GraphSession>, ArgusError> {
            Ok(Box::new(FlakySession {
                inner: self.inner.session().await?,
            }))
        }
    }

    struct FlakySession {
        inner: Box<dyn GraphSession>,
    }

    #[async_trait::async_trait]
    impl GraphSession for FlakySession {
        async fn delete_label(&mut self, label: &str) -> Result<u64, ArgusError> {
            self.inner.delete_label(label).await
        }

        async fn create_node(&mut self, _node: GraphNode) -> Result<(), ArgusError> {
            Err(ArgusError::InternalError("node store offline".to_string()))
        }

        async fn create_edge(&mut self, edge: GraphEdge) -> Result<(), ArgusError> {
            self.inner.create_edge(edge).await
        }

        async fn merge_edge(&mut self, edge: GraphEdge) -> Result<bool, ArgusError> {
            self.inner.merge_edge(edge).await
        }

        async fn set_node_properties(
            &mut self,
            label: &str,
            id: &str,
            properties: Properties,
        ) -> Result<(), ArgusError> {
            self.inner.set_node_properties(label, id, properties).await
        }

        async fn apply(
            &mut self,
            statement: &crate::domain::graph::RelationshipStatement,
        ) -> Result<crate::domain::graph::StatementCounters, ArgusError> {
            self.inner.apply(statement).await
        }

        async fn count_nodes(&self, label: &str) -> Result<u64, ArgusError> {
            self.inner.count_nodes(label).await
        }

        async fn count_edges(&self, edge_type: &str) -> Result<u64, ArgusError> {
            self.inner.count_edges(edge_type).await
        }

        async fn nodes_with_label(&self, label: &str) -> Result<Vec<GraphNode>, ArgusError> {
            self.inner.nodes_with_label(label).await
        }

        async fn labels(&self) -> Result<Vec<String>, ArgusError> {
            self.inner.labels().await
        }

        async fn edge_types(&self) -> Result<Vec<String>, ArgusError> {
            self.inner.edge_types().await
        }
    }

    #[tokio::test]
    async fn test_failed_reinsert_surfaces_consistency_gap() {
        let docs = MemoryDocumentStore::new();
        docs.seed(
            Collection::CloudAssets,
            vec![json!({"resource_type": "ec2", "instance_id": "i-1"})],
        )
        .await;
        let graph = FlakyGraph {
            inner: MemoryGraphStore::new(),
        };

        let projector = GraphProjector::new(Arc::new(docs), Arc::new(graph));
        let err = projector
            .rebuild(EntityFamily::CloudAsset)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ArgusError::Domain(DomainError::ConsistencyGap { .. })
        ));
    }
}
