// argus-core/src/application/relationships.rs
//
// Executes an ordered batch of declarative relationship statements. One
// failing statement never aborts the batch: its error is recorded and
// execution continues with the next statement.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::graph::{RelationshipStatement, StatementCounters};
use crate::error::ArgusError;
use crate::ports::graph_store::GraphStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementOutcome {
    pub index: usize,
    pub relationship_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counters: Option<StatementCounters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipReport {
    pub total_statements: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub relationships_created: u64,
    pub details: Vec<StatementOutcome>,
}

pub struct RelationshipBuilder {
    graph: Arc<dyn GraphStore>,
}

impl RelationshipBuilder {
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self { graph }
    }

    #[instrument(skip(self, statements), fields(batch.len = statements.len()))]
    pub async fn build(
        &self,
        statements: &[RelationshipStatement],
    ) -> Result<RelationshipReport, ArgusError> {
        let mut session = self.graph.session().await?;

        let mut report = RelationshipReport {
            total_statements: statements.len(),
            succeeded: 0,
            failed: 0,
            relationships_created: 0,
            details: Vec::with_capacity(statements.len()),
        };

        for (index, statement) in statements.iter().enumerate() {
            match session.apply(statement).await {
                Ok(counters) => {
                    report.succeeded += 1;
                    report.relationships_created += counters.relationships_created;
                    report.details.push(StatementOutcome {
                        index,
                        relationship_type: statement.relationship_type.clone(),
                        counters: Some(counters),
                        error: None,
                    });
                }
                Err(e) => {
                    warn!(
                        index,
                        relationship_type = %statement.relationship_type,
                        error = %e,
                        "Statement failed, continuing with the batch"
                    );
                    report.failed += 1;
                    report.details.push(StatementOutcome {
                        index,
                        relationship_type: statement.relationship_type.clone(),
                        counters: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            relationships = report.relationships_created,
            "Relationship batch finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::canonical::CanonicalValue;
    use crate::domain::graph::{GraphNode, NodeSelector, Properties};
    use crate::infrastructure::adapters::memory_graph::MemoryGraphStore;
    use crate::ports::graph_store::GraphSession;

    fn node(label: &str, id: &str, key: &str, value: &str) -> GraphNode {
        let mut props = Properties::new();
        props.insert("id".to_string(), CanonicalValue::from(id));
        props.insert(key.to_string(), CanonicalValue::from(value));
        GraphNode {
            label: label.to_string(),
            properties: props,
        }
    }

    fn statement(rel: &str, source: (&str, &str), target: (&str, &str)) -> RelationshipStatement {
        RelationshipStatement {
            relationship_type: rel.to_string(),
            source: NodeSelector {
                label: source.0.to_string(),
                property: source.1.to_string(),
            },
            target: NodeSelector {
                label: target.0.to_string(),
                property: target.1.to_string(),
            },
            merge: false,
        }
    }

    async fn seeded_graph() -> MemoryGraphStore {
        let graph = MemoryGraphStore::new();
        let mut session = graph.session().await.unwrap();
        session
            .create_node(node("ec2_instance", "i-1", "vpc_id", "vpc-9"))
            .await
            .unwrap();
        session
            .create_node(node("vpc", "vpc-9", "vpc_id", "vpc-9"))
            .await
            .unwrap();
        graph
    }

    #[tokio::test]
    async fn test_batch_continues_past_failing_statement() {
        let graph = seeded_graph().await;
        let batch = vec![
            statement("member_of", ("ec2_instance", "vpc_id"), ("vpc", "vpc_id")),
            // Empty relationship_type is rejected by the session.
            RelationshipStatement {
                relationship_type: String::new(),
                source: NodeSelector {
                    label: "ec2_instance".to_string(),
                    property: "vpc_id".to_string(),
                },
                target: NodeSelector {
                    label: "vpc".to_string(),
                    property: "vpc_id".to_string(),
                },
                merge: false,
            },
            statement("member_of", ("ec2_instance", "vpc_id"), ("vpc", "vpc_id")),
        ];

        let builder = RelationshipBuilder::new(Arc::new(graph.clone()));
        let report = builder.build(&batch).await.unwrap();

        assert_eq!(report.total_statements, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.relationships_created, 2);
        assert!(report.details[1].error.is_some());

        let session = graph.session().await.unwrap();
        assert_eq!(session.count_edges("member_of").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch_reports_zero() {
        let graph = MemoryGraphStore::new();
        let builder = RelationshipBuilder::new(Arc::new(graph));
        let report = builder.build(&[]).await.unwrap();
        assert_eq!(report.total_statements, 0);
        assert_eq!(report.relationships_created, 0);
    }
}
