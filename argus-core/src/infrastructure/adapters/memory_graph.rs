// argus-core/src/infrastructure/adapters/memory_graph.rs

use crate::domain::canonical::CanonicalValue;
use crate::domain::error::DomainError;
use crate::domain::graph::{
    GraphEdge, GraphNode, Properties, RelationshipStatement, StatementCounters,
};
use crate::error::ArgusError;
use crate::ports::graph_store::{GraphSession, GraphStore};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct GraphState {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

/// In-process property graph. Covers the full session surface including
/// declarative statement application, which makes it both the test double
/// and the default backend for self-contained runs.
#[derive(Default, Clone)]
pub struct MemoryGraphStore {
    state: Arc<RwLock<GraphState>>,
}

/// Serializable image of the whole graph, used by callers that persist
/// the in-process store between runs.
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> GraphSnapshot {
        let state = self.state.read().await;
        GraphSnapshot {
            nodes: state.nodes.clone(),
            edges: state.edges.clone(),
        }
    }

    pub async fn restore(&self, snapshot: GraphSnapshot) {
        let mut state = self.state.write().await;
        state.nodes = snapshot.nodes;
        state.edges = snapshot.edges;
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn session(&self) -> Result<Box<dyn GraphSession>, ArgusError> {
        Ok(Box::new(MemorySession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MemorySession {
    state: Arc<RwLock<GraphState>>,
}

#[async_trait]
impl GraphSession for MemorySession {
    async fn delete_label(&mut self, label: &str) -> Result<u64, ArgusError> {
        let mut state = self.state.write().await;
        let before = state.nodes.len();
        state.nodes.retain(|n| n.label != label);
        let removed = (before - state.nodes.len()) as u64;
        // Detach: incident relationships go with the nodes.
        state
            .edges
            .retain(|e| e.source_label != label && e.target_label != label);
        Ok(removed)
    }

    async fn create_node(&mut self, node: GraphNode) -> Result<(), ArgusError> {
        let mut state = self.state.write().await;
        state.nodes.push(node);
        Ok(())
    }

    async fn create_edge(&mut self, edge: GraphEdge) -> Result<(), ArgusError> {
        let mut state = self.state.write().await;
        state.edges.push(edge);
        Ok(())
    }

    async fn merge_edge(&mut self, edge: GraphEdge) -> Result<bool, ArgusError> {
        let mut state = self.state.write().await;
        if state.edges.iter().any(|e| same_endpoints(e, &edge)) {
            return Ok(false);
        }
        state.edges.push(edge);
        Ok(true)
    }

    async fn set_node_properties(
        &mut self,
        label: &str,
        id: &str,
        properties: Properties,
    ) -> Result<(), ArgusError> {
        let mut state = self.state.write().await;
        for node in state
            .nodes
            .iter_mut()
            .filter(|n| n.label == label && n.id() == Some(id))
        {
            for (key, value) in &properties {
                node.properties.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn apply(
        &mut self,
        statement: &RelationshipStatement,
    ) -> Result<StatementCounters, ArgusError> {
        if statement.relationship_type.trim().is_empty() {
            return Err(ArgusError::Domain(DomainError::MalformedInput(
                "relationship statement without a relationship_type".to_string(),
            )));
        }
        // (join value, node id) pairs on each side of the statement.
        let (sources, targets) = {
            let state = self.state.read().await;
            (
                join_keys(&state.nodes, &statement.source.label, &statement.source.property),
                join_keys(&state.nodes, &statement.target.label, &statement.target.property),
            )
        };

        let mut counters = StatementCounters::default();
        for (source_value, source_id) in &sources {
            for (target_value, target_id) in &targets {
                if source_value != target_value {
                    continue;
                }
                let edge = GraphEdge {
                    edge_type: statement.relationship_type.clone(),
                    source_label: statement.source.label.clone(),
                    source_id: source_id.clone(),
                    target_label: statement.target.label.clone(),
                    target_id: target_id.clone(),
                    properties: Properties::new(),
                };
                let created = if statement.merge {
                    self.merge_edge(edge).await?
                } else {
                    self.create_edge(edge).await?;
                    true
                };
                if created {
                    counters.relationships_created += 1;
                }
            }
        }

        Ok(counters)
    }

    async fn count_nodes(&self, label: &str) -> Result<u64, ArgusError> {
        let state = self.state.read().await;
        Ok(state.nodes.iter().filter(|n| n.label == label).count() as u64)
    }

    async fn count_edges(&self, edge_type: &str) -> Result<u64, ArgusError> {
        let state = self.state.read().await;
        Ok(state.edges.iter().filter(|e| e.edge_type == edge_type).count() as u64)
    }

    async fn nodes_with_label(&self, label: &str) -> Result<Vec<GraphNode>, ArgusError> {
        let state = self.state.read().await;
        Ok(state
            .nodes
            .iter()
            .filter(|n| n.label == label)
            .cloned()
            .collect())
    }

    async fn labels(&self) -> Result<Vec<String>, ArgusError> {
        let state = self.state.read().await;
        let mut labels: Vec<String> = Vec::new();
        for node in &state.nodes {
            if !labels.contains(&node.label) {
                labels.push(node.label.clone());
            }
        }
        Ok(labels)
    }

    async fn edge_types(&self) -> Result<Vec<String>, ArgusError> {
        let state = self.state.read().await;
        let mut types: Vec<String> = Vec::new();
        for edge in &state.edges {
            if !types.contains(&edge.edge_type) {
                types.push(edge.edge_type.clone());
            }
        }
        Ok(types)
    }
}

fn same_endpoints(a: &GraphEdge, b: &GraphEdge) -> bool {
    a.edge_type == b.edge_type
        && a.source_label == b.source_label
        && a.source_id == b.source_id
        && a.target_label == b.target_label
        && a.target_id == b.target_id
}

fn join_keys(nodes: &[GraphNode], label: &str, property: &str) -> Vec<(String, String)> {
    nodes
        .iter()
        .filter(|n| n.label == label)
        .filter_map(|n| {
            let value = match n.properties.get(property)? {
                CanonicalValue::Str(s) => s.clone(),
                other => other.to_string(),
            };
            Some((value, n.id()?.to_string()))
        })
        .collect()
}
