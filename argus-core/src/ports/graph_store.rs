// argus-core/src/ports/graph_store.rs

use crate::domain::graph::{
    GraphEdge, GraphNode, Properties, RelationshipStatement, StatementCounters,
};
use crate::error::ArgusError;
use async_trait::async_trait;

/// Property-graph backend. The product is not mandated; the operations
/// below are the full surface the core requires.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Opens a session scoped to one operation. Dropping the session
    /// releases it; callers must not cache sessions across operations.
    async fn session(&self) -> Result<Box<dyn GraphSession>, ArgusError>;
}

#[async_trait]
pub trait GraphSession: Send + Sync {
    /// Deletes every node carrying `label` together with its incident
    /// relationships, returning the node count removed.
    async fn delete_label(&mut self, label: &str) -> Result<u64, ArgusError>;

    async fn create_node(&mut self, node: GraphNode) -> Result<(), ArgusError>;

    async fn create_edge(&mut self, edge: GraphEdge) -> Result<(), ArgusError>;

    /// Creates the edge unless one with the same type and endpoints
    /// already exists. Returns true when an edge was created.
    async fn merge_edge(&mut self, edge: GraphEdge) -> Result<bool, ArgusError>;

    /// Overwrites the given properties on an existing node, leaving the
    /// rest untouched.
    async fn set_node_properties(
        &mut self,
        label: &str,
        id: &str,
        properties: Properties,
    ) -> Result<(), ArgusError>;

    /// Executes one declarative relationship statement and returns the
    /// driver counters for it.
    async fn apply(
        &mut self,
        statement: &RelationshipStatement,
    ) -> Result<StatementCounters, ArgusError>;

    // --- Read surface ---

    async fn count_nodes(&self, label: &str) -> Result<u64, ArgusError>;

    async fn count_edges(&self, edge_type: &str) -> Result<u64, ArgusError>;

    async fn nodes_with_label(&self, label: &str) -> Result<Vec<GraphNode>, ArgusError>;

    async fn labels(&self) -> Result<Vec<String>, ArgusError>;

    async fn edge_types(&self) -> Result<Vec<String>, ArgusError>;
}
