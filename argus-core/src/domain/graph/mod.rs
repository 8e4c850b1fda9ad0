// argus-core/src/domain/graph/mod.rs

pub mod family;

// Re-exports
pub use family::{Collection, EntityFamily};

use crate::domain::canonical::CanonicalValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property map of a node or an edge. Keys are already lowercased by the
/// canonicalizer; BTreeMap keeps the textual form deterministic.
pub type Properties = BTreeMap<String, CanonicalValue>;

/// A labeled node. `properties` always contains an `id` entry unique
/// within the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub label: String,
    pub properties: Properties,
}

impl GraphNode {
    pub fn id(&self) -> Option<&str> {
        self.properties.get("id").and_then(CanonicalValue::as_str)
    }
}

/// A typed edge between two nodes identified by (label, id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub edge_type: String,
    pub source_label: String,
    pub source_id: String,
    pub target_label: String,
    pub target_id: String,
    #[serde(default)]
    pub properties: Properties,
}

/// Per-statement execution counters, mirroring what a graph driver's
/// result summary exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementCounters {
    pub nodes_created: u64,
    pub relationships_created: u64,
    pub properties_set: u64,
}

/// One declarative relationship statement: create (or merge) an edge of
/// `relationship_type` between every source/target node pair whose join
/// properties hold equal values.
///
/// The relationship type is explicit statement metadata, never parsed out
/// of the statement body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipStatement {
    pub relationship_type: String,
    pub source: NodeSelector,
    pub target: NodeSelector,
    /// Existence-checked upsert. When false, repeated builder runs create
    /// duplicate edges.
    #[serde(default)]
    pub merge: bool,
}

/// Selects nodes of `label` and names the property used as join key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSelector {
    pub label: String,
    pub property: String,
}
