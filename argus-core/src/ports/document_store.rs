// argus-core/src/ports/document_store.rs

use crate::domain::graph::Collection;
use crate::error::ArgusError;
use async_trait::async_trait;
use serde_json::Value;

/// Read/write surface over named document collections.
///
/// The concrete store product is not mandated; any backend able to hold
/// schemaless JSON documents per collection can implement this.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Value>, ArgusError>;

    async fn count(&self, collection: Collection) -> Result<u64, ArgusError>;

    /// Distinct string values of a top-level field across the collection.
    /// Documents without the field (or with a non-string value) are ignored.
    async fn distinct(&self, collection: Collection, field: &str) -> Result<Vec<String>, ArgusError>;

    async fn insert_many(&self, collection: Collection, docs: Vec<Value>) -> Result<(), ArgusError>;

    /// Deletes every document of the collection, returning the count removed.
    async fn delete_all(&self, collection: Collection) -> Result<u64, ArgusError>;
}
