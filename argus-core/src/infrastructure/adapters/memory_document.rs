// argus-core/src/infrastructure/adapters/memory_document.rs

use crate::domain::graph::Collection;
use crate::error::ArgusError;
use crate::ports::document_store::DocumentStore;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory document store: the default for self-contained runs and the
/// test double for everything touching collections. Clones share state.
#[derive(Default, Clone)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Value>>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a collection, replacing any existing content.
    pub async fn seed(&self, collection: Collection, docs: Vec<Value>) {
        self.collections.write().await.insert(collection, docs);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Value>, ArgusError> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).cloned().unwrap_or_default())
    }

    async fn count(&self, collection: Collection) -> Result<u64, ArgusError> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn distinct(&self, collection: Collection, field: &str) -> Result<Vec<String>, ArgusError> {
        let guard = self.collections.read().await;
        let mut values = Vec::new();
        if let Some(docs) = guard.get(&collection) {
            for doc in docs {
                if let Some(v) = doc.get(field).and_then(|v| v.as_str())
                    && !values.iter().any(|existing: &String| existing == v)
                {
                    values.push(v.to_string());
                }
            }
        }
        Ok(values)
    }

    async fn insert_many(&self, collection: Collection, docs: Vec<Value>) -> Result<(), ArgusError> {
        let mut guard = self.collections.write().await;
        guard.entry(collection).or_default().extend(docs);
        Ok(())
    }

    async fn delete_all(&self, collection: Collection) -> Result<u64, ArgusError> {
        let mut guard = self.collections.write().await;
        Ok(guard.remove(&collection).map_or(0, |docs| docs.len() as u64))
    }
}
