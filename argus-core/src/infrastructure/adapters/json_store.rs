// argus-core/src/infrastructure/adapters/json_store.rs

use crate::domain::graph::Collection;
use crate::error::ArgusError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::document_store::DocumentStore;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Document store persisting each collection as one JSON array file under
/// a data directory. Suited to the bounded document volumes this engine
/// handles (hundreds to low thousands per collection).
pub struct JsonFileDocumentStore {
    data_dir: PathBuf,
    // Serializes read-modify-write cycles on the collection files.
    write_lock: Mutex<()>,
}

impl JsonFileDocumentStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, ArgusError> {
        let data_dir = data_dir.into();
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir).map_err(InfrastructureError::Io)?;
        }
        Ok(Self {
            data_dir,
            write_lock: Mutex::new(()),
        })
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection.as_str()))
    }

    fn load(&self, path: &Path) -> Result<Vec<Value>, ArgusError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(path).map_err(InfrastructureError::Io)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let docs: Vec<Value> = serde_json::from_str(&content).map_err(InfrastructureError::Json)?;
        Ok(docs)
    }

    fn save(&self, path: &Path, docs: &[Value]) -> Result<(), ArgusError> {
        let content = serde_json::to_string_pretty(docs).map_err(InfrastructureError::Json)?;
        atomic_write(path, content)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Value>, ArgusError> {
        self.load(&self.collection_path(collection))
    }

    async fn count(&self, collection: Collection) -> Result<u64, ArgusError> {
        Ok(self.load(&self.collection_path(collection))?.len() as u64)
    }

    async fn distinct(&self, collection: Collection, field: &str) -> Result<Vec<String>, ArgusError> {
        let docs = self.load(&self.collection_path(collection))?;
        let mut values: Vec<String> = Vec::new();
        for doc in &docs {
            if let Some(v) = doc.get(field).and_then(|v| v.as_str())
                && !values.iter().any(|existing| existing == v)
            {
                values.push(v.to_string());
            }
        }
        Ok(values)
    }

    async fn insert_many(&self, collection: Collection, docs: Vec<Value>) -> Result<(), ArgusError> {
        let _guard = self.write_lock.lock().await;
        let path = self.collection_path(collection);
        let mut existing = self.load(&path)?;
        existing.extend(docs);
        self.save(&path, &existing)
    }

    async fn delete_all(&self, collection: Collection) -> Result<u64, ArgusError> {
        let _guard = self.write_lock.lock().await;
        let path = self.collection_path(collection);
        let removed = self.load(&path)?.len() as u64;
        self.save(&path, &[])?;
        Ok(removed)
    }
}
