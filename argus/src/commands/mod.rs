// argus/src/commands/mod.rs

pub mod correlate;
pub mod kev_sync;
pub mod project;
pub mod query;
pub mod relate;
pub mod scan_blob;
pub mod scan_db;
pub mod summary;

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use argus_core::infrastructure::adapters::{GraphSnapshot, JsonFileDocumentStore, MemoryGraphStore};
use argus_core::infrastructure::config::{EngineConfig, load_config};
use argus_core::infrastructure::error::InfrastructureError;
use argus_core::infrastructure::fs::atomic_write;
use argus_core::ports::document_store::DocumentStore;
use argus_core::ports::graph_store::GraphStore;

/// Shared wiring for every subcommand: configuration, the document store
/// under the data dir, and the graph snapshot persisted next to it.
pub struct AppContext {
    pub config_dir: PathBuf,
    pub config: EngineConfig,
    documents: Arc<JsonFileDocumentStore>,
    graph: MemoryGraphStore,
    graph_path: PathBuf,
}

impl AppContext {
    pub async fn load(config_dir: &Path) -> anyhow::Result<Self> {
        // A missing argus.yaml is fine: built-in defaults apply.
        let config = match load_config(config_dir) {
            Ok(config) => config,
            Err(InfrastructureError::ConfigNotFound(_)) => EngineConfig::default(),
            Err(e) => return Err(e.into()),
        };

        let data_dir = config_dir.join(&config.data_dir);
        let documents = Arc::new(JsonFileDocumentStore::new(&data_dir)?);

        let graph = MemoryGraphStore::new();
        let graph_path = data_dir.join("graph.json");
        if graph_path.exists() {
            let content = std::fs::read_to_string(&graph_path)
                .with_context(|| format!("Failed to read graph snapshot at {:?}", graph_path))?;
            if !content.trim().is_empty() {
                let snapshot: GraphSnapshot = serde_json::from_str(&content)
                    .with_context(|| format!("Corrupt graph snapshot at {:?}", graph_path))?;
                graph.restore(snapshot).await;
            }
        }

        Ok(Self {
            config_dir: config_dir.to_path_buf(),
            config,
            documents,
            graph,
            graph_path,
        })
    }

    pub fn documents(&self) -> Arc<dyn DocumentStore> {
        self.documents.clone()
    }

    pub fn graph(&self) -> Arc<dyn GraphStore> {
        Arc::new(self.graph.clone())
    }

    /// Persists the graph for the next invocation. Called after every
    /// command that mutates the graph.
    pub async fn save_graph(&self) -> anyhow::Result<()> {
        let snapshot = self.graph.snapshot().await;
        let content = serde_json::to_string_pretty(&snapshot)?;
        atomic_write(&self.graph_path, content)?;
        Ok(())
    }
}
