// argus-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod fs_blob;
pub mod json_store;
pub mod memory_document;
pub mod memory_graph;

pub use duckdb::DuckDbSource;
pub use fs_blob::DirBlobSource;
pub use json_store::JsonFileDocumentStore;
pub use memory_document::MemoryDocumentStore;
pub use memory_graph::{GraphSnapshot, MemoryGraphStore};
