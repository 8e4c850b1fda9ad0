// argus-core/src/ports/blob.rs

use crate::error::ArgusError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Metadata of one stored object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Object/blob storage backend (bucket, directory, ...).
#[async_trait]
pub trait BlobSource: Send + Sync {
    /// Human-readable identifier of the scanned target (bucket name,
    /// directory path).
    fn target(&self) -> String;

    async fn list_objects(&self) -> Result<Vec<ObjectMeta>, ArgusError>;

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, ArgusError>;
}
