// argus-core/src/infrastructure/adapters/fs_blob.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::error::DomainError;
use crate::error::ArgusError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::blob::{BlobSource, ObjectMeta};

/// Blob adapter over a local directory. Object keys are the paths of
/// regular files relative to the root, with `/` separators.
pub struct DirBlobSource {
    root: PathBuf,
}

impl DirBlobSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, ArgusError> {
        // Keys come from list_objects; reject anything trying to climb out.
        if Path::new(key)
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(ArgusError::Domain(DomainError::MalformedInput(format!(
                "invalid object key: {key}"
            ))));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobSource for DirBlobSource {
    fn target(&self) -> String {
        self.root.display().to_string()
    }

    async fn list_objects(&self) -> Result<Vec<ObjectMeta>, ArgusError> {
        if !self.root.is_dir() {
            return Err(ArgusError::Infrastructure(
                InfrastructureError::StoreUnavailable {
                    store: "blob".to_string(),
                    reason: format!("not a directory: {}", self.root.display()),
                },
            ));
        }

        let mut objects = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(|e| {
                ArgusError::Infrastructure(InfrastructureError::Io(std::io::Error::other(e)))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| ArgusError::InternalError(e.to_string()))?;
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let metadata = entry
                .metadata()
                .map_err(|e| ArgusError::Infrastructure(InfrastructureError::Io(e.into())))?;
            let last_modified: Option<DateTime<Utc>> =
                metadata.modified().ok().map(DateTime::from);

            objects.push(ObjectMeta {
                key,
                size: metadata.len(),
                last_modified,
            });
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, ArgusError> {
        let path = self.resolve(key)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| ArgusError::Infrastructure(InfrastructureError::Io(e)))
    }
}
