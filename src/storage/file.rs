//! File-backed store: one pretty-printed JSON document on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use crate::model::TaskDocument;

use super::{StoreError, TaskStore};

/// Persists the task document to a single JSON file.
///
/// Saves write to a sibling `.tmp` file and rename it into place, so a
/// crash mid-write never leaves a half-written database behind.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed an empty document if the database file does not exist yet.
    /// An existing file is left untouched, even if its content is invalid;
    /// invalid content surfaces later as a load error.
    pub async fn init(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            debug!(path = %self.path.display(), "task database already present");
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(StoreError::Write)?;
        }
        self.save(&TaskDocument::default()).await?;
        info!(path = %self.path.display(), "seeded empty task database");
        Ok(())
    }
}

#[async_trait]
impl TaskStore for FileStore {
    async fn load(&self) -> Result<TaskDocument, StoreError> {
        let raw = fs::read_to_string(&self.path)
            .await
            .map_err(StoreError::Read)?;
        serde_json::from_str(&raw).map_err(StoreError::Decode)
    }

    async fn save(&self, doc: &TaskDocument) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(doc).map_err(StoreError::Encode)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await.map_err(StoreError::Write)?;
        fs::rename(&tmp, &self.path).await.map_err(StoreError::Write)?;
        Ok(())
    }
}
