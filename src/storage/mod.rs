//! Whole-document persistence for the task collection.
//!
//! There is no row-level storage. A store reads the entire document and
//! rewrites the entire document, and every handler cycle goes through the
//! [`TaskStore`] trait so tests can swap the file for an in-memory double.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::TaskDocument;

/// Failures a store can surface. Handlers collapse all of these into one
/// opaque HTTP 500; the variants exist for logs and tests.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read task database: {0}")]
    Read(#[source] std::io::Error),

    #[error("task database is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("could not encode task document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("could not write task database: {0}")]
    Write(#[source] std::io::Error),
}

/// Access to the one persisted task document.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Read and decode the whole document.
    async fn load(&self) -> Result<TaskDocument, StoreError>;

    /// Encode and persist the whole document, replacing prior content.
    async fn save(&self, doc: &TaskDocument) -> Result<(), StoreError>;
}
