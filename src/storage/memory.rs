//! In-memory store used by unit tests.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::TaskDocument;

use super::{StoreError, TaskStore};

/// Holds the document behind an `RwLock` and lets tests force reads or
/// writes to fail.
#[derive(Default)]
pub struct MemoryStore {
    doc: RwLock<TaskDocument>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new(doc: TaskDocument) -> Self {
        Self {
            doc: RwLock::new(doc),
            ..Default::default()
        }
    }

    /// Make every subsequent load fail with a read error.
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent save fail with a write error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Copy of the current document, bypassing failure injection.
    pub async fn snapshot(&self) -> TaskDocument {
        self.doc.read().await.clone()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn load(&self) -> Result<TaskDocument, StoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Read(io::Error::new(
                io::ErrorKind::Other,
                "injected load failure",
            )));
        }
        Ok(self.doc.read().await.clone())
    }

    async fn save(&self, doc: &TaskDocument) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Write(io::Error::new(
                io::ErrorKind::Other,
                "injected save failure",
            )));
        }
        *self.doc.write().await = doc.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;

    #[tokio::test]
    async fn load_returns_what_save_stored() {
        let store = MemoryStore::default();
        let doc = TaskDocument {
            todos: vec![Task {
                id: 1,
                task: "a".to_string(),
                status: false,
            }],
        };
        store.save(&doc).await.unwrap();
        assert_eq!(store.load().await.unwrap(), doc);
    }

    #[tokio::test]
    async fn injected_failures_map_to_read_and_write_errors() {
        let store = MemoryStore::default();

        store.set_fail_loads(true);
        assert!(matches!(
            store.load().await.unwrap_err(),
            StoreError::Read(_)
        ));
        store.set_fail_loads(false);
        assert!(store.load().await.is_ok());

        store.set_fail_saves(true);
        let err = store.save(&TaskDocument::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));
    }
}
