//! taskd: a to-do list HTTP service persisting everything to one JSON file.
//!
//! The layering is deliberately flat. [`model`] owns the document shape and
//! its transforms, [`storage`] moves whole documents to and from disk, and
//! [`rest`] wires the transforms to HTTP endpoints. Binary entry and
//! logging setup live in `main.rs`.

pub mod config;
pub mod model;
pub mod rest;
pub mod storage;

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::config::ServiceConfig;
use crate::storage::TaskStore;

/// Shared state handed to every request handler.
pub struct AppContext {
    pub config: Arc<ServiceConfig>,
    /// Whole-document task storage.
    pub store: Arc<dyn TaskStore>,
    /// Serializes load / transform / save cycles. Handlers must hold this
    /// across the whole cycle or concurrent mutations can lose updates.
    pub store_guard: Mutex<()>,
    pub started_at: Instant,
}

impl AppContext {
    pub fn new(config: ServiceConfig, store: Arc<dyn TaskStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            store_guard: Mutex::new(()),
            started_at: Instant::now(),
        }
    }
}
