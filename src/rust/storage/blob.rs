use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use log;
use tokio::sync::RwLock;

use super::{validate_name, PersistenceBackend};
use crate::error::{NlpError, Result};

/// An in-process content-blob store keyed by classifier name.
///
/// Hosts with a remote blob service implement [`PersistenceBackend`] for it
/// and inject that instead; this store backs tests and single-process use.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an existing payload.
    pub async fn insert(&self, name: impl Into<String>, payload: impl Into<String>) {
        self.blobs.write().await.insert(name.into(), payload.into());
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.blobs.read().await.contains_key(name)
    }

    /// Number of `load` calls served so far, hits and misses alike
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PersistenceBackend for MemoryBlobStore {
    async fn load(&self, name: &str) -> Result<String> {
        validate_name(name)?;
        self.loads.fetch_add(1, Ordering::Relaxed);
        log::debug!("Downloading blob {}", name);
        self.blobs.read().await
            .get(name)
            .cloned()
            .ok_or_else(|| NlpError::NotFound(name.to_string()))
    }

    async fn save(&self, name: &str, payload: &str) -> Result<()> {
        validate_name(name)?;
        self.saves.fetch_add(1, Ordering::Relaxed);
        log::debug!("Uploading blob {} ({} bytes)", name, payload.len());
        self.blobs.write().await.insert(name.to_string(), payload.to_string());
        Ok(())
    }
}
