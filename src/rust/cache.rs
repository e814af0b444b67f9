use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::classifier::BayesClassifier;

/// Shared, mutable handle to one live classifier instance.
pub type ClassifierHandle = Arc<RwLock<BayesClassifier>>;

/// Wraps a classifier in a fresh handle.
pub fn new_handle(classifier: BayesClassifier) -> ClassifierHandle {
    Arc::new(RwLock::new(classifier))
}

/// Process-lifetime mapping from classifier name to live instance.
///
/// Entries are never expired; `insert` replaces whatever was there
/// (last write wins). Share it between components with `Arc`.
#[derive(Debug, Default)]
pub struct ClassifierCache {
    entries: RwLock<HashMap<String, ClassifierHandle>>,
}

impl ClassifierCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, name: &str) -> Option<ClassifierHandle> {
        self.entries.read().await.get(name).cloned()
    }

    /// Stores `handle` under `name`, returning the handle it replaced.
    pub async fn insert(&self, name: impl Into<String>, handle: ClassifierHandle) -> Option<ClassifierHandle> {
        self.entries.write().await.insert(name.into(), handle)
    }

    /// Returns the live handle for `name`, storing `handle` only if there is none.
    pub async fn get_or_insert(&self, name: impl Into<String>, handle: ClassifierHandle) -> ClassifierHandle {
        self.entries.write().await
            .entry(name.into())
            .or_insert(handle)
            .clone()
    }

    pub async fn remove(&self, name: &str) -> Option<ClassifierHandle> {
        self.entries.write().await.remove(name)
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.entries.read().await.contains_key(name)
    }

    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
