use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use log;
use tokio::sync::Mutex;

use crate::cache::{new_handle, ClassifierCache, ClassifierHandle};
use crate::classifier::BayesClassifier;
use crate::classify::{respond, ClassifyOptions, ClassifyResponse};
use crate::config::NlpConfig;
use crate::error::{NlpError, Result};
use crate::storage::{FileStore, MemoryBlobStore, PersistenceBackend, Source};

/// Resolves classifiers by name: cache first, then the selected backend, and
/// creates empty ones when a name is genuinely unknown.
#[derive(Debug, Clone)]
pub struct ClassifierManager {
    cache: Arc<ClassifierCache>,
    blob: Arc<dyn PersistenceBackend>,
    fs: Arc<dyn PersistenceBackend>,
    creation_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl ClassifierManager {
    pub fn new(
        cache: Arc<ClassifierCache>,
        blob: Arc<dyn PersistenceBackend>,
        fs: Arc<dyn PersistenceBackend>,
    ) -> Self {
        Self {
            cache,
            blob,
            fs,
            creation_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Builds a manager with a fresh cache, an in-memory blob store and a file
    /// store under `config.classifier_dir`.
    pub fn from_config(config: &NlpConfig) -> io::Result<Self> {
        let fs = FileStore::new(&config.classifier_dir)?;
        Ok(Self::new(
            Arc::new(ClassifierCache::new()),
            Arc::new(MemoryBlobStore::new()),
            Arc::new(fs),
        ))
    }

    /// Creates a new manager using the default classifier directory
    pub fn new_default() -> io::Result<Self> {
        Self::from_config(&NlpConfig::from_env())
    }

    pub fn cache(&self) -> &Arc<ClassifierCache> {
        &self.cache
    }

    pub fn backend(&self, source: Source) -> &Arc<dyn PersistenceBackend> {
        match source {
            Source::Blob => &self.blob,
            Source::FileSystem => &self.fs,
        }
    }

    /// Loads and deserializes a classifier straight from a backend, without
    /// consulting or touching the cache.
    pub async fn load(&self, name: &str, source: Source) -> Result<BayesClassifier> {
        let payload = self.backend(source).load(name).await?;
        BayesClassifier::from_json(&payload).map_err(|e| {
            log::error!("Stored classifier {} in {} is unreadable: {}", name, source, e);
            NlpError::Corrupt {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Returns the cached classifier for `name`, or loads it from `source`.
    ///
    /// A loaded classifier is put in the cache when `cache_on_hit` is set; if
    /// another task cached one first, that instance is returned instead.
    pub async fn resolve(&self, name: &str, source: Source, cache_on_hit: bool) -> Result<ClassifierHandle> {
        if let Some(handle) = self.cache.get(name).await {
            log::info!("Got classifier {} from cache", name);
            return Ok(handle);
        }

        log::debug!("Classifier {} not cached, loading from {}", name, source);
        let handle = new_handle(self.load(name, source).await?);
        if cache_on_hit {
            return Ok(self.cache.get_or_insert(name, handle).await);
        }
        Ok(handle)
    }

    /// Resolves `name`, creating and registering an empty classifier when it
    /// does not exist anywhere. Errors other than absence are returned as is.
    ///
    /// Calls for the same name are serialized, so concurrent misses create a
    /// single instance.
    pub async fn get_or_create(&self, name: &str, source: Source, upload: bool) -> Result<ClassifierHandle> {
        let lock = self.creation_lock(name).await;
        let result = {
            let _guard = lock.lock().await;
            self.resolve_or_create(name, source, upload).await
        };
        self.release_creation_lock(name, lock).await;
        result
    }

    async fn resolve_or_create(&self, name: &str, source: Source, upload: bool) -> Result<ClassifierHandle> {
        match self.resolve(name, source, true).await {
            Ok(handle) => Ok(handle),
            Err(e) if e.is_not_found() => {
                log::info!("Classifier {} not found, creating a new one", name);
                self.set(name, Some(new_handle(BayesClassifier::new())), upload, Some(source)).await
            }
            Err(e) => {
                log::error!("Failed to resolve classifier {}: {}", name, e);
                Err(e)
            }
        }
    }

    /// Registers a classifier under `name` and optionally uploads it.
    ///
    /// With no classifier supplied, one is resolved by name from the blob
    /// backend. The cache entry is replaced unconditionally; `upload` requires a
    /// `destination`.
    pub async fn set(
        &self,
        name: &str,
        classifier: Option<ClassifierHandle>,
        upload: bool,
        destination: Option<Source>,
    ) -> Result<ClassifierHandle> {
        log::debug!("Setting classifier {} (upload: {}, destination: {:?})", name, upload, destination);
        let handle = match classifier {
            Some(handle) => handle,
            None => self.resolve(name, Source::Blob, false).await.map_err(|e| {
                log::error!("No classifier supplied for {} and none could be resolved: {}", name, e);
                e
            })?,
        };

        self.cache.insert(name, Arc::clone(&handle)).await;

        if upload {
            let destination = destination.ok_or_else(|| {
                NlpError::InvalidOptions("Must specify destination when upload is true".into())
            })?;
            self.save_handle(name, &handle, destination).await?;
        }
        Ok(handle)
    }

    /// Persists the cached classifier `name` to `destination`.
    pub async fn save(&self, name: &str, destination: Source) -> Result<()> {
        let handle = self.cache.get(name).await
            .ok_or_else(|| NlpError::NotFound(name.to_string()))?;
        self.save_handle(name, &handle, destination).await
    }

    pub async fn evict(&self, name: &str) -> Option<ClassifierHandle> {
        self.cache.remove(name).await
    }

    /// Classifies `text` with either an explicit classifier or one loaded by
    /// name from the blob backend.
    pub async fn classify(&self, text: &str, options: ClassifyOptions) -> Result<ClassifyResponse> {
        let result = match (options.classifier, options.classifier_name) {
            (Some(handle), None) => {
                let classifier = handle.read().await;
                respond(&classifier, None, text, options.response)
            }
            (None, Some(name)) => match self.load(&name, Source::Blob).await {
                Ok(classifier) => respond(&classifier, Some(&name), text, options.response),
                Err(e) => Err(e),
            },
            (Some(_), Some(_)) => Err(NlpError::InvalidOptions(
                "Specify either a classifier or a classifier name, not both".into(),
            )),
            (None, None) => Err(NlpError::InvalidOptions(
                "A classifier or a classifier name is required".into(),
            )),
        };

        if let Err(e) = &result {
            log::error!("Failed to classify {:?}: {}", text, e);
        }
        result
    }

    async fn save_handle(&self, name: &str, handle: &ClassifierHandle, destination: Source) -> Result<()> {
        let payload = handle.read().await.to_json()?;
        log::debug!("Saving classifier {} to {}", name, destination);
        self.backend(destination).save(name, &payload).await
    }

    async fn creation_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.creation_locks.lock().await;
        Arc::clone(locks.entry(name.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))))
    }

    /// Drops the map entry once no other caller holds or waits on `lock`.
    async fn release_creation_lock(&self, name: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.creation_locks.lock().await;
        let idle = locks.get(name).is_some_and(|current| Arc::ptr_eq(current, &lock))
            && Arc::strong_count(&lock) == 2;
        if idle {
            locks.remove(name);
        }
    }
}
