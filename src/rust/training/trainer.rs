use std::sync::Arc;

use log;

use super::augment::Augmenter;
use super::spec::{TrainingDocumentSpec, TrainingRequest};
use crate::cache::ClassifierCache;
use crate::classifier::BayesClassifier;
use crate::config::NlpConfig;
use crate::error::{NlpError, Result};
use crate::manager::ClassifierManager;

/// Counters describing one trained batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub specs: usize,
    pub documents: usize,
    /// How many times the classifier was written back into the cache
    pub write_backs: usize,
}

/// Feeds augmented training documents into classifiers.
#[derive(Debug)]
pub struct Trainer {
    cache: Arc<ClassifierCache>,
    augmenter: Augmenter,
}

impl Trainer {
    pub fn new(cache: Arc<ClassifierCache>, augmenter: Augmenter) -> Self {
        Self { cache, augmenter }
    }

    /// A trainer sharing `manager`'s cache, with shuffling seeded from `config`.
    pub fn for_manager(manager: &ClassifierManager, config: &NlpConfig) -> Self {
        Self::new(Arc::clone(manager.cache()), Augmenter::from_config(config))
    }

    pub fn augmenter(&self) -> &Augmenter {
        &self.augmenter
    }

    /// Adds every augmented document of `spec` to `classifier` and returns how
    /// many were added. Documents added before an error stay in the classifier.
    pub fn train_spec(&self, classifier: &mut BayesClassifier, spec: &TrainingDocumentSpec) -> Result<usize> {
        let mut added = 0;
        for doc in self.augmenter.documents(spec) {
            let doc = doc?;
            log::trace!("Adding {:?} document {:?} -> {:?}", doc.variant, doc.text, doc.label);
            classifier.add_document(&doc.text, &doc.label);
            added += 1;
        }
        Ok(added)
    }

    /// Trains every spec of `request` into the cached classifier it names.
    ///
    /// The classifier is written back into the cache after a spec when
    /// `set_on_last` is true, or after the last spec of a batch with more than
    /// one spec. The first failure aborts the batch without rolling back.
    pub async fn train_batch(&self, request: &TrainingRequest, set_on_last: bool) -> Result<BatchSummary> {
        let name = &request.classifier_name;
        let handle = self.cache.get(name).await.ok_or_else(|| {
            log::error!("Cannot train {}: classifier is not loaded", name);
            NlpError::NotFound(name.clone())
        })?;

        let count = request.training_docs.len();
        let mut summary = BatchSummary { specs: count, ..BatchSummary::default() };

        for (index, spec) in request.training_docs.iter().enumerate() {
            let added = {
                let mut classifier = handle.write().await;
                self.train_spec(&mut classifier, spec).map_err(|e| {
                    log::error!("Training {} failed on spec {}: {}", name, index, e);
                    e
                })?
            };
            log::debug!("Trained spec {}/{} of {} ({} documents)", index + 1, count, name, added);
            summary.documents += added;

            if should_write_back(index, count, set_on_last) {
                log::info!("Completed documents for {}, storing in cache", name);
                self.cache.insert(name.as_str(), Arc::clone(&handle)).await;
                summary.write_backs += 1;
            }
        }

        Ok(summary)
    }
}

fn should_write_back(index: usize, count: usize, set_on_last: bool) -> bool {
    set_on_last || (count > 1 && index + 1 == count)
}
