//! Training-document augmentation and batch training.

mod augment;
mod spec;
mod trainer;

pub use augment::{char_shuffle, AugmentedDocument, AugmentedDocuments, Augmenter, Variant};
pub use spec::{TrainingDocumentSpec, TrainingOptions, TrainingRequest};
pub use trainer::{BatchSummary, Trainer};

use log;

use crate::error::{NlpError, Result};

/// Takes every `gap`-th element of `population`, starting with the first.
pub fn select_training_set<T: Clone>(population: &[T], gap: usize) -> Result<Vec<T>> {
    if gap == 0 {
        return Err(NlpError::InvalidOptions("Training set gap must be at least 1".into()));
    }
    log::debug!("Population size: {} | gap: {}", population.len(), gap);
    let selected: Vec<T> = population.iter().step_by(gap).cloned().collect();
    log::info!("Training set size for current batch: {}", selected.len());
    Ok(selected)
}
