//! Named, trainable text classifiers with pluggable persistence, training-data
//! augmentation and text preprocessing.
//!
//! # Basic Usage
//!
//! ```rust
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use classifier_hub::{
//!     ClassifierManager, ClassifyOptions, NlpConfig, ResponseMode, Source, Trainer,
//!     TrainingDocumentSpec, TrainingOptions, TrainingRequest, TokenizerKind,
//! };
//!
//! let dir = tempfile::tempdir()?;
//! let config = NlpConfig::default().with_classifier_dir(dir.path()).with_shuffle_seed(7);
//! let manager = ClassifierManager::from_config(&config)?;
//! let trainer = Trainer::for_manager(&manager, &config);
//!
//! let handle = manager.get_or_create("intents", Source::FileSystem, false).await?;
//!
//! let request = TrainingRequest::new("intents", vec![
//!     TrainingDocumentSpec::new(["reset my password"], ["account"])
//!         .with_options(TrainingOptions::default().with_tokenize(TokenizerKind::Standard)),
//!     TrainingDocumentSpec::new(["where is my parcel"], ["shipping"]),
//! ]);
//! trainer.train_batch(&request, false).await?;
//!
//! let response = manager
//!     .classify("password please", ClassifyOptions::with_classifier(handle, ResponseMode::Class))
//!     .await?;
//! assert_eq!(response.label(), Some("account"));
//! # Ok(())
//! # }
//! ```
//!
//! # Sharing
//!
//! The [`ClassifierCache`] is an explicit object: hand the same `Arc` to every
//! manager and trainer that should see the same live classifiers.

mod cache;
pub mod classifier;
mod classify;
pub mod config;
mod error;
mod manager;
pub mod storage;
pub mod text;
pub mod training;

pub use cache::{new_handle, ClassifierCache, ClassifierHandle};
pub use classifier::{BayesClassifier, LabelScore, TokenizerKind, WordTokenizer};
pub use classify::{score_probability, ClassifyOptions, ClassifyResponse, ResponseMode};
pub use config::{default_classifier_dir, NlpConfig};
pub use error::{NlpError, Result};
pub use manager::ClassifierManager;
pub use storage::{FileStore, MemoryBlobStore, PersistenceBackend, Source};
pub use text::{
    EntityMerger, LexiconTagger, MemoryStopwordStore, PosHandlerResult, PosTagger, RequiredTags,
    StopWordList, StopwordStore, TaggedToken, TaggedWords, TextPreprocessor,
};
pub use training::{
    char_shuffle, select_training_set, AugmentedDocument, Augmenter, BatchSummary, Trainer,
    TrainingDocumentSpec, TrainingOptions, TrainingRequest, Variant,
};

pub fn init_logger() {
    env_logger::init();
}
