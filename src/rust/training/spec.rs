use serde::{Deserialize, Serialize};

use crate::classifier::TokenizerKind;
use crate::error::Result;

/// Which augmented variants are generated for each (source, target) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainingOptions {
    /// Add every token of the source value as its own document
    pub tokenize: bool,
    pub tokenizer_options: TokenizerKind,
    /// Add a character-shuffled copy of the source value
    pub shuffle: bool,
    /// Character-shuffle each token before adding it
    pub shuffle_token: bool,
    /// Also add the tokens of the shuffled copy (needs `shuffle`)
    pub tokenize_shuffle: bool,
}

impl TrainingOptions {
    pub fn with_tokenize(mut self, kind: TokenizerKind) -> Self {
        self.tokenize = true;
        self.tokenizer_options = kind;
        self
    }

    pub fn with_shuffle(mut self) -> Self {
        self.shuffle = true;
        self
    }

    pub fn with_shuffle_token(mut self) -> Self {
        self.shuffle_token = true;
        self
    }

    pub fn with_tokenize_shuffle(mut self) -> Self {
        self.tokenize_shuffle = true;
        self
    }
}

/// A compact training specification: every source value is trained to every
/// target value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDocumentSpec {
    #[serde(default)]
    pub source_values: Vec<String>,
    #[serde(default)]
    pub target_values: Vec<String>,
    #[serde(default)]
    pub training_options: TrainingOptions,
}

impl TrainingDocumentSpec {
    pub fn new(
        source_values: impl IntoIterator<Item = impl Into<String>>,
        target_values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            source_values: source_values.into_iter().map(Into::into).collect(),
            target_values: target_values.into_iter().map(Into::into).collect(),
            training_options: TrainingOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TrainingOptions) -> Self {
        self.training_options = options;
        self
    }
}

/// An ordered batch of specs for one named classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRequest {
    pub classifier_name: String,
    pub training_docs: Vec<TrainingDocumentSpec>,
}

impl TrainingRequest {
    pub fn new(classifier_name: impl Into<String>, training_docs: Vec<TrainingDocumentSpec>) -> Self {
        Self {
            classifier_name: classifier_name.into(),
            training_docs,
        }
    }

    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}
