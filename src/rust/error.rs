use std::io;

/// Represents the different types of errors that can occur while managing,
/// training or querying classifiers and preprocessing text.
#[derive(Debug, thiserror::Error)]
pub enum NlpError {
    /// The classifier is absent from both the cache and the requested backend
    #[error("Classifier not found: {0}")]
    NotFound(String),
    /// A textual source or destination was neither `blob` nor `fs`
    #[error("Invalid classifier source: {0}")]
    InvalidSource(String),
    /// Malformed lifecycle or classify arguments
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
    /// A classify response mode other than `fullScores` or `class`
    #[error("Invalid classify response type: {0}")]
    InvalidResponseType(String),
    /// Backend read or write failure
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// A stored payload exists but cannot be turned back into a classifier
    #[error("Corrupt classifier data for '{name}': {reason}")]
    Corrupt { name: String, reason: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
    /// POS tagging was invoked on a preprocessor built without tagging
    #[error("Tagging not enabled")]
    TaggingDisabled,
    /// A single best label was requested from a classifier with no labels
    #[error("Classifier has no trained labels{}", .0.as_deref().map(|name| format!(": {}", name)).unwrap_or_default())]
    Untrained(Option<String>),
    #[error("Stop word store error: {0}")]
    StopWords(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl NlpError {
    /// Only genuine absence may trigger creation of a new classifier.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NlpError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, NlpError>;
