use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::ClassifierHandle;
use crate::classifier::{BayesClassifier, LabelScore};
use crate::error::{NlpError, Result};

/// Shape of a classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseMode {
    /// Every trained label with its score, best first
    #[serde(rename = "fullScores")]
    FullScores,
    /// Only the best label
    #[serde(rename = "class")]
    Class,
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullScores => write!(f, "fullScores"),
            Self::Class => write!(f, "class"),
        }
    }
}

impl FromStr for ResponseMode {
    type Err = NlpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fullScores" => Ok(Self::FullScores),
            "class" => Ok(Self::Class),
            other => Err(NlpError::InvalidResponseType(other.to_string())),
        }
    }
}

/// Which classifier to use and how to answer.
///
/// Exactly one of `classifier` and `classifier_name` must be set.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    pub classifier: Option<ClassifierHandle>,
    /// Loaded from the blob backend, bypassing the cache
    pub classifier_name: Option<String>,
    pub response: ResponseMode,
}

impl ClassifyOptions {
    pub fn with_classifier(classifier: ClassifierHandle, response: ResponseMode) -> Self {
        Self { classifier: Some(classifier), classifier_name: None, response }
    }

    pub fn named(name: impl Into<String>, response: ResponseMode) -> Self {
        Self { classifier: None, classifier_name: Some(name.into()), response }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassifyResponse {
    Class(String),
    FullScores(Vec<LabelScore>),
}

impl ClassifyResponse {
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Class(label) => Some(label),
            Self::FullScores(scores) => scores.first().map(|s| s.label.as_str()),
        }
    }
}

/// Answers a classify request. Full scores from an untrained classifier are an
/// empty list; asking it for a single label is an error.
pub(crate) fn respond(
    classifier: &BayesClassifier,
    name: Option<&str>,
    text: &str,
    mode: ResponseMode,
) -> Result<ClassifyResponse> {
    match mode {
        ResponseMode::FullScores => Ok(ClassifyResponse::FullScores(classifier.classifications(text))),
        ResponseMode::Class => classifier.classify(text)
            .map(ClassifyResponse::Class)
            .ok_or_else(|| NlpError::Untrained(name.map(str::to_string))),
    }
}

/// Inverse logit of `score` in `base`: `base^score / (1 + base^score)`.
///
/// Naive Bayes scores drift toward the extremes, so treat the result as a
/// rough confidence rather than a calibrated probability.
pub fn score_probability(score: f64, base: f64) -> f64 {
    let odds = base.powf(score);
    if odds.is_infinite() {
        return 1.0;
    }
    odds / (1.0 + odds)
}
