use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single label with its score for some input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct LabelStats {
    documents: usize,
    total_features: usize,
    features: BTreeMap<String, usize>,
}

/// A multinomial naive Bayes text classifier with Laplace smoothing.
///
/// All internal maps are ordered, so a given trained state always serializes to
/// the same JSON and a restored classifier scores bit-identically to the
/// original.
///
/// ```rust
/// use classifier_hub::BayesClassifier;
///
/// let mut classifier = BayesClassifier::new();
/// classifier.add_document("reset my password", "account");
/// classifier.add_document("where is my parcel", "shipping");
///
/// assert_eq!(classifier.classify("password help").as_deref(), Some("account"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesClassifier {
    smoothing: f64,
    documents: usize,
    vocabulary: BTreeSet<String>,
    labels: BTreeMap<String, LabelStats>,
}

impl Default for BayesClassifier {
    fn default() -> Self {
        Self {
            smoothing: 1.0,
            documents: 0,
            vocabulary: BTreeSet::new(),
            labels: BTreeMap::new(),
        }
    }
}

impl BayesClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one labeled training document.
    pub fn add_document(&mut self, text: &str, label: &str) {
        let stats = self.labels.entry(label.to_string()).or_default();
        stats.documents += 1;
        for feature in extract_features(text) {
            *stats.features.entry(feature.clone()).or_insert(0) += 1;
            stats.total_features += 1;
            self.vocabulary.insert(feature);
        }
        self.documents += 1;
    }

    /// Returns the best label, or `None` when nothing has been trained.
    pub fn classify(&self, text: &str) -> Option<String> {
        self.classifications(text).into_iter().next().map(|score| score.label)
    }

    /// Scores every trained label for `text`, best first.
    ///
    /// Values are log-probabilities (log prior plus summed log likelihoods), so
    /// they are only comparable within one call.
    pub fn classifications(&self, text: &str) -> Vec<LabelScore> {
        if self.documents == 0 {
            return Vec::new();
        }

        let features = extract_features(text);
        let vocabulary = self.vocabulary.len().max(1) as f64;

        let mut scores: Vec<LabelScore> = self.labels.iter()
            .map(|(label, stats)| {
                let prior = (stats.documents as f64 / self.documents as f64).ln();
                let denominator = stats.total_features as f64 + self.smoothing * vocabulary;
                let likelihood: f64 = features.iter()
                    .map(|feature| {
                        let count = stats.features.get(feature).copied().unwrap_or(0) as f64;
                        ((count + self.smoothing) / denominator).ln()
                    })
                    .sum();
                LabelScore { label: label.clone(), value: prior + likelihood }
            })
            .collect();

        scores.sort_by(|a, b| {
            b.value.partial_cmp(&a.value)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        scores
    }

    pub fn labels(&self) -> Vec<&str> {
        self.labels.keys().map(String::as_str).collect()
    }

    /// Number of documents added over the classifier's lifetime
    pub fn document_count(&self) -> usize {
        self.documents
    }

    pub fn is_trained(&self) -> bool {
        !self.labels.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Lowercased alphanumeric runs of `text`.
fn extract_features(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect()
}
