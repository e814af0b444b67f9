mod bayes;
mod tokenizer;

pub use bayes::{BayesClassifier, LabelScore};
pub use tokenizer::{TokenizerKind, WordTokenizer};
