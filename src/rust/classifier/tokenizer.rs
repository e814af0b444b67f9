use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokenizers::normalizers::{Lowercase, StripAccents, NFKD};
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{
    NormalizedString, Normalizer, OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer,
};

use crate::error::{NlpError, Result};

/// Which word tokenizer the augmentation engine uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// Folds case and strips accents before splitting
    Aggressive,
    /// Splits on word boundaries and keeps the original text
    #[default]
    Standard,
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aggressive => write!(f, "aggressive"),
            Self::Standard => write!(f, "standard"),
        }
    }
}

impl FromStr for TokenizerKind {
    type Err = NlpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "aggressive" => Ok(Self::Aggressive),
            "standard" => Ok(Self::Standard),
            other => Err(NlpError::InvalidOptions(format!("Unknown tokenizer: {}", other))),
        }
    }
}

/// Splits text into word tokens, dropping punctuation runs.
///
/// Built on the `tokenizers` whitespace pre-tokenizer (`\w+|[^\w\s]+`); only the
/// word splits are kept.
#[derive(Debug, Clone)]
pub struct WordTokenizer {
    kind: TokenizerKind,
    pre_tokenizer: Whitespace,
}

impl WordTokenizer {
    pub fn new(kind: TokenizerKind) -> Self {
        Self {
            kind,
            pre_tokenizer: Whitespace::default(),
        }
    }

    pub fn kind(&self) -> TokenizerKind {
        self.kind
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let text = match self.kind {
            TokenizerKind::Aggressive => Self::fold(text)?,
            TokenizerKind::Standard => text.to_string(),
        };

        let mut pretokenized = PreTokenizedString::from(text.as_str());
        self.pre_tokenizer
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| NlpError::Tokenizer(e.to_string()))?;

        Ok(pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Byte)
            .into_iter()
            .map(|(split, _, _)| split)
            .filter(|split| split.chars().any(|c| c.is_alphanumeric() || c == '_'))
            .map(str::to_string)
            .collect())
    }

    fn fold(text: &str) -> Result<String> {
        let mut normalized = NormalizedString::from(text);
        NFKD.normalize(&mut normalized)
            .and_then(|_| StripAccents.normalize(&mut normalized))
            .and_then(|_| Lowercase.normalize(&mut normalized))
            .map_err(|e| NlpError::Tokenizer(e.to_string()))?;
        Ok(normalized.get().to_string())
    }
}
