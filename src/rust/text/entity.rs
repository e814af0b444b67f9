use std::collections::{BTreeMap, HashMap};

use log;
use serde::{Deserialize, Serialize};

use super::tagger::{TaggedWords, PROPER_NOUN};
use crate::error::{NlpError, Result};

/// Keys [`PosHandlerResult`] already uses; configured fields may not reuse them.
pub const RESERVED_FIELDS: [&str; 2] = ["posTags", "stopWords"];

/// Maps a POS tag (e.g. `NNP`) to the output field its entities go into.
pub type RequiredTags = HashMap<String, String>;

/// Result of bucketing tagged tokens into entities and stop words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosHandlerResult {
    /// The tagged input, unchanged
    pub pos_tags: TaggedWords,
    /// Tokens whose tag is not configured, in input order
    pub stop_words: Vec<String>,
    /// One entry per configured field name, each in input order
    #[serde(flatten)]
    pub fields: BTreeMap<String, Vec<String>>,
}

impl PosHandlerResult {
    /// Entities collected for `field`; empty for unknown fields.
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Merges a configured tag plus its immediately following proper nouns into a
/// single space-separated entity.
#[derive(Debug, Clone)]
pub struct EntityMerger {
    continuation_tag: String,
    max_continuations: usize,
}

impl Default for EntityMerger {
    fn default() -> Self {
        Self {
            continuation_tag: PROPER_NOUN.to_string(),
            max_continuations: 2,
        }
    }
}

impl EntityMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `tagged` left to right. A token whose tag is in `required` starts
    /// an entity that absorbs at most `max_continuations` following proper
    /// nouns; any further proper noun starts a new scan step. Every other token
    /// is recorded as a stop word.
    ///
    /// Fails with [`NlpError::InvalidOptions`] when a configured field name is
    /// one of [`RESERVED_FIELDS`].
    pub fn merge(&self, tagged: &TaggedWords, required: &RequiredTags) -> Result<PosHandlerResult> {
        if let Some(field) = required.values().find(|field| RESERVED_FIELDS.contains(&field.as_str())) {
            return Err(NlpError::InvalidOptions(format!("Entity field name {} is reserved", field)));
        }

        let mut result = PosHandlerResult {
            pos_tags: tagged.clone(),
            stop_words: Vec::new(),
            fields: required.values().map(|field| (field.clone(), Vec::new())).collect(),
        };

        let words = &tagged.tagged_words;
        let mut j = 0;
        while j < words.len() {
            let current = &words[j];
            match required.get(&current.tag) {
                Some(field) => {
                    let mut entity = current.token.clone();
                    let mut continuations = 0;
                    while continuations < self.max_continuations
                        && words.get(j + 1).is_some_and(|next| next.tag == self.continuation_tag)
                    {
                        entity.push(' ');
                        entity.push_str(&words[j + 1].token);
                        j += 1;
                        continuations += 1;
                    }
                    log::debug!("Found entity {:?} for field {}", entity, field);
                    result.fields.entry(field.clone()).or_default().push(entity);
                }
                None => result.stop_words.push(current.token.clone()),
            }
            j += 1;
        }

        Ok(result)
    }
}
