use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use lazy_static::lazy_static;
use log;
use regex::Regex;

use super::entity::{EntityMerger, PosHandlerResult, RequiredTags};
use super::stopwords::{read_stop_word_csv, StopWordList, StopwordStore};
use super::tagger::{LexiconTagger, PosTagger, TaggedWords};
use crate::config::NlpConfig;
use crate::error::{NlpError, Result};

lazy_static! {
    static ref SPECIAL_CHARACTERS: Regex =
        Regex::new(r"[^A-Za-z0-9_\s]").expect("special character pattern is valid");
}

/// Text cleanup that runs before classification: stop word removal,
/// special-character stripping, POS tagging and entity extraction.
#[derive(Debug, Default)]
pub struct TextPreprocessor {
    stop_words: Option<Arc<dyn StopwordStore>>,
    tagger: Option<Box<dyn PosTagger>>,
    merger: EntityMerger,
}

impl TextPreprocessor {
    /// Creates a preprocessor; `pos_tag` builds the English lexicon tagger.
    pub fn new(pos_tag: bool) -> Self {
        Self {
            stop_words: None,
            tagger: pos_tag.then(|| Box::new(LexiconTagger::english()) as Box<dyn PosTagger>),
            merger: EntityMerger::default(),
        }
    }

    pub fn from_config(config: &NlpConfig) -> Self {
        Self::new(config.pos_tag)
    }

    pub fn with_stop_word_store(mut self, store: Arc<dyn StopwordStore>) -> Self {
        self.stop_words = Some(store);
        self
    }

    /// Enables tagging with a custom tagger.
    pub fn with_tagger(mut self, tagger: impl PosTagger + 'static) -> Self {
        self.tagger = Some(Box::new(tagger));
        self
    }

    pub fn tagging_enabled(&self) -> bool {
        self.tagger.is_some()
    }

    /// Drops every space-separated token found in the first stop word list.
    ///
    /// If the list cannot be fetched the error is logged and the text is
    /// returned with nothing removed.
    pub async fn remove_stop_words(&self, text: &str) -> String {
        log::info!("Request to remove stop words");
        let stop_words: HashSet<String> = match self.fetch_stop_words().await {
            Ok(values) => values.into_iter().collect(),
            Err(e) => {
                log::error!("Error while getting stop words: {}", e);
                HashSet::new()
            }
        };

        let processed = text.split(' ')
            .filter(|word| !stop_words.contains(*word))
            .collect::<Vec<_>>()
            .join(" ");
        log::info!("Stop words removed: {:?}", processed);
        processed
    }

    async fn fetch_stop_words(&self) -> Result<Vec<String>> {
        let store = self.stop_words.as_ref()
            .ok_or_else(|| NlpError::StopWords("no stop word store configured".into()))?;
        let mut lists = store.get_all().await?;
        if lists.is_empty() {
            return Err(NlpError::StopWords("stop word object is empty".into()));
        }
        Ok(lists.swap_remove(0).values)
    }

    /// Replaces (or creates) the stop word list `list_id` in the store.
    pub async fn update_stop_word_list(&self, values: Vec<String>, list_id: &str) -> Result<()> {
        let store = self.stop_words.as_ref()
            .ok_or_else(|| NlpError::InvalidOptions("No stop word store configured".into()))?;
        store.update(list_id, values).await.map_err(|e| {
            log::error!("Failed to update stop word list {}: {}", list_id, e);
            e
        })
    }

    /// Loads stop word lists from a CSV file.
    pub fn build_stop_word_list<P: AsRef<Path>>(path: P) -> Result<Vec<StopWordList>> {
        read_stop_word_csv(path).map_err(|e| {
            log::error!("Error reading stop word CSV: {}", e);
            e
        })
    }

    /// Removes everything except ASCII word characters and whitespace, then trims.
    pub fn clean_special_characters(text: &str) -> String {
        SPECIAL_CHARACTERS.replace_all(text, "").trim().to_string()
    }

    /// [`TextPreprocessor::clean_special_characters`] split on single spaces.
    pub fn clean_special_characters_tokens(text: &str) -> Vec<String> {
        Self::clean_special_characters(text)
            .split(' ')
            .map(str::to_string)
            .collect()
    }

    pub fn pos_tag(&self, tokens: &[String]) -> Result<TaggedWords> {
        let tagger = self.tagger.as_ref().ok_or(NlpError::TaggingDisabled)?;
        Ok(tagger.tag(tokens))
    }

    /// Buckets tagged tokens into the configured entity fields and stop words.
    pub fn pos_handler(&self, tagged: &TaggedWords, required: &RequiredTags) -> Result<PosHandlerResult> {
        self.merger.merge(tagged, required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::stopwords::MemoryStopwordStore;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct FailingStore;

    #[async_trait]
    impl StopwordStore for FailingStore {
        async fn get_all(&self) -> Result<Vec<StopWordList>> {
            Err(NlpError::StopWords("connection refused".into()))
        }

        async fn update(&self, _list_id: &str, _values: Vec<String>) -> Result<()> {
            Err(NlpError::StopWords("connection refused".into()))
        }
    }

    fn with_words(words: &[&str]) -> TextPreprocessor {
        let store = MemoryStopwordStore::with_lists(vec![StopWordList::new("en", words.iter().copied())]);
        TextPreprocessor::new(false).with_stop_word_store(Arc::new(store))
    }

    #[tokio::test]
    async fn test_remove_stop_words() {
        let preprocessor = with_words(&["the", "a"]);
        assert_eq!(preprocessor.remove_stop_words("the cat sat").await, "cat sat");
        assert_eq!(preprocessor.remove_stop_words("a cat on the mat").await, "cat on mat");
    }

    #[tokio::test]
    async fn test_stop_word_failures_degrade_to_no_removal() {
        let failing = TextPreprocessor::new(false).with_stop_word_store(Arc::new(FailingStore));
        assert_eq!(failing.remove_stop_words("the cat sat").await, "the cat sat");

        let empty = TextPreprocessor::new(false).with_stop_word_store(Arc::new(MemoryStopwordStore::new()));
        assert_eq!(empty.remove_stop_words("the cat").await, "the cat");

        let unconfigured = TextPreprocessor::new(false);
        assert_eq!(unconfigured.remove_stop_words("the cat").await, "the cat");
    }

    #[test]
    fn test_update_propagates_errors() {
        let failing = TextPreprocessor::new(false).with_stop_word_store(Arc::new(FailingStore));
        let result = tokio_test::block_on(failing.update_stop_word_list(vec!["x".into()], "en"));
        assert!(matches!(result, Err(NlpError::StopWords(_))));

        let unconfigured = TextPreprocessor::new(false);
        let result = tokio_test::block_on(unconfigured.update_stop_word_list(vec![], "en"));
        assert!(matches!(result, Err(NlpError::InvalidOptions(_))));
    }

    #[tokio::test]
    async fn test_updated_list_is_used() -> Result<()> {
        let preprocessor = with_words(&["the"]);
        preprocessor.update_stop_word_list(vec!["cat".into()], "en").await?;
        assert_eq!(preprocessor.remove_stop_words("the cat sat").await, "the sat");
        Ok(())
    }

    #[test]
    fn test_clean_special_characters() {
        assert_eq!(TextPreprocessor::clean_special_characters("  Hello, world! #42 "), "Hello world 42");
        assert_eq!(TextPreprocessor::clean_special_characters("snake_case?"), "snake_case");
        assert_eq!(
            TextPreprocessor::clean_special_characters_tokens("what's up, doc?"),
            vec!["whats", "up", "doc"]
        );
    }

    #[test]
    fn test_pos_tag_requires_tagging() {
        let tokens = vec!["Paris".to_string()];
        assert!(matches!(TextPreprocessor::new(false).pos_tag(&tokens), Err(NlpError::TaggingDisabled)));

        let tagged = TextPreprocessor::new(true).pos_tag(&tokens).unwrap();
        assert_eq!(tagged.tags(), vec!["NNP"]);
    }
}
