use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Tag the entity merger treats as a proper-noun continuation
pub const PROPER_NOUN: &str = "NNP";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(token: impl Into<String>, tag: impl Into<String>) -> Self {
        Self { token: token.into(), tag: tag.into() }
    }
}

/// Tagger output, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedWords {
    pub tagged_words: Vec<TaggedToken>,
}

impl TaggedWords {
    pub fn new(tagged_words: Vec<TaggedToken>) -> Self {
        Self { tagged_words }
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(pairs.into_iter().map(|(token, tag)| TaggedToken::new(token, tag)).collect())
    }

    pub fn len(&self) -> usize {
        self.tagged_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tagged_words.is_empty()
    }

    pub fn tags(&self) -> Vec<&str> {
        self.tagged_words.iter().map(|t| t.tag.as_str()).collect()
    }
}

/// Assigns a Penn Treebank style tag to each token.
pub trait PosTagger: Send + Sync + std::fmt::Debug {
    fn tag(&self, tokens: &[String]) -> TaggedWords;
}

lazy_static! {
    static ref ENGLISH_LEXICON: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        for w in ["the", "a", "an", "this", "that", "these", "those", "every", "each", "some", "any", "no"] {
            m.insert(w, "DT");
        }
        for w in ["i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them"] {
            m.insert(w, "PRP");
        }
        for w in ["my", "your", "his", "her", "its", "our", "their"] {
            m.insert(w, "PRP$");
        }
        for w in ["in", "on", "at", "of", "for", "with", "from", "by", "about", "into", "over", "after", "before", "under", "between"] {
            m.insert(w, "IN");
        }
        for w in ["and", "or", "but", "nor"] {
            m.insert(w, "CC");
        }
        for w in ["was", "were", "had", "did", "said", "went", "made", "won", "discovered"] {
            m.insert(w, "VBD");
        }
        for w in ["is", "has", "does", "says"] {
            m.insert(w, "VBZ");
        }
        for w in ["are", "am", "have", "do"] {
            m.insert(w, "VBP");
        }
        for w in ["be", "go", "make", "get", "see"] {
            m.insert(w, "VB");
        }
        for w in ["been", "done", "gone", "seen"] {
            m.insert(w, "VBN");
        }
        for w in ["being", "going", "making", "getting"] {
            m.insert(w, "VBG");
        }
        for w in ["will", "would", "can", "could", "should", "may", "might", "must", "shall"] {
            m.insert(w, "MD");
        }
        for w in ["not", "very", "also", "never", "always", "often", "here", "there"] {
            m.insert(w, "RB");
        }
        for w in ["who", "what", "which"] {
            m.insert(w, "WP");
        }
        for w in ["where", "when", "why", "how"] {
            m.insert(w, "WRB");
        }
        m.insert("to", "TO");
        m
    };
}

/// A lexicon tagger: known words get their lexicon tag, unknown words are
/// `CD` if numeric, `NNP` if capitalized and `NN` otherwise.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    lexicon: HashMap<String, String>,
    default_capitalized: String,
    default_tag: String,
}

impl LexiconTagger {
    /// The built-in English lexicon
    pub fn english() -> Self {
        Self {
            lexicon: ENGLISH_LEXICON.iter().map(|(w, t)| (w.to_string(), t.to_string())).collect(),
            default_capitalized: PROPER_NOUN.to_string(),
            default_tag: "NN".to_string(),
        }
    }

    pub fn with_entry(mut self, word: impl Into<String>, tag: impl Into<String>) -> Self {
        self.lexicon.insert(word.into(), tag.into());
        self
    }

    fn tag_token(&self, token: &str) -> &str {
        if let Some(tag) = self.lexicon.get(token).or_else(|| self.lexicon.get(&token.to_lowercase())) {
            return tag;
        }
        if token.replace(',', "").parse::<f64>().is_ok() {
            return "CD";
        }
        if token.chars().next().is_some_and(char::is_uppercase) {
            return &self.default_capitalized;
        }
        &self.default_tag
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[String]) -> TaggedWords {
        TaggedWords::new(
            tokens.iter()
                .map(|token| TaggedToken::new(token.as_str(), self.tag_token(token)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_english_tagging() {
        let tagger = LexiconTagger::english();
        let tagged = tagger.tag(&tokens(&["Marie", "Curie", "was", "born", "in", "1867"]));
        assert_eq!(tagged.tags(), vec!["NNP", "NNP", "VBD", "NN", "IN", "CD"]);
        assert_eq!(tagged.tagged_words[0].token, "Marie");
    }

    #[test]
    fn test_lexicon_lookup_ignores_sentence_case() {
        let tagger = LexiconTagger::english();
        assert_eq!(tagger.tag(&tokens(&["The", "cat"])).tags(), vec!["DT", "NN"]);
    }

    #[test]
    fn test_custom_entry() {
        let tagger = LexiconTagger::english().with_entry("born", "VBN");
        assert_eq!(tagger.tag(&tokens(&["born"])).tags(), vec!["VBN"]);
    }

    #[test]
    fn test_tagged_words_serde_shape() {
        let tagged = TaggedWords::from_pairs([("Paris", "NNP")]);
        let json = serde_json::to_string(&tagged).unwrap();
        assert_eq!(json, r#"{"taggedWords":[{"token":"Paris","tag":"NNP"}]}"#);
    }
}
