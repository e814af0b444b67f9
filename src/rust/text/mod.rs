//! Text preprocessing ahead of classification.

pub mod distance;
mod entity;
mod preprocess;
mod stopwords;
mod tagger;

pub use entity::{EntityMerger, PosHandlerResult, RequiredTags, RESERVED_FIELDS};
pub use preprocess::TextPreprocessor;
pub use stopwords::{read_stop_word_csv, MemoryStopwordStore, StopWordList, StopwordStore};
pub use tagger::{LexiconTagger, PosTagger, TaggedToken, TaggedWords, PROPER_NOUN};
