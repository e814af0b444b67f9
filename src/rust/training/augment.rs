use std::collections::VecDeque;

use log;
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::spec::{TrainingDocumentSpec, TrainingOptions};
use crate::classifier::{TokenizerKind, WordTokenizer};
use crate::config::NlpConfig;
use crate::error::Result;

/// Which rule produced an augmented document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// The untouched source value
    Base,
    /// A token of the source value
    Token,
    /// The character-shuffled source value
    Shuffled,
    /// A token of the character-shuffled source value
    ShuffledToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentedDocument {
    pub text: String,
    pub label: String,
    pub variant: Variant,
}

/// Fisher-Yates permutation of the characters of `s`, returned as a new string.
pub fn char_shuffle<R: Rng + ?Sized>(s: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    for i in (1..chars.len()).rev() {
        let j = rng.random_range(0..=i);
        chars.swap(i, j);
    }
    chars.into_iter().collect()
}

/// Expands training specs into augmented documents.
///
/// The word tokenizer is built the first time a spec needs one, using that
/// spec's tokenizer kind, and reused for every later spec.
#[derive(Debug, Default)]
pub struct Augmenter {
    tokenizer: OnceCell<WordTokenizer>,
    seed: Option<u64>,
}

impl Augmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every shuffle reproducible: each call to [`Augmenter::documents`]
    /// restarts from the same seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            tokenizer: OnceCell::new(),
            seed: Some(seed),
        }
    }

    pub fn from_config(config: &NlpConfig) -> Self {
        Self {
            tokenizer: OnceCell::new(),
            seed: config.shuffle_seed,
        }
    }

    /// The kind of the tokenizer in use, once one has been built
    pub fn tokenizer_kind(&self) -> Option<TokenizerKind> {
        self.tokenizer.get().map(WordTokenizer::kind)
    }

    /// Lazily yields the documents for `spec`. The sequence is finite and can be
    /// restarted by calling this again.
    pub fn documents<'a>(&'a self, spec: &'a TrainingDocumentSpec) -> AugmentedDocuments<'a> {
        if spec.source_values.is_empty() {
            log::warn!("Training spec has no source values to train on");
        }
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        AugmentedDocuments {
            augmenter: self,
            spec,
            rng,
            source_index: 0,
            target_index: 0,
            pending: VecDeque::new(),
            failed: false,
        }
    }

    fn tokenizer(&self, kind: TokenizerKind) -> &WordTokenizer {
        self.tokenizer.get_or_init(|| {
            log::debug!("Building {} tokenizer", kind);
            WordTokenizer::new(kind)
        })
    }
}

/// Iterator over the augmented documents of one spec, in source-major,
/// target-minor order. Stops after the first error.
#[derive(Debug)]
pub struct AugmentedDocuments<'a> {
    augmenter: &'a Augmenter,
    spec: &'a TrainingDocumentSpec,
    rng: StdRng,
    source_index: usize,
    target_index: usize,
    pending: VecDeque<AugmentedDocument>,
    failed: bool,
}

impl<'a> AugmentedDocuments<'a> {
    fn expand(&mut self, source: &str, target: &str, options: TrainingOptions) -> Result<Vec<AugmentedDocument>> {
        let mut docs = vec![document(source.to_string(), target, Variant::Base)];

        if options.tokenize {
            let tokens = self.augmenter.tokenizer(options.tokenizer_options).tokenize(source)?;
            for token in tokens {
                docs.push(self.token_document(token, target, Variant::Token, options.shuffle_token));
            }
        }

        if options.shuffle {
            let shuffled = char_shuffle(source, &mut self.rng);
            if options.tokenize_shuffle {
                let tokens = self.augmenter.tokenizer(options.tokenizer_options).tokenize(&shuffled)?;
                docs.push(document(shuffled, target, Variant::Shuffled));
                for token in tokens {
                    docs.push(self.token_document(token, target, Variant::ShuffledToken, options.shuffle_token));
                }
            } else {
                docs.push(document(shuffled, target, Variant::Shuffled));
            }
        }

        Ok(docs)
    }

    fn token_document(&mut self, token: String, target: &str, variant: Variant, shuffle: bool) -> AugmentedDocument {
        let text = if shuffle { char_shuffle(&token, &mut self.rng) } else { token };
        document(text, target, variant)
    }
}

fn document(text: String, label: &str, variant: Variant) -> AugmentedDocument {
    AugmentedDocument { text, label: label.to_string(), variant }
}

impl<'a> Iterator for AugmentedDocuments<'a> {
    type Item = Result<AugmentedDocument>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(doc) = self.pending.pop_front() {
                return Some(Ok(doc));
            }
            if self.failed {
                return None;
            }

            let spec = self.spec;
            let source = spec.source_values.get(self.source_index)?;
            let target = match spec.target_values.get(self.target_index) {
                Some(target) => target,
                None => {
                    self.source_index += 1;
                    self.target_index = 0;
                    continue;
                }
            };
            self.target_index += 1;

            match self.expand(source, target, spec.training_options) {
                Ok(docs) => self.pending.extend(docs),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_chars(s: &str) -> Vec<char> {
        let mut chars: Vec<char> = s.chars().collect();
        chars.sort_unstable();
        chars
    }

    fn collect(augmenter: &Augmenter, spec: &TrainingDocumentSpec) -> Vec<AugmentedDocument> {
        augmenter.documents(spec).collect::<Result<Vec<_>>>().unwrap()
    }

    #[test]
    fn test_char_shuffle_preserves_characters() {
        let mut rng = StdRng::seed_from_u64(3);
        for input in ["", "a", "héllo wörld", "aaab"] {
            let shuffled = char_shuffle(input, &mut rng);
            assert_eq!(shuffled.chars().count(), input.chars().count());
            assert_eq!(sorted_chars(&shuffled), sorted_chars(input));
        }
    }

    #[test]
    fn test_base_documents_only() {
        let spec = TrainingDocumentSpec::new(["a b", "c"], ["x", "y"]);
        let docs = collect(&Augmenter::new(), &spec);
        let pairs: Vec<(&str, &str)> = docs.iter().map(|d| (d.text.as_str(), d.label.as_str())).collect();
        assert_eq!(pairs, vec![("a b", "x"), ("a b", "y"), ("c", "x"), ("c", "y")]);
        assert!(docs.iter().all(|d| d.variant == Variant::Base));
    }

    #[test]
    fn test_tokenize_adds_one_document_per_token() {
        let spec = TrainingDocumentSpec::new(["reset my password"], ["account"])
            .with_options(TrainingOptions::default().with_tokenize(TokenizerKind::Standard));
        let docs = collect(&Augmenter::new(), &spec);
        let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["reset my password", "reset", "my", "password"]);
        assert_eq!(docs[1].variant, Variant::Token);
    }

    #[test]
    fn test_shuffle_token_keeps_token_characters() {
        let spec = TrainingDocumentSpec::new(["password"], ["account"])
            .with_options(TrainingOptions::default()
                .with_tokenize(TokenizerKind::Standard)
                .with_shuffle_token());
        let docs = collect(&Augmenter::with_seed(11), &spec);
        assert_eq!(docs.len(), 2);
        assert_eq!(sorted_chars(&docs[1].text), sorted_chars("password"));
    }

    #[test]
    fn test_shuffle_and_tokenize_shuffle() {
        let spec = TrainingDocumentSpec::new(["ab cd"], ["t"])
            .with_options(TrainingOptions::default().with_shuffle().with_tokenize_shuffle());
        let docs = collect(&Augmenter::with_seed(5), &spec);

        assert_eq!(docs[0].variant, Variant::Base);
        assert_eq!(docs[1].variant, Variant::Shuffled);
        assert_eq!(sorted_chars(&docs[1].text), sorted_chars("ab cd"));
        assert!(docs[2..].iter().all(|d| d.variant == Variant::ShuffledToken));
        let token_chars: usize = docs[2..].iter().map(|d| d.text.chars().count()).sum();
        assert_eq!(token_chars, 4);
    }

    #[test]
    fn test_all_shuffle_options_together() {
        let spec = TrainingDocumentSpec::new(["ab cd"], ["t"])
            .with_options(TrainingOptions::default()
                .with_tokenize(TokenizerKind::Standard)
                .with_shuffle()
                .with_shuffle_token()
                .with_tokenize_shuffle());
        let docs = collect(&Augmenter::with_seed(17), &spec);

        let variants: Vec<Variant> = docs.iter().take(4).map(|d| d.variant).collect();
        assert_eq!(variants, vec![Variant::Base, Variant::Token, Variant::Token, Variant::Shuffled]);
        assert_eq!(docs[0].text, "ab cd");
        assert_eq!(sorted_chars(&docs[1].text), sorted_chars("ab"));
        assert_eq!(sorted_chars(&docs[2].text), sorted_chars("cd"));
        assert_eq!(sorted_chars(&docs[3].text), sorted_chars("ab cd"));

        let shuffled_tokens: String = docs[4..].iter()
            .inspect(|d| assert_eq!(d.variant, Variant::ShuffledToken))
            .map(|d| d.text.as_str())
            .collect();
        assert_eq!(sorted_chars(&shuffled_tokens), sorted_chars("abcd"));
        assert!(docs.iter().all(|d| d.label == "t"));
    }

    #[test]
    fn test_seeded_sequences_restart_identically() {
        let spec = TrainingDocumentSpec::new(["shuffle me please"], ["t"])
            .with_options(TrainingOptions::default().with_shuffle());
        let augmenter = Augmenter::with_seed(99);
        assert_eq!(collect(&augmenter, &spec), collect(&augmenter, &spec));
    }

    #[test]
    fn test_source_values_are_not_mutated() {
        let spec = TrainingDocumentSpec::new(["keep me"], ["t"])
            .with_options(TrainingOptions::default().with_shuffle());
        let before = spec.clone();
        let _ = collect(&Augmenter::new(), &spec);
        assert_eq!(spec, before);
    }

    #[test]
    fn test_empty_values_yield_nothing() {
        let augmenter = Augmenter::new();
        assert!(collect(&augmenter, &TrainingDocumentSpec::new(Vec::<String>::new(), ["t"])).is_empty());
        assert!(collect(&augmenter, &TrainingDocumentSpec::new(["s"], Vec::<String>::new())).is_empty());
    }

    #[test]
    fn test_tokenizer_kind_is_fixed_on_first_use() {
        let augmenter = Augmenter::new();
        assert_eq!(augmenter.tokenizer_kind(), None);

        let aggressive = TrainingDocumentSpec::new(["Hello"], ["t"])
            .with_options(TrainingOptions::default().with_tokenize(TokenizerKind::Aggressive));
        let standard = TrainingDocumentSpec::new(["World"], ["t"])
            .with_options(TrainingOptions::default().with_tokenize(TokenizerKind::Standard));

        collect(&augmenter, &aggressive);
        let docs = collect(&augmenter, &standard);
        assert_eq!(augmenter.tokenizer_kind(), Some(TokenizerKind::Aggressive));
        assert_eq!(docs[1].text, "world");
    }
}
