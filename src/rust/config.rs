use std::env;
use std::path::PathBuf;

use log;

/// Environment variable overriding the directory classifiers are stored in
pub const HOME_ENV: &str = "CLASSIFIER_HUB_HOME";
/// Environment variable fixing the shuffle seed for reproducible training
pub const SEED_ENV: &str = "CLASSIFIER_HUB_SHUFFLE_SEED";

/// Settings shared by the lifecycle manager, the trainer and the preprocessor.
#[derive(Debug, Clone)]
pub struct NlpConfig {
    /// Directory used by the file store (`${name}.json` per classifier)
    pub classifier_dir: PathBuf,
    /// Seed for character shuffles. `None` draws a fresh seed from the OS.
    pub shuffle_seed: Option<u64>,
    /// Whether the preprocessor should construct a POS tagger
    pub pos_tag: bool,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            classifier_dir: default_classifier_dir(),
            shuffle_seed: None,
            pos_tag: false,
        }
    }
}

impl NlpConfig {
    /// Builds a config from the defaults, then applies environment overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var(SEED_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.shuffle_seed = Some(seed),
                Err(e) => log::warn!("Ignoring {}={:?}: {}", SEED_ENV, raw, e),
            }
        }
        config
    }

    pub fn with_classifier_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.classifier_dir = dir.into();
        self
    }

    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    pub fn with_pos_tagging(mut self, enabled: bool) -> Self {
        self.pos_tag = enabled;
        self
    }
}

/// Returns the default directory for file-backed classifiers: under
/// `$CLASSIFIER_HUB_HOME` when set, otherwise under the platform cache
/// directory, `~/.cache` or the system temp directory, whichever exists first.
pub fn default_classifier_dir() -> PathBuf {
    if let Ok(home) = env::var(HOME_ENV) {
        return PathBuf::from(home).join("classifiers");
    }

    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
        .unwrap_or_else(env::temp_dir)
        .join("classifier-hub")
        .join("classifiers")
}
