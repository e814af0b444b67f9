//! Persistence backends for serialized classifiers.
//!
//! Both bindings speak the same [`PersistenceBackend`] contract and are chosen
//! through the closed [`Source`] enum.

mod blob;
mod file;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{NlpError, Result};

pub use blob::MemoryBlobStore;
pub use file::FileStore;

/// Where a classifier is loaded from or saved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "blob")]
    Blob,
    #[serde(rename = "fs")]
    FileSystem,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob => write!(f, "blob"),
            Self::FileSystem => write!(f, "fs"),
        }
    }
}

impl FromStr for Source {
    type Err = NlpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(Self::Blob),
            "fs" => Ok(Self::FileSystem),
            other => Err(NlpError::InvalidSource(other.to_string())),
        }
    }
}

/// Load and save of serialized classifiers keyed by name.
///
/// `load` must report a missing entry as [`NlpError::NotFound`] and reserve
/// [`NlpError::Io`] for real I/O failures, since the lifecycle manager only
/// creates new classifiers on absence.
#[async_trait]
pub trait PersistenceBackend: Send + Sync + fmt::Debug {
    async fn load(&self, name: &str) -> Result<String>;

    async fn save(&self, name: &str, payload: &str) -> Result<()>;
}

/// Rejects names that are empty or could escape a storage namespace.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(NlpError::InvalidOptions("Classifier name cannot be empty".into()));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(NlpError::InvalidOptions(format!("Invalid classifier name: {}", name)));
    }
    Ok(())
}
