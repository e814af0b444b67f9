use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log;
use sha2::{Digest, Sha256};
use tokio::fs;

use super::{validate_name, PersistenceBackend};
use crate::error::{NlpError, Result};

/// Stores each classifier as `${name}.json` inside one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// Where a payload is written and verified before it replaces `path_for(name)`.
    fn staging_path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json.partial", name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }

    /// Deletes a stored classifier. Missing files are not an error.
    pub async fn remove(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        match fs::remove_file(self.path_for(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn verify_file(&self, path: &Path, expected_hash: &str) -> Result<bool> {
        let bytes = fs::read(path).await?;
        let hash = digest(&bytes);
        log::debug!("Verifying {:?}: calculated {} expected {}", path, hash, expected_hash);
        Ok(hash == expected_hash)
    }

    async fn stage_and_commit(&self, staging: &Path, path: &Path, payload: &str, expected_hash: &str) -> Result<()> {
        fs::write(staging, payload).await?;
        if !self.verify_file(staging, expected_hash).await? {
            return Err(NlpError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Verification failed after writing {:?}", staging),
            )));
        }
        fs::rename(staging, path).await?;
        Ok(())
    }
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl PersistenceBackend for FileStore {
    async fn load(&self, name: &str) -> Result<String> {
        validate_name(name)?;
        let path = self.path_for(name);
        log::debug!("Loading classifier {} from {:?}", name, path);
        match fs::read_to_string(&path).await {
            Ok(payload) => Ok(payload),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(NlpError::NotFound(name.to_string())),
            Err(e) => {
                log::error!("Failed to read {:?}: {}", path, e);
                Err(e.into())
            }
        }
    }

    async fn save(&self, name: &str, payload: &str) -> Result<()> {
        validate_name(name)?;
        let path = self.path_for(name);
        let expected_hash = digest(payload.as_bytes());

        if path.exists() && self.verify_file(&path, &expected_hash).await? {
            log::debug!("Classifier {} unchanged at {:?}, skipping write", name, path);
            return Ok(());
        }

        log::info!("Writing {} bytes to {:?}", payload.len(), path);
        let staging = self.staging_path_for(name);
        if let Err(e) = self.stage_and_commit(&staging, &path, payload, &expected_hash).await {
            log::error!("Failed to save classifier {} to {:?}: {}", name, path, e);
            let _ = fs::remove_file(&staging).await;
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_not_found() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path())?;
        assert!(store.load("intents").await.unwrap_err().is_not_found());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_uses_json_suffix() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path())?;
        store.save("intents", "{\"a\":1}").await?;
        assert!(dir.path().join("intents.json").exists());
        assert_eq!(store.load("intents").await?, "{\"a\":1}");
        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_save_is_byte_identical() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path())?;
        store.save("intents", "payload").await?;
        let first = std::fs::read(store.path_for("intents"))?;
        store.save("intents", "payload").await?;
        let second = std::fs::read(store.path_for("intents"))?;
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_directory_in_place_of_file_is_io_error() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path())?;
        std::fs::create_dir(store.path_for("intents"))?;
        let err = store.load("intents").await.unwrap_err();
        assert!(matches!(err, NlpError::Io(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_remove() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path())?;
        store.save("intents", "x").await?;
        store.remove("intents").await?;
        assert!(!store.exists("intents"));
        store.remove("intents").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_successful_save_leaves_no_staging_file() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path())?;
        store.save("intents", "v1").await?;
        store.save("intents", "v2").await?;
        assert_eq!(store.load("intents").await?, "v2");
        assert!(!store.staging_path_for("intents").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_payload() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path())?;
        store.save("intents", "v1").await?;

        std::fs::create_dir(store.staging_path_for("intents"))?;
        let err = store.save("intents", "v2").await.unwrap_err();
        assert!(matches!(err, NlpError::Io(_)));
        assert_eq!(store.load("intents").await?, "v1");
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_first_save_stays_not_found() -> Result<()> {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path())?;

        std::fs::create_dir(store.staging_path_for("intents"))?;
        assert!(store.save("intents", "v1").await.is_err());
        assert!(!store.exists("intents"));
        assert!(store.load("intents").await.unwrap_err().is_not_found());
        Ok(())
    }
}
