use std::path::Path;

use async_trait::async_trait;
use log;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::Result;

/// A named list of stop words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopWordList {
    pub id: String,
    pub values: Vec<String>,
}

impl StopWordList {
    pub fn new(id: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Cache-backed key-value store holding stop word lists.
#[async_trait]
pub trait StopwordStore: Send + Sync + std::fmt::Debug {
    async fn get_all(&self) -> Result<Vec<StopWordList>>;

    async fn update(&self, list_id: &str, values: Vec<String>) -> Result<()>;
}

/// In-process store; lists keep their insertion order.
#[derive(Debug, Default)]
pub struct MemoryStopwordStore {
    lists: RwLock<Vec<StopWordList>>,
}

impl MemoryStopwordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lists(lists: Vec<StopWordList>) -> Self {
        Self { lists: RwLock::new(lists) }
    }
}

#[async_trait]
impl StopwordStore for MemoryStopwordStore {
    async fn get_all(&self) -> Result<Vec<StopWordList>> {
        Ok(self.lists.read().await.clone())
    }

    async fn update(&self, list_id: &str, values: Vec<String>) -> Result<()> {
        let mut lists = self.lists.write().await;
        match lists.iter_mut().find(|list| list.id == list_id) {
            Some(list) => list.values = values,
            None => lists.push(StopWordList { id: list_id.to_string(), values }),
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct StopWordRow {
    id: String,
    values: String,
}

/// Reads stop word lists from a headered CSV file with `id` and `values`
/// columns; values are separated by `|`.
///
/// ```csv
/// id,values
/// english,the|a|an
/// ```
pub fn read_stop_word_csv<P: AsRef<Path>>(path: P) -> Result<Vec<StopWordList>> {
    let path = path.as_ref();
    log::debug!("Reading stop word CSV {:?}", path);
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;

    let mut lists = Vec::new();
    for row in reader.deserialize::<StopWordRow>() {
        let row = row?;
        let values = row.values
            .split('|')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        lists.push(StopWordList { id: row.id, values });
    }
    Ok(lists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_update_replaces_or_appends() -> Result<()> {
        let store = MemoryStopwordStore::with_lists(vec![StopWordList::new("en", ["the"])]);
        store.update("en", vec!["a".into(), "an".into()]).await?;
        store.update("de", vec!["der".into()]).await?;

        let lists = store.get_all().await?;
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0], StopWordList::new("en", ["a", "an"]));
        assert_eq!(lists[1].id, "de");
        Ok(())
    }

    #[test]
    fn test_read_stop_word_csv() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "id,values")?;
        writeln!(file, "english, the | a |an")?;
        writeln!(file, "empty,")?;
        file.flush()?;

        let lists = read_stop_word_csv(file.path())?;
        assert_eq!(lists, vec![
            StopWordList::new("english", ["the", "a", "an"]),
            StopWordList::new("empty", Vec::<String>::new()),
        ]);
        Ok(())
    }

    #[test]
    fn test_missing_csv_is_an_error() {
        assert!(read_stop_word_csv("/nonexistent/stop-words.csv").is_err());
    }
}
