//! Session storage in a small JSON object file.
//!
//! The whole file is the key/value map; `clear` deletes it.

use crate::errors::StorageError;
use crate::ports::SessionStorage;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

type Entries = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Entries, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| StorageError::Corrupted(format!("{}: {e}", self.path.display())))
    }

    async fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Corrupted(e.to_string()))?;
        fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), blob.to_string());
        self.write_entries(&entries).await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "session file removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("envirosage-storage-{}-{name}", std::process::id()))
            .join("session.json")
    }

    #[tokio::test]
    async fn set_get_clear() {
        let storage = FileSessionStorage::new(temp_path("roundtrip"));
        assert_eq!(storage.get("user").await.unwrap(), None);

        storage.set("user", "{\"uid\":\"u1\"}").await.unwrap();
        storage.set("theme", "dark").await.unwrap();
        assert_eq!(
            storage.get("user").await.unwrap().as_deref(),
            Some("{\"uid\":\"u1\"}")
        );

        storage.clear().await.unwrap();
        assert!(!storage.path().exists());
        assert_eq!(storage.get("theme").await.unwrap(), None);
        storage.clear().await.unwrap();
    }

    #[tokio::test]
    async fn garbage_file_is_reported() {
        let path = temp_path("garbage");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let storage = FileSessionStorage::new(&path);
        assert!(matches!(
            storage.get("user").await,
            Err(StorageError::Corrupted(_))
        ));
        storage.clear().await.unwrap();
    }
}
