//! File-backed [`KeyValueStore`]: one JSON object mapping keys to string values.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use fyndd_core::state::KeyValueStore;
use fyndd_core::{FynddError, Result};

use super::atomic_file::{AtomicFileError, FileLock, read_if_present, write_atomic};

type Entries = BTreeMap<String, String>;

/// Persists client state in a single JSON file.
///
/// Every mutation is a locked read-modify-write, so several client processes
/// can share one file. Blocking file I/O runs on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Arc<PathBuf>,
    /// Serialises writers within this process before the file lock is taken.
    write_guard: Arc<Mutex<()>>,
}

impl JsonFileStore {
    /// Opens (or prepares to create) the store at `path`.
    ///
    /// Fails when the file exists but cannot be read as a JSON object, so the
    /// caller can fall back to an in-memory store instead of clobbering it.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let existing = path.clone();
        run_blocking(move || load_entries(&existing).map(|_| ())).await?;
        tracing::debug!("[JsonFileStore] Opened {}", path.display());
        Ok(Self {
            path: Arc::new(path),
            write_guard: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Entries) -> bool + Send + 'static,
    {
        let _guard = self.write_guard.lock().await;
        let path = self.path.clone();
        run_blocking(move || {
            let _lock = FileLock::acquire(&path)?;
            let mut entries = load_entries(&path)?;
            if f(&mut entries) {
                let encoded = serde_json::to_vec_pretty(&entries)?;
                write_atomic(&path, &encoded)?;
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path.clone();
        let key = key.to_string();
        run_blocking(move || Ok(load_entries(&path)?.remove(&key))).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.update(move |entries| {
            if entries.get(&key) == Some(&value) {
                return false;
            }
            entries.insert(key, value);
            true
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.update(move |entries| entries.remove(&key).is_some()).await
    }
}

fn load_entries(path: &Path) -> std::result::Result<Entries, AtomicFileError> {
    match read_if_present(path)? {
        Some(content) => Ok(serde_json::from_str(&content)?),
        None => Ok(Entries::new()),
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> std::result::Result<T, AtomicFileError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| FynddError::internal(format!("storage task failed: {}", e)))?
        .map_err(FynddError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp_dir.path().join("state.json"))
            .await
            .unwrap();

        store.set("authToken", "\"abc\"".to_string()).await.unwrap();
        assert_eq!(
            store.get("authToken").await.unwrap(),
            Some("\"abc\"".to_string())
        );

        store.remove("authToken").await.unwrap();
        assert_eq!(store.get("authToken").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        {
            let store = JsonFileStore::open(&path).await.unwrap();
            store
                .set("pendingFriendRequests", "[\"u1\"]".to_string())
                .await
                .unwrap();
        }

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("pendingFriendRequests").await.unwrap(),
            Some("[\"u1\"]".to_string())
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_to_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, FynddError::Storage(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_keep_every_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp_dir.path().join("state.json"))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.set(&format!("key{}", i), i.to_string()).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..8 {
            assert_eq!(
                store.get(&format!("key{}", i)).await.unwrap(),
                Some(i.to_string())
            );
        }
    }
}
