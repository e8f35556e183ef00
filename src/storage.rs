use std::{
    collections::HashMap,
    future::Future,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tokio::fs;

/// Keyed blob storage. Each key holds one serialized unit that is always
/// read and written whole.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> impl Future<Output = io::Result<Option<Vec<u8>>>> + Send;

    fn write(&self, key: &str, payload: &[u8]) -> impl Future<Output = io::Result<()>> + Send;
}

/// Stores each key as `<dir>/<key>.json`. Writes land in a sibling temp file
/// first and are renamed into place, so a reader sees either the old blob or
/// the new one.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub async fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    async fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn write(&self, key: &str, payload: &[u8]) -> io::Result<()> {
        let path = self.path_for(key);
        let staging = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&staging, payload).await?;
        fs::rename(&staging, &path).await
    }
}

/// In-memory backend, used where nothing should touch the disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(key: &str, payload: impl Into<Vec<u8>>) -> Self {
        let storage = Self::default();
        storage.put(key, payload.into());
        storage
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    fn put(&self, key: &str, payload: Vec<u8>) {
        self.lock().insert(key.to_string(), payload);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map is still a valid map.
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, payload: &[u8]) -> io::Result<()> {
        self.put(key, payload.to_vec());
        Ok(())
    }
}
