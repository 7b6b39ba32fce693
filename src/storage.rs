// Durable blob storage for the task collection

use eyre::{Context, Result};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Synchronous named-text-blob storage.
///
/// The store reads its blob exactly once at startup and overwrites it after
/// every observable mutation. Implementations must make `save` replace the
/// prior value atomically enough that a subsequent `load` sees one complete
/// blob, never a torn one.
pub trait Storage {
    /// Read the blob under `key`. `Ok(None)` when no blob has been saved yet.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the blob under `key`.
    fn save(&mut self, key: &str, blob: &str) -> Result<()>;
}

/// File-backed storage: one `<key>.json` file per key inside a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at the given directory. The directory is created on
    /// the first save.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Default per-user data directory, falling back to the current
    /// directory when the platform reports none.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskpad")
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let blob = fs::read_to_string(&path).context("Failed to read blob file")?;
        debug!(path = ?path, bytes = blob.len(), "Loaded blob");
        Ok(Some(blob))
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).context("Failed to create storage directory")?;

        let path = self.blob_path(key);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .context("Failed to open blob file for writing")?;

        // Exclusive lock while overwriting; released when the file drops
        file.lock_exclusive().context("Failed to acquire file lock")?;

        file.write_all(blob.as_bytes())?;
        file.sync_all()?;

        debug!(path = ?path, bytes = blob.len(), "Saved blob");
        Ok(())
    }
}

/// In-memory storage for tests and embedding.
#[derive(Default)]
pub struct MemoryStorage {
    blobs: HashMap<String, String>,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob before the store opens.
    pub fn with_blob(key: &str, blob: &str) -> Self {
        let mut storage = Self::default();
        storage.blobs.insert(key.to_string(), blob.to_string());
        storage
    }

    /// Number of `save` calls observed. Lets tests assert that no-op
    /// mutations perform no write.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Current blob contents, if any.
    pub fn blob(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<()> {
        self.saves += 1;
        self.blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
