//! Persistent library stores.
//!
//! Every operation works on the whole library: read everything, change it
//! in memory, write everything back.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use fs2::FileExt;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use super::entry::{Library, LibraryEntry};

/// Errors from a library store
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to lock library {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Library task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A persistent set of saved items keyed by id
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// All entries in saved order
    async fn entries(&self) -> Result<Vec<LibraryEntry>, LibraryError>;

    /// Insert an entry, replacing any entry with the same id
    ///
    /// Returns true if the id was not saved before.
    async fn add(&self, entry: LibraryEntry) -> Result<bool, LibraryError>;

    /// Remove the entry with this id; a missing id is a no-op
    ///
    /// Returns true if an entry was removed.
    async fn remove(&self, id: &str) -> Result<bool, LibraryError>;

    /// Whether an entry with this id is saved
    async fn contains(&self, id: &str) -> Result<bool, LibraryError> {
        Ok(self.entries().await?.iter().any(|e| e.id == id))
    }
}

/// Library persisted as a JSON array in a single file
///
/// Mutations hold an exclusive lock on `<file>.lock` for the whole
/// read-modify-write and replace the file by renaming a temp file over it.
#[derive(Debug, Clone)]
pub struct JsonLibraryStore {
    path: PathBuf,
}

/// Result of reading the library file
struct Loaded {
    library: Library,
    malformed: bool,
}

impl JsonLibraryStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the library file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        path.with_file_name(name)
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".bak");
        path.with_file_name(name)
    }

    fn open_lock(path: &Path) -> Result<File, LibraryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_path = Self::lock_path(path);
        Ok(OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)?)
    }

    fn lock_error(path: &Path, source: std::io::Error) -> LibraryError {
        LibraryError::Lock {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Read the library; a missing file is empty, a malformed one too
    fn read(path: &Path) -> Result<Loaded, LibraryError> {
        if !path.exists() {
            return Ok(Loaded {
                library: Library::new(),
                malformed: false,
            });
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Loaded {
                library: Library::new(),
                malformed: false,
            });
        }

        match serde_json::from_str::<Vec<LibraryEntry>>(&content) {
            Ok(entries) => Ok(Loaded {
                library: Library::from_entries(entries),
                malformed: false,
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Malformed library file, treating as empty");
                Ok(Loaded {
                    library: Library::new(),
                    malformed: true,
                })
            }
        }
    }

    /// Replace the library file atomically
    fn write(path: &Path, library: &Library) -> Result<(), LibraryError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut temp, library.entries())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;

        Ok(())
    }

    fn read_shared(path: &Path) -> Result<Library, LibraryError> {
        if !path.exists() {
            return Ok(Library::new());
        }

        let lock = Self::open_lock(path)?;
        lock.lock_shared().map_err(|e| Self::lock_error(path, e))?;
        let loaded = Self::read(path)?;
        // Lock is released when the file is dropped
        Ok(loaded.library)
    }

    fn modify_exclusive<F, R>(path: &Path, change: F) -> Result<R, LibraryError>
    where
        F: FnOnce(&mut Library) -> R,
    {
        let lock = Self::open_lock(path)?;
        lock.lock_exclusive().map_err(|e| Self::lock_error(path, e))?;

        let Loaded {
            mut library,
            malformed,
        } = Self::read(path)?;

        if malformed {
            let backup = Self::backup_path(path);
            fs::copy(path, &backup)?;
            warn!(backup = %backup.display(), "Kept a copy of the malformed library");
        }

        let result = change(&mut library);
        Self::write(path, &library)?;
        debug!(path = %path.display(), entries = library.len(), "Library saved");

        Ok(result)
    }

    /// Run a read-modify-write cycle off the async runtime
    async fn modify<F, R>(&self, change: F) -> Result<R, LibraryError>
    where
        F: FnOnce(&mut Library) -> R + Send + 'static,
        R: Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::modify_exclusive(&path, change)).await?
    }
}

#[async_trait]
impl LibraryStore for JsonLibraryStore {
    async fn entries(&self) -> Result<Vec<LibraryEntry>, LibraryError> {
        let path = self.path.clone();
        let library = tokio::task::spawn_blocking(move || Self::read_shared(&path)).await??;
        Ok(library.into_entries())
    }

    async fn add(&self, entry: LibraryEntry) -> Result<bool, LibraryError> {
        self.modify(move |library| library.upsert(entry)).await
    }

    async fn remove(&self, id: &str) -> Result<bool, LibraryError> {
        let id = id.to_string();
        self.modify(move |library| library.remove(&id)).await
    }
}

/// Library held in memory only
#[derive(Debug, Default)]
pub struct MemoryLibraryStore {
    library: Mutex<Library>,
}

impl MemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with entries
    pub fn with_entries(entries: Vec<LibraryEntry>) -> Self {
        Self {
            library: Mutex::new(Library::from_entries(entries)),
        }
    }

    fn with_library<R>(&self, f: impl FnOnce(&mut Library) -> R) -> R {
        let mut library = self
            .library
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut library)
    }
}

#[async_trait]
impl LibraryStore for MemoryLibraryStore {
    async fn entries(&self) -> Result<Vec<LibraryEntry>, LibraryError> {
        Ok(self.with_library(|library| library.entries().to_vec()))
    }

    async fn add(&self, entry: LibraryEntry) -> Result<bool, LibraryError> {
        Ok(self.with_library(|library| library.upsert(entry)))
    }

    async fn remove(&self, id: &str) -> Result<bool, LibraryError> {
        Ok(self.with_library(|library| library.remove(id)))
    }

    async fn contains(&self, id: &str) -> Result<bool, LibraryError> {
        Ok(self.with_library(|library| library.contains(id)))
    }
}
