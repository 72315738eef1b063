//! Local persistence: the whole record collection as one JSON blob.
//!
//! Layout: `{dir}/{STORAGE_KEY}.json`. There is no schema version and no
//! migration; the file is exactly the serialized `Vec<StoredRecord>`.
//! Writes are atomic (write to .tmp, rename into place).

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use metaltrack_core::StoredRecord;

/// Fixed key the collection is stored under.
pub const STORAGE_KEY: &str = "metaltrack-records";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("local store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt local store {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize records: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the JSON blob: `{dir}/{STORAGE_KEY}.json`
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{STORAGE_KEY}.json"))
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Load the stored collection. `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<Vec<StoredRecord>>, PersistError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no local store yet");
                return Ok(None);
            }
            Err(source) => return Err(PersistError::Io { path, source }),
        };
        let records = serde_json::from_str(&content)
            .map_err(|source| PersistError::Corrupt { path, source })?;
        Ok(Some(records))
    }

    /// Overwrite the stored collection.
    pub fn save(&self, records: &[StoredRecord]) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(|source| PersistError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let json = serde_json::to_string(records).map_err(PersistError::Serialize)?;
        let path = self.path();
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, json).map_err(|source| PersistError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            PersistError::Io {
                path: path.clone(),
                source,
            }
        })?;

        info!(path = %path.display(), records = records.len(), "saved local store");
        Ok(())
    }

    /// Remove the stored collection. Missing file is not an error.
    pub fn clear(&self) -> Result<(), PersistError> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistError::Io { path, source }),
        }
    }
}
