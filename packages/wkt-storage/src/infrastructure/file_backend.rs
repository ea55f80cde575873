//! File Backend
//!
//! One `<key>.json` file per key inside a directory. Writes go through a temp file in the
//! same directory and are renamed into place, so a crash never leaves a half-written value.
use std::fs;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::ports::KeyValueBackend;
use crate::{Result, StorageError};

#[derive(Clone, Debug)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Open (and create if needed) a backend rooted at `dir`
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let stem = file_stem(key)?;
        Ok(self.root.join(format!("{}.json", stem)))
    }
}

/// The key itself is the file stem, so distinct keys never share a file. Only ASCII
/// alphanumerics, `-`, `_` and `.` are accepted; all-dot keys would escape the root.
fn file_stem(key: &str) -> Result<&str> {
    if key.is_empty() {
        return Err(StorageError::backend("Empty storage key"));
    }
    let portable = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !portable || key.chars().all(|c| c == '.') {
        return Err(StorageError::backend(format!(
            "Invalid storage key '{}': use ASCII letters, digits, '-', '_' or '.'",
            key
        )));
    }
    Ok(key)
}

impl KeyValueBackend for FileBackend {
    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| {
            StorageError::backend(format!("Failed to persist {}", path.display()))
                .with_source(e.error)
        })?;
        debug!(key, bytes = value.len(), "file backend saved");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
