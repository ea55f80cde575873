//! In-Memory Backend
//!
//! HashMap-based implementation for unit tests and throwaway sessions.
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::ports::KeyValueBackend;
use crate::{Result, StorageError};

#[derive(Clone, Debug, Default)]
pub struct InMemoryBackend {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with one value (handy for corrupt-storage tests)
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let backend = Self::new();
        if let Ok(mut entries) = backend.entries.write() {
            entries.insert(key.into(), value.into());
        }
        backend
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StorageError {
    StorageError::backend("in-memory backend lock poisoned")
}

impl KeyValueBackend for InMemoryBackend {
    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().map_err(|_| poisoned())?.get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}
