//! Storage Port (Trait Interface)
//!
//! The editor persists everything under one string key, so the port is a plain
//! synchronous string key-value store.

use crate::Result;

/// Key-value persistence backend
///
/// All backends must implement this trait. Reads of a missing key return `Ok(None)`.
pub trait KeyValueBackend: Send + Sync {
    /// Write `value` under `key`, replacing any previous value
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Read the value under `key`
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Delete `key` (no error if absent)
    fn delete(&self, key: &str) -> Result<()>;
}

impl<B: KeyValueBackend + ?Sized> KeyValueBackend for Box<B> {
    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}
