//! GeometryStore
//!
//! Ordered, content-deduplicated list of WKT records, flushed to a key-value backend after
//! every mutation. The store is built once per session and handed to whatever drives it;
//! mutations take `&mut self`, so callers cannot interleave them.

use geo::{Geometry, Rect};
use tracing::{debug, warn};

use crate::domain::{compute_checksum, contains_marker, GeometryRecord, KeyValueBackend};
use crate::geometry;
use crate::Result;

pub struct GeometryStore<B: KeyValueBackend> {
    backend: B,
    key: String,
    records: Vec<GeometryRecord>,
}

impl<B: KeyValueBackend> GeometryStore<B> {
    /// Create an empty store bound to `key`; nothing is read until `load`
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            records: Vec::new(),
        }
    }

    /// Create a store and load its records
    pub fn open(backend: B, key: impl Into<String>) -> Self {
        let mut store = Self::new(backend, key);
        store.load();
        store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replace in-memory records with the persisted ones
    ///
    /// A missing key, a backend read failure and unparsable data all yield an empty
    /// sequence; the last two are logged.
    pub fn load(&mut self) -> &[GeometryRecord] {
        self.records = match self.backend.load(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<GeometryRecord>>(&raw) {
                Ok(records) => records,
                Err(e) => {
                    warn!(key = %self.key, error = %e, "stored records are malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read stored records, starting empty");
                Vec::new()
            }
        };
        debug!(key = %self.key, count = self.records.len(), "records loaded");
        &self.records
    }

    pub fn get(&self) -> &[GeometryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        !id.is_empty() && self.records.iter().any(|r| r.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&GeometryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Append `wkt` under its content digest unless it is empty or already stored
    pub fn add(&mut self, wkt: &str) -> Result<&[GeometryRecord]> {
        let checksum = compute_checksum(wkt);
        if !wkt.is_empty() && !self.contains(&checksum) {
            debug!(id = %checksum, "record added");
            self.records.push(GeometryRecord::new(checksum, wkt));
        }
        self.save()?;
        Ok(&self.records)
    }

    /// Append with a caller-supplied id; empty id/wkt or an existing id is a no-op
    ///
    /// Returns whether a record was appended.
    pub fn insert(&mut self, id: &str, wkt: &str) -> Result<bool> {
        let inserted = !id.is_empty() && !wkt.is_empty() && !self.contains(id);
        if inserted {
            self.records.push(GeometryRecord::new(id, wkt));
        }
        self.save()?;
        Ok(inserted)
    }

    /// Clipboard path: add `text` only when it carries `marker`
    ///
    /// Returns whether the record count grew.
    pub fn ingest_pasted(&mut self, text: &str, marker: &str) -> Result<bool> {
        if !contains_marker(text, marker) {
            debug!(marker, "pasted text ignored");
            return Ok(false);
        }
        let before = self.records.len();
        self.add(text)?;
        Ok(self.records.len() > before)
    }

    /// Replace the wkt of record `id` in place; unknown ids are ignored
    pub fn update(&mut self, id: &str, wkt: &str) -> Result<()> {
        self.replace_wkt(id, wkt);
        self.save()
    }

    /// Like `update`, but an unknown id is an error
    pub fn try_update(&mut self, id: &str, wkt: &str) -> Result<()> {
        let found = self.replace_wkt(id, wkt);
        self.save()?;
        if found {
            Ok(())
        } else {
            Err(crate::StorageError::record_not_found(id))
        }
    }

    fn replace_wkt(&mut self, id: &str, wkt: &str) -> bool {
        let mut found = false;
        for record in self.records.iter_mut().filter(|r| r.id == id) {
            record.wkt = wkt.to_string();
            found = true;
        }
        found
    }

    /// Drop every record with `id`
    pub fn remove(&mut self, id: &str) -> Result<()> {
        self.remove_matching(id);
        self.save()
    }

    /// Like `remove`, but an unknown id is an error
    pub fn try_remove(&mut self, id: &str) -> Result<()> {
        let removed = self.remove_matching(id);
        self.save()?;
        if removed > 0 {
            Ok(())
        } else {
            Err(crate::StorageError::record_not_found(id))
        }
    }

    fn remove_matching(&mut self, id: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        before - self.records.len()
    }

    /// Drop every record and delete the key; a reopen then starts from an absent key
    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.backend.delete(&self.key)?;
        debug!(key = %self.key(), "records cleared");
        Ok(())
    }

    /// Write the current sequence under the store key
    pub fn save(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.records)?;
        self.backend.save(&self.key, &raw)?;
        debug!(key = %self.key, count = self.records.len(), "records saved");
        Ok(())
    }

    /// Polygon merge of the current records
    pub fn merged(&self) -> Option<Geometry<f64>> {
        geometry::merge_records(&self.records)
    }

    /// WKT of the merged polygons (the text-area mirror)
    pub fn merged_wkt(&self) -> Option<String> {
        geometry::merged_wkt(&self.records)
    }

    /// Bounding rectangle of every record
    pub fn extent(&self) -> Option<Rect<f64>> {
        geometry::extent(&self.records)
    }
}
