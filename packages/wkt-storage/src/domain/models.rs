//! Geometry record model and content digest

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Record identifier (SHA-256 hex of the WKT, or caller supplied)
pub type RecordId = String;

/// One stored geometry
///
/// Serialized exactly as `{"id": "...", "wkt": "..."}`; the persisted value is a JSON array
/// of these.
///
/// # Examples
///
/// ```rust
/// use wkt_storage::domain::GeometryRecord;
///
/// let record = GeometryRecord::from_wkt("POINT(1 2)");
/// assert_eq!(record.id.len(), 64);
/// assert_eq!(record.wkt, "POINT(1 2)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryRecord {
    /// Content digest or caller-supplied id
    pub id: RecordId,
    /// Geometry in WKT, longitude/latitude
    pub wkt: String,
}

impl GeometryRecord {
    pub fn new(id: impl Into<String>, wkt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            wkt: wkt.into(),
        }
    }

    /// Build a content-addressed record (`id = compute_checksum(wkt)`)
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        let wkt = wkt.into();
        Self {
            id: compute_checksum(&wkt),
            wkt,
        }
    }
}

/// Compute SHA256 hash of content as lowercase hex
///
/// The empty string is returned unchanged without hashing, so an empty id never
/// collides with a real digest.
pub fn compute_checksum(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Clipboard heuristic: only text carrying the marker (e.g. `POLYGON`) is handed to the store
pub fn contains_marker(text: &str, marker: &str) -> bool {
    !marker.is_empty() && text.contains(marker)
}
