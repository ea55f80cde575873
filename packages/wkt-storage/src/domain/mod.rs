//! Domain layer
//!
//! - `GeometryRecord`: one stored geometry (`{id, wkt}`)
//! - `KeyValueBackend`: port for the durable key-value store
//!
//! Port/Adapter pattern for backend flexibility:
//! - Testing: InMemory
//! - Local editing: JSON file directory
//! - Embedded: SQLite

pub mod models;
pub mod ports;

pub use models::{compute_checksum, contains_marker, GeometryRecord, RecordId};
pub use ports::KeyValueBackend;
