//! wkt-storage - Local persistence for map-editor geometries
//!
//! Geometries drawn or pasted in the editor are kept as WKT records (`{id, wkt}`) under one
//! fixed key of a key-value store, deduplicated by the SHA-256 of their text.
//!
//! ## Layers
//!
//! ```text
//! bin/wkt-store (command dispatch)
//!           ↓
//! application/ (GeometryStore)
//!           ↓
//! domain/ (GeometryRecord, KeyValueBackend port)     geometry/ (merge, extent, parse)
//!           ↓
//! infrastructure/ (memory, file, SQLite)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use wkt_storage::{GeometryStore, InMemoryBackend};
//!
//! let mut store = GeometryStore::open(InMemoryBackend::new(), "zecompadre-wkt");
//! store.add("POLYGON((0 0,0 1,1 1,1 0,0 0))")?;
//! store.add("POLYGON((0 0,0 1,1 1,1 0,0 0))")?; // deduplicated
//! assert_eq!(store.get().len(), 1);
//!
//! let id = store.get()[0].id.clone();
//! store.update(&id, "POLYGON((0 0,0 2,2 2,2 0,0 0))")?;
//! assert!(store.merged_wkt().unwrap().starts_with("POLYGON"));
//!
//! store.remove(&id)?;
//! assert!(store.get().is_empty());
//! # Ok::<(), wkt_storage::StorageError>(())
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod infrastructure;

pub use error::{ErrorKind, Result, StorageError};

pub use application::GeometryStore;
pub use config::{BackendConfig, BackendKind, Overrides, StoreConfig};
pub use domain::{compute_checksum, GeometryRecord, KeyValueBackend};
pub use infrastructure::{FileBackend, InMemoryBackend};

#[cfg(feature = "sqlite")]
pub use infrastructure::SqliteBackend;
