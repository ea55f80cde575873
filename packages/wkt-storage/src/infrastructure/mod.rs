//! Infrastructure layer - Storage adapters

pub mod file_backend;
pub mod memory_backend;

#[cfg(feature = "sqlite")]
pub mod sqlite_backend;

pub use file_backend::FileBackend;
pub use memory_backend::InMemoryBackend;

#[cfg(feature = "sqlite")]
pub use sqlite_backend::SqliteBackend;
