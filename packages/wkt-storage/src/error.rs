//! Error types for wkt-storage

use std::fmt;
use thiserror::Error;

/// Storage error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Key-value backend errors (SQLite, file store)
    Backend,
    /// Serialization/deserialization errors
    Serialization,
    /// Record id not present in the store
    RecordNotFound,
    /// Empty or unparsable WKT
    Geometry,
    /// Configuration errors
    Config,
    /// I/O errors
    IO,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Backend => "backend",
            ErrorKind::Serialization => "serialization",
            ErrorKind::RecordNotFound => "record_not_found",
            ErrorKind::Geometry => "geometry",
            ErrorKind::Config => "config",
            ErrorKind::IO => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct StorageError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl StorageError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Backend, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    pub fn record_not_found(id: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::RecordNotFound,
            format!("Record not found: {}", id.into()),
        )
    }

    pub fn geometry(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Geometry, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::RecordNotFound
    }
}

// SQLite error conversions
#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::backend(format!("SQLite error: {}", err)).with_source(err)
    }
}

// JSON error conversions
impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::serialization(format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::new(ErrorKind::IO, format!("I/O error: {}", err)).with_source(err)
    }
}

impl From<crate::config::ConfigError> for StorageError {
    fn from(err: crate::config::ConfigError) -> Self {
        StorageError::config(err.to_string()).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    // ═══════════════════════════════════════════════════════════════════════
    // Error Construction Tests
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_error_display() {
        let err = StorageError::record_not_found("9f86d081");
        let msg = format!("{}", err);
        assert!(msg.contains("record_not_found"));
        assert!(msg.contains("9f86d081"));
    }

    #[test]
    fn test_backend_error() {
        let err = StorageError::backend("Quota exceeded");
        assert_eq!(err.kind, ErrorKind::Backend);
        assert_eq!(err.message, "Quota exceeded");
        assert!(err.source.is_none());

        assert_eq!(format!("{}", err), "[backend] Quota exceeded");
    }

    #[test]
    fn test_geometry_error() {
        let err = StorageError::geometry("Empty WKT");
        assert_eq!(err.kind, ErrorKind::Geometry);
        assert_eq!(format!("{}", err), "[geometry] Empty WKT");
    }

    #[test]
    fn test_is_not_found() {
        assert!(StorageError::record_not_found("x").is_not_found());
        assert!(!StorageError::backend("x").is_not_found());
    }

    #[test]
    fn test_with_source() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let err = StorageError::backend("Write failed").with_source(io_err);

        assert!(err.source.is_some());
        let source = err.source().unwrap();
        assert!(source.to_string().contains("read-only"));
    }

    #[test]
    fn test_error_kind_as_str() {
        assert_eq!(ErrorKind::Backend.as_str(), "backend");
        assert_eq!(ErrorKind::Serialization.as_str(), "serialization");
        assert_eq!(ErrorKind::RecordNotFound.as_str(), "record_not_found");
        assert_eq!(ErrorKind::Geometry.as_str(), "geometry");
        assert_eq!(ErrorKind::Config.as_str(), "config");
        assert_eq!(ErrorKind::IO.as_str(), "io");
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Conversion Tests
    // ═══════════════════════════════════════════════════════════════════════

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_from_rusqlite_error() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(err.kind, ErrorKind::Backend);
        assert!(err.message.contains("SQLite error"));
        assert!(err.source.is_some());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("[{")
            .err()
            .unwrap();
        let err: StorageError = json_err.into();

        assert_eq!(err.kind, ErrorKind::Serialization);
        assert!(err.message.contains("JSON error"));
    }

    #[test]
    fn test_from_io_error() {
        let err: StorageError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(err.kind, ErrorKind::IO);
        assert!(err.message.contains("disk full"));
    }

    #[test]
    fn test_result_propagation() {
        fn inner() -> Result<()> {
            Err(StorageError::record_not_found("abc"))
        }

        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert_eq!(err.kind, ErrorKind::RecordNotFound);
    }
}
