//! Store configuration
//!
//! Versioned YAML file plus environment overrides:
//!
//! ```yaml
//! version: 1
//! storage_key: zecompadre-wkt
//! backend:
//!   kind: file        # memory | file | sqlite
//!   path: ./wkt-data
//! clipboard_marker: POLYGON
//! ```
//!
//! Environment variables `WKT_STORE_KEY`, `WKT_STORE_BACKEND` and `WKT_STORE_PATH` take
//! precedence over the file. Callers with their own override source (command-line flags)
//! merge it with the environment through [`Overrides::or`] and apply the result once, so
//! validation only ever sees the final combination.

pub mod error;

pub use error::{ConfigError, ConfigResult};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::KeyValueBackend;
use crate::infrastructure::{FileBackend, InMemoryBackend};

/// Default key the editor stores its records under
pub const DEFAULT_STORAGE_KEY: &str = "zecompadre-wkt";

/// Default clipboard marker
pub const DEFAULT_CLIPBOARD_MARKER: &str = "POLYGON";

pub const ENV_STORAGE_KEY: &str = "WKT_STORE_KEY";
pub const ENV_BACKEND: &str = "WKT_STORE_BACKEND";
pub const ENV_PATH: &str = "WKT_STORE_PATH";

const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// Backend selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    File,
    Sqlite,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::File => "file",
            BackendKind::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "file" => Ok(BackendKind::File),
            "sqlite" => Ok(BackendKind::Sqlite),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// Backend section of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    Memory,
    File { path: PathBuf },
    Sqlite { path: PathBuf },
}

impl BackendConfig {
    pub fn kind(&self) -> BackendKind {
        match self {
            BackendConfig::Memory => BackendKind::Memory,
            BackendConfig::File { .. } => BackendKind::File,
            BackendConfig::Sqlite { .. } => BackendKind::Sqlite,
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            BackendConfig::Memory => None,
            BackendConfig::File { path } | BackendConfig::Sqlite { path } => Some(path),
        }
    }
}

/// YAML schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFileV1 {
    version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backend: Option<BackendConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clipboard_marker: Option<String>,
}

/// Partial settings layered over a loaded config
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub storage_key: Option<String>,
    pub backend: Option<BackendKind>,
    pub path: Option<PathBuf>,
}

impl Overrides {
    /// Read `WKT_STORE_*` variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            storage_key: lookup(ENV_STORAGE_KEY),
            backend: lookup(ENV_BACKEND)
                .map(|s| s.parse::<BackendKind>())
                .transpose()?,
            path: lookup(ENV_PATH).map(PathBuf::from),
        })
    }

    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Field-wise merge; values set on `self` win
    pub fn or(self, fallback: Overrides) -> Overrides {
        Overrides {
            storage_key: self.storage_key.or(fallback.storage_key),
            backend: self.backend.or(fallback.backend),
            path: self.path.or(fallback.path),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key the record array is stored under
    pub storage_key: String,
    pub backend: BackendConfig,
    /// Substring pasted text must contain to be accepted
    pub clipboard_marker: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            backend: BackendConfig::Memory,
            clipboard_marker: DEFAULT_CLIPBOARD_MARKER.to_string(),
        }
    }
}

impl StoreConfig {
    /// Load from a YAML file (fields missing from the file keep their defaults)
    pub fn from_yaml(path: &str) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let mut config = Self::default();
        if let Some(key) = file.storage_key {
            config.storage_key = key;
        }
        if let Some(backend) = file.backend {
            config.backend = backend;
        }
        if let Some(marker) = file.clipboard_marker {
            config.clipboard_marker = marker;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            storage_key: Some(self.storage_key.clone()),
            backend: Some(self.backend.clone()),
            clipboard_marker: Some(self.clipboard_marker.clone()),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Apply `WKT_STORE_*` environment variables
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.apply(Overrides::from_env()?)
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides_from<F>(self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.apply(Overrides::from_lookup(lookup)?)
    }

    /// Layer `overrides` on top and validate the result
    pub fn apply(mut self, overrides: Overrides) -> ConfigResult<Self> {
        if let Some(key) = overrides.storage_key {
            self.storage_key = key;
        }
        self.set_backend(overrides.backend, overrides.path)?;
        self.validate()?;
        Ok(self)
    }

    /// Switch backend kind and/or path; a path alone retargets the current backend
    pub fn set_backend(
        &mut self,
        kind: Option<BackendKind>,
        path: Option<PathBuf>,
    ) -> ConfigResult<()> {
        let kind = kind.unwrap_or_else(|| self.backend.kind());
        let path = path.or_else(|| self.backend.path().cloned());
        self.backend = match (kind, path) {
            (BackendKind::Memory, _) => BackendConfig::Memory,
            (BackendKind::File, Some(path)) => BackendConfig::File { path },
            (BackendKind::Sqlite, Some(path)) => BackendConfig::Sqlite { path },
            (kind, None) => {
                return Err(ConfigError::Validation(format!(
                    "backend '{}' requires a path",
                    kind
                )))
            }
        };
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage_key must not be empty".to_string(),
            ));
        }
        if self.clipboard_marker.is_empty() {
            return Err(ConfigError::Validation(
                "clipboard_marker must not be empty".to_string(),
            ));
        }
        if let Some(path) = self.backend.path() {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "backend '{}' requires a path",
                    self.backend.kind()
                )));
            }
        }
        Ok(())
    }

    /// Build the configured backend
    pub fn open_backend(&self) -> crate::Result<Box<dyn KeyValueBackend>> {
        match &self.backend {
            BackendConfig::Memory => Ok(Box::new(InMemoryBackend::new())),
            BackendConfig::File { path } => Ok(Box::new(FileBackend::new(path)?)),
            #[cfg(feature = "sqlite")]
            BackendConfig::Sqlite { path } => {
                Ok(Box::new(crate::infrastructure::SqliteBackend::new(path)?))
            }
            #[cfg(not(feature = "sqlite"))]
            BackendConfig::Sqlite { .. } => Err(crate::StorageError::config(
                "built without the 'sqlite' feature",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // YAML Tests
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.storage_key, "zecompadre-wkt");
        assert_eq!(config.backend, BackendConfig::Memory);
        assert_eq!(config.clipboard_marker, "POLYGON");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_loading() {
        let yaml_content = r#"
version: 1
storage_key: my-shapes
backend:
  kind: sqlite
  path: /tmp/shapes.db
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();
        let path = temp_file.path().to_str().unwrap();

        let config = StoreConfig::from_yaml(path).unwrap();
        assert_eq!(config.storage_key, "my-shapes");
        assert_eq!(
            config.backend,
            BackendConfig::Sqlite {
                path: PathBuf::from("/tmp/shapes.db")
            }
        );
        assert_eq!(config.clipboard_marker, "POLYGON");
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = StoreConfig::default();
        config
            .set_backend(Some(BackendKind::File), Some(PathBuf::from("data")))
            .unwrap();

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("kind: file"));

        assert_eq!(StoreConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = StoreConfig::from_yaml_str("storage_key: abc\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result = StoreConfig::from_yaml_str("version: 2\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_unknown_field() {
        let result = StoreConfig::from_yaml_str("version: 1\nstorage_kee: typo\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_yaml_empty_key_rejected() {
        let result = StoreConfig::from_yaml_str("version: 1\nstorage_key: ''\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Override Tests
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_env_overrides() {
        let config = StoreConfig::default()
            .with_overrides_from(env(&[
                (ENV_STORAGE_KEY, "other-key"),
                (ENV_BACKEND, "file"),
                (ENV_PATH, "/var/lib/wkt"),
            ]))
            .unwrap();

        assert_eq!(config.storage_key, "other-key");
        assert_eq!(
            config.backend,
            BackendConfig::File {
                path: PathBuf::from("/var/lib/wkt")
            }
        );
    }

    #[test]
    fn test_env_path_only_retargets_current_backend() {
        let base = StoreConfig::from_yaml_str(
            "version: 1\nbackend:\n  kind: sqlite\n  path: a.db\n",
        )
        .unwrap();
        let config = base
            .with_overrides_from(env(&[(ENV_PATH, "b.db")]))
            .unwrap();
        assert_eq!(
            config.backend,
            BackendConfig::Sqlite {
                path: PathBuf::from("b.db")
            }
        );
    }

    #[test]
    fn test_env_backend_without_path_fails() {
        let result = StoreConfig::default().with_overrides_from(env(&[(ENV_BACKEND, "file")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_env_unknown_backend() {
        let result = StoreConfig::default().with_overrides_from(env(&[(ENV_BACKEND, "redis")]));
        assert!(matches!(result, Err(ConfigError::UnknownBackend(_))));
    }

    #[test]
    fn test_merged_overrides_validate_once() {
        // Backend from one source, path from another: neither is valid alone
        let flags = Overrides {
            path: Some(PathBuf::from("/srv/wkt")),
            ..Overrides::default()
        };
        let merged = flags.or(Overrides::from_lookup(env(&[(ENV_BACKEND, "file")])).unwrap());

        let config = StoreConfig::default().apply(merged).unwrap();
        assert_eq!(
            config.backend,
            BackendConfig::File {
                path: PathBuf::from("/srv/wkt")
            }
        );
    }

    #[test]
    fn test_overrides_or_prefers_self() {
        let flags = Overrides {
            storage_key: Some("flag".into()),
            backend: Some(BackendKind::Memory),
            path: None,
        };
        let envs = Overrides {
            storage_key: Some("env".into()),
            backend: Some(BackendKind::Sqlite),
            path: Some(PathBuf::from("x.db")),
        };
        let merged = flags.or(envs);
        assert_eq!(merged.storage_key.as_deref(), Some("flag"));
        assert_eq!(merged.backend, Some(BackendKind::Memory));
        assert_eq!(merged.path, Some(PathBuf::from("x.db")));

        let config = StoreConfig::default().apply(merged).unwrap();
        assert_eq!(config.storage_key, "flag");
        assert_eq!(config.backend, BackendConfig::Memory);
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("SQLite".parse::<BackendKind>().unwrap(), BackendKind::Sqlite);
        assert_eq!(" memory ".parse::<BackendKind>().unwrap(), BackendKind::Memory);
        assert!("s3".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_open_file_backend() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = StoreConfig::default();
        config
            .set_backend(Some(BackendKind::File), Some(dir.path().to_path_buf()))
            .unwrap();

        let backend = config.open_backend().unwrap();
        backend.save(&config.storage_key, "[]").unwrap();
        assert!(dir.path().join("zecompadre-wkt.json").exists());
    }
}
