// runtime configuration, read from a TOON file
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::catalog::{CatalogError, SeedCatalog};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Catalog file; the bundled sample catalog when unset.
    pub catalog_path: Option<PathBuf>,
    /// Maximum stored history entries per session, unbounded when unset.
    pub history_limit: Option<usize>,
    /// `tracing_subscriber::EnvFilter` directive, `RUST_LOG` wins over it.
    pub log_filter: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            catalog_path: None,
            history_limit: None,
            log_filter: "info".to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn from_toon(input: &str) -> Result<Self, ConfigError> {
        toon_format::decode_default(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toon(&text)
    }

    pub fn load_catalog(&self) -> Result<Arc<SeedCatalog>, CatalogError> {
        let catalog = match &self.catalog_path {
            Some(path) => SeedCatalog::load(path)?,
            None => SeedCatalog::sample()?,
        };
        Ok(Arc::new(catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_sample_catalog_and_info_logging() {
        let cfg = ResolverConfig::default();
        assert!(cfg.catalog_path.is_none());
        assert!(cfg.history_limit.is_none());
        assert_eq!(cfg.log_filter, "info");
        assert!(cfg.load_catalog().is_ok());
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let cfg = ResolverConfig::from_toon("history_limit: 50\n").unwrap();
        assert_eq!(cfg.history_limit, Some(50));
        assert_eq!(cfg.log_filter, "info");
        assert!(cfg.catalog_path.is_none());
    }

    #[test]
    fn missing_catalog_file_is_fatal() {
        let cfg = ResolverConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/catalog.toon")),
            ..ResolverConfig::default()
        };
        assert!(matches!(cfg.load_catalog(), Err(CatalogError::Io { .. })));
    }
}
