//! Service configuration loaded from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::search::DistanceMetric;
use crate::store::PoiStore;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
    /// Upper bound on a single store call
    pub query_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
            query_timeout_ms: 5_000,
        }
    }
}

impl ServerConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Temporary store when unset
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Open the configured store
    pub fn open(&self) -> crate::Result<PoiStore> {
        match &self.path {
            Some(path) => PoiStore::open(path),
            None => {
                warn!("No store path configured, records will not survive a restart");
                PoiStore::temporary()
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SearchConfig {
    pub metric: DistanceMetric,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub radius_ttl_secs: u64,
    pub list_ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius_ttl_secs: 300,
            list_ttl_secs: 120,
            max_entries: 1_024,
        }
    }
}

impl CacheConfig {
    pub fn radius_ttl(&self) -> Duration {
        Duration::from_secs(self.radius_ttl_secs)
    }

    pub fn list_ttl(&self) -> Duration {
        Duration::from_secs(self.list_ttl_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=debug".to_string(),
        }
    }
}

impl LoggingConfig {
    /// `RUST_LOG` when set, otherwise the configured directives
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.filter))
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load the file when given, defaults otherwise
    pub fn load_optional<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.listen, "0.0.0.0:8000");
        assert_eq!(config.server.query_timeout(), Duration::from_secs(5));
        assert!(config.store.path.is_none());
        assert_eq!(config.search.metric, DistanceMetric::WebMercator);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.radius_ttl(), Duration::from_secs(300));
        assert_eq!(config.cache.list_ttl(), Duration::from_secs(120));
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
            [store]
            path = "/var/lib/pois"

            [search]
            metric = "haversine"

            [cache]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.store.path, Some(PathBuf::from("/var/lib/pois")));
        assert_eq!(config.search.metric, DistanceMetric::Haversine);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.radius_ttl_secs, 300);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nlisten = \"127.0.0.1:9000\"").unwrap();
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:9000");

        assert!(Config::load_from_file("/nonexistent/pois.toml").is_err());
        assert!(Config::load_optional::<&Path>(None).is_ok());
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        assert!(toml::from_str::<Config>("[search]\nmetric = \"manhattan\"").is_err());
    }
}
