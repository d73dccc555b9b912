//! Configuration loading and management
//!
//! Configuration is read from an optional YAML file and then overridden by
//! environment variables, so the usual deployment knobs (`PORT`,
//! `MAX_FILE_UPLOAD`, `FILE_UPLOAD_PATH`, `MONGO_URI`) keep working.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 5000
//! upload:
//!   max_file_upload: 1000000
//!   file_upload_path: ./public/uploads
//! listing:
//!   default_limit: 20
//!   max_limit: 100
//!   count_scope: filtered
//! logging:
//!   level: info
//!   json: false
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default page size for listings
pub const DEFAULT_LIMIT: usize = 20;

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Photo upload settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes
    pub max_file_upload: u64,

    /// Directory uploaded files are written to
    pub file_upload_path: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_upload: 1_000_000,
            file_upload_path: PathBuf::from("./public/uploads"),
        }
    }
}

/// What the pagination total is counted over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountScope {
    /// Documents matching the active filter
    #[default]
    Filtered,

    /// Every document in the collection, whatever the filter
    Collection,
}

/// Listing / pagination settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub default_limit: usize,
    pub max_limit: usize,
    pub count_scope: CountScope,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: 100,
            count_scope: CountScope::Filtered,
        }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Database connection settings (used by the MongoDB backend)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub mongo_uri: Option<String>,
    pub name: Option<String>,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub listing: ListingConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("invalid config file '{}'", path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from `DEVCAMPER_CONFIG` (if set) and apply environment overrides
    pub fn load() -> Result<Self> {
        let config = match std::env::var("DEVCAMPER_CONFIG") {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        }
        if let Some(max) = lookup("MAX_FILE_UPLOAD") {
            self.upload.max_file_upload = max.parse().with_context(|| {
                format!("MAX_FILE_UPLOAD must be a byte count, got '{}'", max)
            })?;
        }
        if let Some(path) = lookup("FILE_UPLOAD_PATH") {
            self.upload.file_upload_path = PathBuf::from(path);
        }
        if let Some(uri) = lookup("MONGO_URI") {
            self.database.mongo_uri = Some(uri);
        }
        if let Some(name) = lookup("DATABASE_NAME") {
            self.database.name = Some(name);
        }
        Ok(self)
    }
}
