//! Application Configuration
//!
//! This module provides configuration management for the application,
//! supporting YAML configuration files with sensible defaults and a small
//! set of environment overrides for deployment secrets.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use log::{info, warn};

use crate::action::ActionDefaults;
pub use crate::storage::config::{ObjectStoreConfig, StorageBackend};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Object store configuration
    pub storage: ObjectStoreConfig,
    /// Action decoding and output routing defaults
    pub actions: ActionConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Number of worker threads
    pub workers: usize,
    /// Maximum payload size in bytes
    pub max_payload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8094,
            workers: 4,
            max_payload_size: 64 * 1024 * 1024,
        }
    }
}

/// Defaults applied while decoding actions, and where file output goes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Namespace used when a request names none
    pub default_namespace: String,
    /// Content format used when a request declares none
    pub default_format: String,
    /// Directory for synthesized output files
    pub output_dir: PathBuf,
    /// File name template for synthesized output files, `{identifier}` is substituted
    pub output_file_pattern: String,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            default_namespace: "default".to_string(),
            default_format: "application/json".to_string(),
            output_dir: env::temp_dir(),
            output_file_pattern: "{identifier}-result.dat".to_string(),
        }
    }
}

impl ActionConfig {
    pub fn defaults(&self) -> ActionDefaults {
        ActionDefaults {
            namespace: self.default_namespace.clone(),
            format: self.default_format.clone(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Path to log4rs configuration file
    pub config_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            config_file: "server_log.yaml".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.yaml`, use defaults if not found,
    /// then apply environment overrides
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::load_from(Path::new("config.yaml"))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file, use defaults if not found
    pub fn load_from(config_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)?;
            let config: AppConfig = serde_yaml::from_str(&content)?;
            info!("Loaded configuration from {}", config_path.display());
            Ok(config)
        } else {
            warn!("Config file {} not found, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Override object store and port settings from the environment
    pub fn apply_env_overrides(&mut self) {
        if let Ok(backend_str) = env::var("STORAGE_BACKEND") {
            match backend_str.parse::<StorageBackend>() {
                Ok(backend) => {
                    info!("Using storage backend from environment: {:?}", backend);
                    self.storage.backend = backend;
                }
                Err(e) => warn!("Invalid storage backend in environment: {}. Keeping {:?}.", e, self.storage.backend),
            }
        }

        if let Some(bucket) = non_empty_var("OBJECT_STORE_BUCKET") {
            self.storage.bucket = bucket;
        }
        if let Some(endpoint) = non_empty_var("OBJECT_STORE_ENDPOINT") {
            self.storage.endpoint = Some(endpoint);
        }
        if let Some(region) = non_empty_var("OBJECT_STORE_REGION") {
            self.storage.region = region;
        }
        if let Some(access_key) = non_empty_var("OBJECT_STORE_ACCESS_KEY") {
            self.storage.access_key = Some(access_key);
        }
        if let Some(secret_key) = non_empty_var("OBJECT_STORE_SECRET_KEY") {
            self.storage.secret_key = Some(secret_key);
        }

        if let Some(port) = non_empty_var("PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Invalid PORT in environment: {}. Keeping {}.", port, self.server.port),
            }
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
