//! Configuration for object store backends

use crate::storage::{ObjectStore, StoreError, mock_store::MockObjectStore, s3_store::S3ObjectStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use log::info;

/// Available object store backends
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Mock,
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::S3
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" | "aws" | "hetzner" | "minio" => Ok(StorageBackend::S3),
            "mock" | "memory" => Ok(StorageBackend::Mock),
            _ => Err(format!("Unknown storage backend: {}", s))
        }
    }
}

/// Configuration for the object store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectStoreConfig {
    /// Backend type
    pub backend: StorageBackend,
    /// Bucket every store action writes to
    pub bucket: String,
    /// Scheme used in location URIs (`{scheme}://{bucket}/{key}`)
    pub scheme: String,
    /// Custom endpoint for S3-compatible providers
    pub endpoint: Option<String>,
    /// Region name passed to the SDK
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Use path-style addressing instead of virtual-hosted buckets
    pub force_path_style: bool,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            bucket: "px-semantic".to_string(),
            scheme: "s3".to_string(),
            endpoint: None,
            region: "fsn1".to_string(),
            access_key: None,
            secret_key: None,
            force_path_style: true,
        }
    }
}

impl ObjectStoreConfig {
    /// Create an object store instance based on the configuration
    pub async fn create_store(&self) -> Result<Arc<dyn ObjectStore>, StoreError> {
        match self.backend {
            StorageBackend::S3 => {
                info!("Using S3 object store backend, bucket: {}", self.bucket);
                Ok(Arc::new(S3ObjectStore::from_config(self).await?))
            }
            StorageBackend::Mock => {
                info!("Using mock object store backend, bucket: {}", self.bucket);
                Ok(Arc::new(MockObjectStore::new()))
            }
        }
    }
}
