//! Object Storage Layer Abstraction
//!
//! This module provides an abstraction over key-addressed blob stores,
//! allowing the action service to run against an S3-compatible backend in
//! production and an in-memory backend in tests without changing the
//! orchestration code.

pub mod s3_store;
pub mod mock_store;
pub mod config;

use async_trait::async_trait;
use bytes::Bytes;

/// Errors raised by an object store backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nothing is stored under the requested key
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// The backend rejected the credentials or the operation
    #[error("access denied: {0}")]
    NotAuthorized(String),

    /// Network, protocol or service failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend could not be constructed from its configuration
    #[error("invalid object store configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// An object as read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub data: Bytes,
    /// Content type recorded at write time, if the backend kept one
    pub content_type: Option<String>,
}

/// Trait defining the object store interface.
///
/// Implementations must be safe for concurrent use: one instance is shared by
/// every in-flight request. Timeouts and retries belong to the implementation,
/// callers issue exactly one call per operation.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `data` under `bucket/key`, replacing any existing object
    async fn put_object(&self, bucket: &str, key: &str, data: Bytes, content_type: &str) -> Result<(), StoreError>;

    /// Read the object stored under `bucket/key`
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct_from_transport() {
        let missing = StoreError::NotFound { bucket: "b".to_string(), key: "k".to_string() };
        let broken = StoreError::Transport("connection reset".to_string());

        assert!(missing.is_not_found());
        assert!(!broken.is_not_found());
        assert_eq!(missing.to_string(), "object not found: b/k");
    }
}
