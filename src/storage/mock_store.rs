//! Mock implementation of ObjectStore for testing

use crate::storage::{ObjectStore, StoreError, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use log::info;

type Buckets = HashMap<String, HashMap<String, (Bytes, String)>>;

/// Mock implementation of ObjectStore for testing
pub struct MockObjectStore {
    // In-memory storage: bucket -> key -> (data, content type)
    data: Arc<Mutex<Buckets>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    fn buckets(&self) -> MutexGuard<'_, Buckets> {
        // A poisoned map is still structurally valid, keep serving it
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every subsequent put fail with a transport error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent get fail with a transport error
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Get the number of objects in a bucket
    pub fn object_count(&self, bucket: &str) -> usize {
        self.buckets().get(bucket).map(|objects| objects.len()).unwrap_or(0)
    }

    /// Check if an object exists in a bucket
    pub fn object_exists(&self, bucket: &str, key: &str) -> bool {
        self.buckets()
            .get(bucket)
            .map(|objects| objects.contains_key(key))
            .unwrap_or(false)
    }

    /// List all keys stored in a bucket
    pub fn list_keys(&self, bucket: &str) -> Vec<String> {
        self.buckets()
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear all data from the store
    pub fn clear(&self) {
        self.buckets().clear();
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, data: Bytes, content_type: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Transport(format!("mock write refused for {}/{}", bucket, key)));
        }

        let size = data.len();
        self.buckets()
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), (data, content_type.to_string()));

        info!("Mock: Stored {}/{} ({} bytes, {})", bucket, key, size, content_type);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Transport(format!("mock read refused for {}/{}", bucket, key)));
        }

        let buckets = self.buckets();
        match buckets.get(bucket).and_then(|objects| objects.get(key)) {
            Some((data, content_type)) => {
                info!("Mock: Read {}/{} ({} bytes)", bucket, key, data.len());
                Ok(StoredObject {
                    data: data.clone(),
                    content_type: Some(content_type.clone()),
                })
            }
            None => Err(StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
        }
    }
}
