//! Storage key derivation and location URIs

use crate::action::ActionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every derived key
pub const RESULTS_PREFIX: &str = "workflow-results";

/// Derive the storage key for `(namespace, identifier)`.
///
/// Layout: `workflow-results/{namespace}/{identifier}.json`. Both parts are
/// used verbatim.
pub fn derive_key(namespace: &str, identifier: &str) -> String {
    format!("{}/{}/{}.json", RESULTS_PREFIX, namespace, identifier)
}

/// A `(bucket, key)` pair addressing one object, printable as `scheme://bucket/key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub scheme: String,
    pub bucket: String,
    pub key: String,
}

impl StorageLocation {
    pub fn new(scheme: impl Into<String>, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    pub fn to_uri(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.key)
    }
}

/// Parse `uri` back into a location.
///
/// The scheme must match `scheme` exactly and the URI must name a bucket and
/// at least one key segment. Everything after the bucket is the key, internal
/// separators preserved.
pub fn parse_location(uri: &str, scheme: &str) -> Result<StorageLocation, ActionError> {
    let prefix = format!("{}://", scheme);
    let rest = uri
        .strip_prefix(prefix.as_str())
        .ok_or_else(|| ActionError::InvalidLocation(format!("only {} URLs supported", prefix)))?;

    let (bucket, key) = rest
        .split_once('/')
        .ok_or_else(|| ActionError::InvalidLocation(format!("missing key in {}", uri)))?;

    if bucket.is_empty() {
        return Err(ActionError::InvalidLocation(format!("missing bucket in {}", uri)));
    }
    if key.is_empty() {
        return Err(ActionError::InvalidLocation(format!("missing key in {}", uri)));
    }

    Ok(StorageLocation::new(scheme, bucket, key))
}
