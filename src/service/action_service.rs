//! Action service: decodes actions, orchestrates object store I/O and shapes responses

use crate::action::response::{shape, RequestMeta};
use crate::action::{
    decode, derive_key, parse_location, Action, ActionDefaults, ActionEnvelope, ActionError, ActionResult,
    Operation, OutputHints, ResponseEnvelope, RetrievedContent, RetrievedResult, StorageLocation, StoredResult,
};
use crate::config::{ActionConfig, ObjectStoreConfig};
use crate::service::output::{resolve_target, write_output, OutputTarget};
use crate::storage::ObjectStore;
use bytes::Bytes;
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;

/// Executes store and retrieve actions against one shared object store.
///
/// Holds no per-request state; concurrent calls share only the store client.
/// Two stores of the same `(namespace, identifier)` race at the backend and the
/// last write wins.
pub struct ActionService {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    scheme: String,
    defaults: ActionDefaults,
    config: ActionConfig,
}

impl ActionService {
    /// Create a new action service with an injected object store
    pub fn new(store: Arc<dyn ObjectStore>, storage: &ObjectStoreConfig, config: ActionConfig) -> Self {
        Self {
            store,
            bucket: storage.bucket.clone(),
            scheme: storage.scheme.clone(),
            defaults: config.defaults(),
            config,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn defaults(&self) -> &ActionDefaults {
        &self.defaults
    }

    /// Location a store of `(namespace, identifier)` writes to
    pub fn location_for(&self, namespace: &str, identifier: &str) -> StorageLocation {
        StorageLocation::new(&self.scheme, &self.bucket, derive_key(namespace, identifier))
    }

    /// Location of a raw key in the configured bucket
    pub fn location_for_key(&self, key: &str) -> StorageLocation {
        StorageLocation::new(&self.scheme, &self.bucket, key)
    }

    /// Entry point for an undecoded request body
    pub async fn submit_raw(&self, body: &[u8], namespace_hint: Option<&str>) -> ResponseEnvelope {
        match ActionEnvelope::from_slice(body) {
            Ok(envelope) => self.submit_action(envelope.with_namespace_hint(namespace_hint)).await,
            Err(err) => {
                let meta = RequestMeta {
                    started_at: Utc::now(),
                    ..RequestMeta::default()
                };
                shape(meta, Err(err))
            }
        }
    }

    /// Entry point: decode, dispatch and shape one action
    pub async fn submit_action(&self, envelope: ActionEnvelope) -> ResponseEnvelope {
        let started_at = Utc::now();
        match decode(&envelope, &self.defaults) {
            Ok(action) => {
                log_mdc::insert("identifier", action.identifier.as_str());
                log_mdc::insert("namespace", action.namespace.as_str());
                let outcome = self.execute(&action).await;
                shape(RequestMeta::from_action(&action, started_at), outcome)
            }
            Err(err) => shape(RequestMeta::from_envelope(&envelope, started_at), Err(err)),
        }
    }

    /// Dispatch a decoded action to its branch
    pub async fn execute(&self, action: &Action) -> Result<ActionResult, ActionError> {
        match &action.operation {
            Operation::Store { data, format } => self
                .store(&action.namespace, &action.identifier, data.clone(), format)
                .await
                .map(ActionResult::from),
            Operation::Retrieve { location, output } => self
                .retrieve(&action.identifier, location, output)
                .await
                .map(ActionResult::from),
        }
    }

    /// Write `data` under the key derived from `(namespace, identifier)`.
    ///
    /// Exactly one put per call, never retried here.
    pub async fn store(&self, namespace: &str, identifier: &str, data: Bytes, format: &str) -> Result<StoredResult, ActionError> {
        let location = self.location_for(namespace, identifier);
        let size = data.len() as u64;
        debug!("Storing {} bytes at {}", size, location);

        self.store
            .put_object(&location.bucket, &location.key, data, format)
            .await
            .map_err(ActionError::StorageWrite)?;

        info!("Stored workflow result: {} (size: {} bytes)", location.key, size);
        Ok(StoredResult {
            location,
            format: format.to_string(),
            size,
        })
    }

    /// Fetch the object at `location` and deliver it inline or to a local file.
    ///
    /// The fetched object is not checked against `identifier`; the identifier
    /// only names the default output file. A failed local write fails the
    /// whole call, the remote read is not cached.
    pub async fn retrieve(&self, identifier: &str, location: &str, output: &OutputHints) -> Result<RetrievedResult, ActionError> {
        let location = parse_location(location, &self.scheme)?;
        if location.bucket != self.bucket {
            warn!("Retrieving from bucket {} outside the configured bucket {}", location.bucket, self.bucket);
        }

        let object = self
            .store
            .get_object(&location.bucket, &location.key)
            .await
            .map_err(ActionError::from_read)?;

        let format = object
            .content_type
            .filter(|content_type| !content_type.is_empty())
            .unwrap_or_else(|| self.defaults.format.clone());
        let size = object.data.len() as u64;
        info!("Fetched workflow result: {} (size: {} bytes)", location.key, size);

        let content = match resolve_target(output, identifier, &self.config) {
            OutputTarget::File(path) => {
                write_output(&path, &object.data).await?;
                info!("Wrote workflow result to file: {}", path.display());
                RetrievedContent::File(path)
            }
            OutputTarget::Inline => RetrievedContent::Inline(object.data),
        };

        Ok(RetrievedResult { content, format, size })
    }
}
