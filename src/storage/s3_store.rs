//! S3-compatible object store backend

use crate::storage::config::ObjectStoreConfig;
use crate::storage::{ObjectStore, StoreError, StoredObject};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use log::{debug, info};

/// Object store backed by any S3-compatible service (AWS, Hetzner, MinIO, ...)
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Build the SDK client once; it is cloned cheaply and shared by all requests
    pub async fn from_config(config: &ObjectStoreConfig) -> Result<Self, StoreError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = config.endpoint.as_deref().filter(|e| !e.is_empty()) {
            info!("Using object store endpoint: {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }

        match static_credentials(config)? {
            Some(credentials) => loader = loader.credentials_provider(credentials),
            None => debug!("No static credentials configured, using the default provider chain"),
        }

        let shared_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            // S3-compatible providers generally require path-style addressing
            .force_path_style(config.force_path_style)
            .build();

        info!("S3 client initialized for region {}", config.region);
        Ok(Self {
            client: Client::from_conf(s3_config),
        })
    }
}

/// Static key pair from the config. Blank values count as unset, and a pair
/// with only one half set is a configuration error.
fn static_credentials(config: &ObjectStoreConfig) -> Result<Option<Credentials>, StoreError> {
    let configured = |value: &Option<String>| value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

    match (configured(&config.access_key), configured(&config.secret_key)) {
        (Some(access_key), Some(secret_key)) => Ok(Some(Credentials::new(access_key, secret_key, None, None, "static"))),
        (None, None) => Ok(None),
        _ => Err(StoreError::Config(
            "access_key and secret_key must be configured together".to_string(),
        )),
    }
}

fn status_error(status: Option<u16>, detail: String) -> StoreError {
    match status {
        Some(401) | Some(403) => StoreError::NotAuthorized(detail),
        _ => StoreError::Transport(detail),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, data: Bytes, content_type: &str) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|err| {
                let status = err.raw_response().map(|response| response.status().as_u16());
                status_error(status, DisplayErrorContext(&err).to_string())
            })?;

        debug!("S3 PUT {}/{} succeeded", bucket, key);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, StoreError> {
        let output = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => output,
            Err(err) => {
                let status = err.raw_response().map(|response| response.status().as_u16());
                let missing = err
                    .as_service_error()
                    .map(|service_err| service_err.is_no_such_key())
                    .unwrap_or(false);
                if missing || status == Some(404) {
                    return Err(StoreError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    });
                }
                return Err(status_error(status, DisplayErrorContext(&err).to_string()));
            }
        };

        let content_type = output.content_type().map(str::to_string);
        let data = output
            .body
            .collect()
            .await
            .map_err(|err| StoreError::Transport(format!("failed to read object body: {}", err)))?
            .into_bytes();

        debug!("S3 GET {}/{} returned {} bytes", bucket, key, data.len());
        Ok(StoredObject { data, content_type })
    }
}
