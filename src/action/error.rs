//! Typed failures of action decoding and execution

use crate::storage::StoreError;
use serde::Serialize;
use std::path::PathBuf;

/// Stable, externally visible error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidEnvelope,
    MissingIdentifier,
    UnsupportedVerb,
    NoData,
    NotImplemented,
    InvalidLocation,
    NotFound,
    StorageReadError,
    StorageWriteError,
    LocalWriteError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidEnvelope => "invalid_envelope",
            ErrorKind::MissingIdentifier => "missing_identifier",
            ErrorKind::UnsupportedVerb => "unsupported_verb",
            ErrorKind::NoData => "no_data",
            ErrorKind::NotImplemented => "not_implemented",
            ErrorKind::InvalidLocation => "invalid_location",
            ErrorKind::NotFound => "not_found",
            ErrorKind::StorageReadError => "storage_read_error",
            ErrorKind::StorageWriteError => "storage_write_error",
            ErrorKind::LocalWriteError => "local_write_error",
        }
    }

    /// True when the caller sent something the service cannot act on
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidEnvelope
                | ErrorKind::MissingIdentifier
                | ErrorKind::UnsupportedVerb
                | ErrorKind::NoData
                | ErrorKind::NotImplemented
                | ErrorKind::InvalidLocation
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every way a single action can fail. None of these are fatal to the service.
///
/// The `Display` text is safe to return to callers: backend causes are only
/// reachable through `source()` and are logged, never rendered.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("invalid action envelope: {0}")]
    InvalidEnvelope(String),

    #[error("identifier is required")]
    MissingIdentifier,

    #[error("unsupported action type: {0}")]
    UnsupportedVerb(String),

    #[error("no data to store")]
    NoData,

    #[error("storing from object.contentUrl is not implemented")]
    NotImplemented,

    #[error("invalid location: {0}")]
    InvalidLocation(String),

    #[error("data not found")]
    NotFound(#[source] StoreError),

    #[error("failed to read data")]
    StorageRead(#[source] StoreError),

    #[error("failed to store data")]
    StorageWrite(#[source] StoreError),

    #[error("failed to write result to {}", path.display())]
    LocalWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ActionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ActionError::InvalidEnvelope(_) => ErrorKind::InvalidEnvelope,
            ActionError::MissingIdentifier => ErrorKind::MissingIdentifier,
            ActionError::UnsupportedVerb(_) => ErrorKind::UnsupportedVerb,
            ActionError::NoData => ErrorKind::NoData,
            ActionError::NotImplemented => ErrorKind::NotImplemented,
            ActionError::InvalidLocation(_) => ErrorKind::InvalidLocation,
            ActionError::NotFound(_) => ErrorKind::NotFound,
            ActionError::StorageRead(_) => ErrorKind::StorageReadError,
            ActionError::StorageWrite(_) => ErrorKind::StorageWriteError,
            ActionError::LocalWrite { .. } => ErrorKind::LocalWriteError,
        }
    }

    /// Map a failed object store read, keeping "never stored" apart from "store unavailable"
    pub fn from_read(err: StoreError) -> Self {
        if err.is_not_found() {
            ActionError::NotFound(err)
        } else {
            ActionError::StorageRead(err)
        }
    }

    /// Full message including the cause chain, for internal logs only
    pub fn detailed(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
