//! Actions: the typed unit of work the service executes.
//!
//! An inbound envelope is decoded into an [`Action`] carrying exactly one
//! [`Verb`] and a non-empty identifier. Store actions carry inline bytes,
//! retrieve actions carry a location reference plus output routing hints.

pub mod decoder;
pub mod error;
pub mod key;
pub mod response;
pub mod result;

use bytes::Bytes;
use std::path::PathBuf;

pub use decoder::{decode, ActionEnvelope};
pub use error::{ActionError, ErrorKind};
pub use key::{derive_key, parse_location, StorageLocation};
pub use response::{ActionStatus, ResponseEnvelope};
pub use result::{ActionResult, RetrievedContent, RetrievedResult, StoredResult};

/// The closed set of operations every action type collapses into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Store,
    Retrieve,
}

/// Where a retrieve action delivers the fetched bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputType {
    #[default]
    Inline,
    File,
}

/// Output routing hints attached to a retrieve action
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputHints {
    pub output_file: Option<PathBuf>,
    pub output_type: Option<OutputType>,
}

/// Verb-specific payload of an action
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Store { data: Bytes, format: String },
    Retrieve { location: String, output: OutputHints },
}

/// A decoded, validated action
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Type string as the caller sent it, echoed back in the response
    pub action_type: String,
    pub identifier: String,
    pub namespace: String,
    pub operation: Operation,
}

impl Action {
    pub fn verb(&self) -> Verb {
        match self.operation {
            Operation::Store { .. } => Verb::Store,
            Operation::Retrieve { .. } => Verb::Retrieve,
        }
    }
}

/// Per-request defaults, resolved once from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDefaults {
    pub namespace: String,
    pub format: String,
}

impl Default for ActionDefaults {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            format: "application/json".to_string(),
        }
    }
}
