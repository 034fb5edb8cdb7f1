//! Typed outcomes of successful actions

use crate::action::StorageLocation;
use bytes::Bytes;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::{Path, PathBuf};

/// Outcome of a store action
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResult {
    pub location: StorageLocation,
    pub format: String,
    pub size: u64,
}

/// Where retrieved bytes ended up. Exactly one of the two, by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievedContent {
    Inline(Bytes),
    File(PathBuf),
}

/// Outcome of a retrieve action
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedResult {
    pub content: RetrievedContent,
    pub format: String,
    pub size: u64,
}

impl RetrievedResult {
    pub fn inline_data(&self) -> Option<&Bytes> {
        match &self.content {
            RetrievedContent::Inline(data) => Some(data),
            RetrievedContent::File(_) => None,
        }
    }

    pub fn file_location(&self) -> Option<&Path> {
        match &self.content {
            RetrievedContent::Inline(_) => None,
            RetrievedContent::File(path) => Some(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    Stored(StoredResult),
    Retrieved(RetrievedResult),
}

impl From<StoredResult> for ActionResult {
    fn from(result: StoredResult) -> Self {
        ActionResult::Stored(result)
    }
}

impl From<RetrievedResult> for ActionResult {
    fn from(result: RetrievedResult) -> Self {
        ActionResult::Retrieved(result)
    }
}

impl Serialize for StoredResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("@type", "DigitalDocument")?;
        map.serialize_entry("contentUrl", &self.location.to_uri())?;
        map.serialize_entry("encodingFormat", &self.format)?;
        map.serialize_entry("contentSize", &self.size)?;
        map.end()
    }
}

impl Serialize for RetrievedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        match &self.content {
            RetrievedContent::Inline(data) => {
                map.serialize_entry("@type", "Dataset")?;
                map.serialize_entry("output", &String::from_utf8_lossy(data))?;
            }
            RetrievedContent::File(path) => {
                map.serialize_entry("@type", "DigitalDocument")?;
                map.serialize_entry("contentUrl", &path.to_string_lossy())?;
            }
        }
        map.serialize_entry("encodingFormat", &self.format)?;
        map.serialize_entry("contentSize", &self.size)?;
        map.end()
    }
}

impl Serialize for ActionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ActionResult::Stored(result) => result.serialize(serializer),
            ActionResult::Retrieved(result) => result.serialize(serializer),
        }
    }
}
