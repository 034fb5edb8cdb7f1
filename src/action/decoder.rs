//! Decoding of inbound action envelopes into typed [`Action`]s

use crate::action::{Action, ActionDefaults, ActionError, Operation, OutputHints, OutputType, Verb};
use bytes::Bytes;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Action type strings accepted on the wire and the verb each one means.
/// New synonyms are added here, nowhere else.
const VERB_SYNONYMS: &[(&str, Verb)] = &[
    ("UploadAction", Verb::Store),
    ("CreateAction", Verb::Store),
    ("StoreAction", Verb::Store),
    ("UpdateAction", Verb::Store),
    ("DownloadAction", Verb::Retrieve),
    ("RetrieveAction", Verb::Retrieve),
    ("FetchAction", Verb::Retrieve),
    ("ReadAction", Verb::Retrieve),
];

/// Look up the verb for an action type string
pub fn classify(action_type: &str) -> Option<Verb> {
    VERB_SYNONYMS
        .iter()
        .find(|(name, _)| *name == action_type)
        .map(|(_, verb)| *verb)
}

/// Wire shape of an action request (schema.org action vocabulary)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Workflow or session scope used in key derivation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<MediaObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ActionProperties>,
}

/// The object an action operates on: inline text or a content location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaObject {
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_format: Option<String>,
}

/// Side properties; only the output routing hints are consulted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
}

impl ActionEnvelope {
    /// Parse a raw request body
    pub fn from_slice(body: &[u8]) -> Result<Self, ActionError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ActionError::InvalidEnvelope("empty body".to_string()));
        }
        serde_json::from_slice(body).map_err(|e| ActionError::InvalidEnvelope(e.to_string()))
    }

    /// Fill in the namespace from the transport when the body did not carry one
    pub fn with_namespace_hint(mut self, hint: Option<&str>) -> Self {
        if non_empty(self.namespace.as_deref()).is_none() {
            if let Some(hint) = non_empty(hint) {
                self.namespace = Some(hint.to_string());
            }
        }
        self
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_output_type(raw: &str) -> OutputType {
    if raw.eq_ignore_ascii_case("file") {
        OutputType::File
    } else {
        if !raw.eq_ignore_ascii_case("inline") {
            warn!("Unknown outputType '{}', returning data inline", raw);
        }
        OutputType::Inline
    }
}

fn output_hints(properties: Option<&ActionProperties>) -> OutputHints {
    let Some(properties) = properties else {
        return OutputHints::default();
    };
    OutputHints {
        output_file: non_empty(properties.output_file.as_deref()).map(PathBuf::from),
        output_type: properties.output_type.as_deref().map(parse_output_type),
    }
}

/// Decode an envelope into an action, failing closed on anything incomplete
pub fn decode(envelope: &ActionEnvelope, defaults: &ActionDefaults) -> Result<Action, ActionError> {
    let action_type = non_empty(envelope.action_type.as_deref())
        .ok_or_else(|| ActionError::InvalidEnvelope("@type is required".to_string()))?;

    let verb = classify(action_type).ok_or_else(|| ActionError::UnsupportedVerb(action_type.to_string()))?;

    let identifier = non_empty(envelope.identifier.as_deref()).ok_or(ActionError::MissingIdentifier)?;

    let namespace = non_empty(envelope.namespace.as_deref()).unwrap_or(defaults.namespace.as_str());

    let object = envelope.object.as_ref();
    let operation = match verb {
        Verb::Store => {
            let object = object.ok_or(ActionError::NoData)?;
            let data = match (non_empty_raw(object.text.as_deref()), non_empty(object.content_url.as_deref())) {
                (Some(text), _) => Bytes::copy_from_slice(text.as_bytes()),
                (None, Some(_)) => return Err(ActionError::NotImplemented),
                (None, None) => return Err(ActionError::NoData),
            };
            let format = non_empty(object.encoding_format.as_deref()).unwrap_or(defaults.format.as_str());
            Operation::Store { data, format: format.to_string() }
        }
        Verb::Retrieve => {
            let location = object
                .and_then(|o| non_empty(o.content_url.as_deref()))
                .ok_or_else(|| ActionError::InvalidLocation("object.contentUrl is required".to_string()))?;
            Operation::Retrieve {
                location: location.to_string(),
                output: output_hints(envelope.properties.as_ref()),
            }
        }
    };

    debug!("Decoded {} as {:?} for {}/{}", action_type, verb, namespace, identifier);
    Ok(Action {
        action_type: action_type.to_string(),
        identifier: identifier.to_string(),
        namespace: namespace.to_string(),
        operation,
    })
}

// Payload text is stored byte for byte, whitespace included
fn non_empty_raw(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
