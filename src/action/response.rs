//! Response shaping: turning an action outcome into the caller's envelope

use crate::action::{Action, ActionEnvelope, ActionError, ActionResult, ErrorKind};
use chrono::{DateTime, Utc};
use log::{error, warn};
use serde::Serialize;

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionStatus {
    #[serde(rename = "CompletedActionStatus")]
    Completed,
    #[serde(rename = "FailedActionStatus")]
    Failed,
}

/// Stable code plus a message that is safe to show to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub code: ErrorKind,
    pub message: String,
}

/// Identifying metadata of a request, echoed back whatever the outcome
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub action_type: Option<String>,
    pub identifier: Option<String>,
    pub namespace: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl RequestMeta {
    /// Best-effort metadata, usable before the envelope has been validated
    pub fn from_envelope(envelope: &ActionEnvelope, started_at: DateTime<Utc>) -> Self {
        Self {
            action_type: envelope.action_type.clone(),
            identifier: envelope.identifier.clone(),
            namespace: envelope.namespace.clone(),
            started_at,
        }
    }

    pub fn from_action(action: &Action, started_at: DateTime<Utc>) -> Self {
        Self {
            action_type: Some(action.action_type.clone()),
            identifier: Some(action.identifier.clone()),
            namespace: Some(action.namespace.clone()),
            started_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub action_status: ActionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ActionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ResponseEnvelope {
    pub fn completed(meta: RequestMeta, result: ActionResult) -> Self {
        Self::build(meta, ActionStatus::Completed, Some(result), None)
    }

    pub fn failed(meta: RequestMeta, err: &ActionError) -> Self {
        let body = ErrorBody {
            code: err.kind(),
            message: err.to_string(),
        };
        Self::build(meta, ActionStatus::Failed, None, Some(body))
    }

    fn build(meta: RequestMeta, action_status: ActionStatus, result: Option<ActionResult>, error: Option<ErrorBody>) -> Self {
        Self {
            context: SCHEMA_CONTEXT.to_string(),
            action_type: meta.action_type,
            identifier: meta.identifier,
            namespace: meta.namespace,
            action_status,
            result,
            error,
            start_time: meta.started_at,
            end_time: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.action_status == ActionStatus::Completed
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|body| body.code)
    }
}

/// Render an outcome. Failures are logged here with their full cause chain;
/// the envelope only carries the error kind and its public message.
pub fn shape(meta: RequestMeta, outcome: Result<ActionResult, ActionError>) -> ResponseEnvelope {
    match outcome {
        Ok(result) => ResponseEnvelope::completed(meta, result),
        Err(err) => {
            let identifier = meta.identifier.as_deref().unwrap_or("-");
            if err.kind().is_client_error() {
                warn!("Rejected action {}: {}", identifier, err);
            } else {
                error!("Action {} failed: {}", identifier, err.detailed());
            }
            ResponseEnvelope::failed(meta, &err)
        }
    }
}
