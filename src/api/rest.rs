//! REST convenience endpoints, each translated into an action envelope

use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web, Error, HttpRequest, HttpResponse};
use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::action::decoder::MediaObject;
use crate::action::response::SCHEMA_CONTEXT;
use crate::action::ActionEnvelope;
use crate::api::{error_response, read_payload, render, tag_request, workflow_header};
use crate::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct StoreWorkflowRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub definition: Option<Value>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWorkflowRequest {
    #[serde(default)]
    pub definition: Option<Value>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BucketQuery {
    pub bucket: Option<String>,
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, HttpResponse> {
    serde_json::from_slice(body)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, format!("Invalid request: {}", e)))
}

/// Serialized definition, which must be a JSON object
fn definition_text(definition: Option<&Value>) -> Result<String, HttpResponse> {
    match definition {
        Some(value @ Value::Object(_)) => Ok(value.to_string()),
        Some(Value::Null) | None => Err(error_response(StatusCode::BAD_REQUEST, "definition is required")),
        Some(_) => Err(error_response(StatusCode::BAD_REQUEST, "definition must be a JSON object")),
    }
}

fn document_envelope(action_type: &str, id: &str, namespace: Option<String>, object: MediaObject) -> ActionEnvelope {
    ActionEnvelope {
        context: Some(SCHEMA_CONTEXT.to_string()),
        action_type: Some(action_type.to_string()),
        identifier: Some(id.to_string()),
        namespace,
        object: Some(MediaObject {
            object_type: Some("DigitalDocument".to_string()),
            ..object
        }),
        properties: None,
    }
}

async fn write_workflow(
    action_type: &str,
    id: &str,
    definition: Option<&Value>,
    format: Option<String>,
    req: &HttpRequest,
    app_state: &AppState,
) -> HttpResponse {
    if id.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "id is required");
    }
    let text = match definition_text(definition) {
        Ok(text) => text,
        Err(response) => return response,
    };

    let namespace = workflow_header(req);
    tag_request(Some(id), namespace.as_deref());
    debug!("REST {} for workflow {}", action_type, id);

    let object = MediaObject {
        text: Some(text),
        encoding_format: format.filter(|f| !f.is_empty()),
        ..MediaObject::default()
    };
    let envelope = document_envelope(action_type, id, namespace, object);
    render(&app_state.action_service.submit_action(envelope).await)
}

/// Envelope addressing the stored copy of workflow `id`
fn location_envelope(action_type: &str, id: &str, bucket: Option<String>, req: &HttpRequest, app_state: &AppState) -> ActionEnvelope {
    let service = &app_state.action_service;
    let namespace = workflow_header(req).unwrap_or_else(|| service.defaults().namespace.clone());
    tag_request(Some(id), Some(namespace.as_str()));

    let mut location = service.location_for(&namespace, id);
    if let Some(bucket) = bucket.filter(|b| !b.is_empty()) {
        location.bucket = bucket;
    }

    let object = MediaObject {
        content_url: Some(location.to_uri()),
        ..MediaObject::default()
    };
    document_envelope(action_type, id, Some(namespace), object)
}

#[post("/v1/api/workflows")]
pub async fn store_workflow(payload: web::Payload, req: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let body = read_payload(payload, app_state.config.server.max_payload_size).await?;
    let request: StoreWorkflowRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(response) => return Ok(response),
    };

    let id = request.id.unwrap_or_default();
    Ok(write_workflow("CreateAction", &id, request.definition.as_ref(), request.format, &req, &app_state).await)
}

#[get("/v1/api/workflows/{id}")]
pub async fn get_workflow(
    path: web::Path<String>,
    query: web::Query<BucketQuery>,
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    let id = path.into_inner();
    if id.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "id is required");
    }

    let envelope = location_envelope("RetrieveAction", &id, query.into_inner().bucket, &req, &app_state);
    render(&app_state.action_service.submit_action(envelope).await)
}

#[put("/v1/api/workflows/{id}")]
pub async fn update_workflow(
    path: web::Path<String>,
    payload: web::Payload,
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = path.into_inner();
    let body = read_payload(payload, app_state.config.server.max_payload_size).await?;
    let request: UpdateWorkflowRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(response) => return Ok(response),
    };

    Ok(write_workflow("UpdateAction", &id, request.definition.as_ref(), request.format, &req, &app_state).await)
}

/// Translated like the others; the action vocabulary has no delete verb, so the
/// reply is a failed `unsupported_verb` envelope
#[delete("/v1/api/workflows/{id}")]
pub async fn delete_workflow(
    path: web::Path<String>,
    query: web::Query<BucketQuery>,
    req: HttpRequest,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    let id = path.into_inner();
    if id.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "id is required");
    }

    let envelope = location_envelope("DeleteAction", &id, query.into_inner().bucket, &req, &app_state);
    render(&app_state.action_service.submit_action(envelope).await)
}
