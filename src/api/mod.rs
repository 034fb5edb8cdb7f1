//! HTTP surface: the semantic action endpoint plus health and documentation.
//!
//! Every route is thin plumbing over [`ActionService`](crate::service::ActionService):
//! read the body, pick up the workflow header, hand over, render the envelope.

pub mod legacy;
pub mod rest;

use actix_web::error::{ErrorBadRequest, ErrorPayloadTooLarge};
use actix_web::http::StatusCode;
use actix_web::{get, post, web, Error, HttpRequest, HttpResponse};
use bytes::BytesMut;
use futures::StreamExt;
use log::{debug, warn};
use serde_json::json;

use crate::action::{ErrorKind, ResponseEnvelope};
use crate::app_state::AppState;

pub const SERVICE_NAME: &str = "workflow-storage";

/// Header carrying the workflow (namespace) of a request
pub const WORKFLOW_HEADER: &str = "X-Workflow-ID";

/// Register every route on an app
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(docs)
        .service(semantic_action)
        .service(rest::store_workflow)
        .service(rest::get_workflow)
        .service(rest::update_workflow)
        .service(rest::delete_workflow)
        .service(legacy::store)
        .service(legacy::fetch);
}

/// Namespace hint from the workflow header, if present and readable
pub(crate) fn workflow_header(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(WORKFLOW_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Tag log lines of this request with its identifier and namespace
pub(crate) fn tag_request(identifier: Option<&str>, namespace: Option<&str>) {
    log_mdc::insert("identifier", identifier.unwrap_or("-"));
    log_mdc::insert("namespace", namespace.unwrap_or("-"));
}

/// Collect the request body, refusing anything over the configured limit
pub(crate) async fn read_payload(mut payload: web::Payload, limit: usize) -> Result<BytesMut, Error> {
    let mut bytes = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            warn!("Error reading payload chunk: {}", e);
            ErrorBadRequest("Error reading payload")
        })?;
        if bytes.len() + chunk.len() > limit {
            warn!("Payload exceeds limit of {} bytes", limit);
            return Err(ErrorPayloadTooLarge("Payload too large"));
        }
        bytes.extend_from_slice(&chunk);
    }
    debug!("Total received data size: {} bytes", bytes.len());
    Ok(bytes)
}

/// HTTP status for a response envelope
pub fn status_for(envelope: &ResponseEnvelope) -> StatusCode {
    match envelope.error_kind() {
        None => StatusCode::OK,
        Some(ErrorKind::NotImplemented) => StatusCode::NOT_IMPLEMENTED,
        Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
        Some(kind) if kind.is_client_error() => StatusCode::BAD_REQUEST,
        Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn render(envelope: &ResponseEnvelope) -> HttpResponse {
    HttpResponse::build(status_for(envelope)).json(envelope)
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message.into() }))
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "service": SERVICE_NAME,
        "status": "healthy",
    }))
}

#[get("/v1/api/docs")]
pub async fn docs(app_state: web::Data<AppState>) -> HttpResponse {
    let endpoints = [
        ("POST", "/v1/api/semantic/action", "Execute storage operations via semantic actions (primary interface)"),
        ("POST", "/v1/api/workflows", "Store workflow (REST convenience, converts to CreateAction)"),
        ("GET", "/v1/api/workflows/{id}", "Retrieve workflow (REST convenience, converts to RetrieveAction)"),
        ("PUT", "/v1/api/workflows/{id}", "Update workflow (REST convenience, converts to UpdateAction)"),
        ("DELETE", "/v1/api/workflows/{id}", "Delete workflow (REST convenience, converts to DeleteAction)"),
        ("POST", "/v1/api/store", "Store workflow data (legacy)"),
        ("GET", "/v1/api/fetch/{key}", "Fetch workflow data by key (legacy)"),
        ("GET", "/health", "Health check endpoint"),
    ];

    HttpResponse::Ok().json(json!({
        "serviceId": SERVICE_NAME,
        "serviceName": "Workflow Storage Service",
        "description": "Storage and retrieval service for workflow definitions and data",
        "version": "v1",
        "port": app_state.config.server.port,
        "capabilities": ["document-storage", "workflow-storage", "data-storage"],
        "endpoints": endpoints
            .iter()
            .map(|(method, path, description)| json!({
                "method": method,
                "path": path,
                "description": description,
            }))
            .collect::<Vec<_>>(),
    }))
}

/// Primary interface: one action envelope in, one response envelope out
#[post("/v1/api/semantic/action")]
pub async fn semantic_action(payload: web::Payload, req: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let body = read_payload(payload, app_state.config.server.max_payload_size).await?;
    let namespace = workflow_header(&req);
    tag_request(None, namespace.as_deref());

    let envelope = app_state
        .action_service
        .submit_raw(&body, namespace.as_deref())
        .await;
    Ok(render(&envelope))
}
