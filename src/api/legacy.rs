//! Legacy store/fetch endpoints, kept for older workflow runners

use actix_web::http::StatusCode;
use actix_web::{get, post, web, Error, HttpResponse};
use bytes::Bytes;
use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::action::{ErrorKind, OutputHints};
use crate::api::{error_response, read_payload, tag_request};
use crate::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRequest {
    #[serde(default)]
    pub workflow_id: String,
    #[serde(default)]
    pub action_id: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub format: Option<String>,
}

/// Reference to the stored data
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreResponse {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub content_url: String,
    pub encoding_format: String,
    pub content_size: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    pub data: String,
    pub encoding_format: String,
    pub content_size: u64,
}

#[post("/v1/api/store")]
pub async fn store(payload: web::Payload, app_state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let body = read_payload(payload, app_state.config.server.max_payload_size).await?;
    let request: StoreRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Invalid legacy store request: {}", e);
            return Ok(error_response(StatusCode::BAD_REQUEST, "invalid request"));
        }
    };

    if request.workflow_id.is_empty() || request.action_id.is_empty() || request.data.is_empty() {
        return Ok(error_response(StatusCode::BAD_REQUEST, "workflowId, actionId, and data are required"));
    }
    tag_request(Some(request.action_id.as_str()), Some(request.workflow_id.as_str()));

    let service = &app_state.action_service;
    let format = request
        .format
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| service.defaults().format.clone());

    match service
        .store(&request.workflow_id, &request.action_id, Bytes::from(request.data), &format)
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(StoreResponse {
            kind: "DataDownload".to_string(),
            id: format!("#{}-result", request.action_id),
            content_url: result.location.to_uri(),
            encoding_format: result.format,
            content_size: result.size,
        })),
        Err(e) => {
            error!("Legacy store failed: {}", e.detailed());
            Ok(error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to store data"))
        }
    }
}

#[get("/v1/api/fetch/{key:.*}")]
pub async fn fetch(path: web::Path<String>, app_state: web::Data<AppState>) -> HttpResponse {
    let key = path.into_inner();
    if key.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "key is required");
    }
    tag_request(Some(key.as_str()), None);

    let service = &app_state.action_service;
    let location = service.location_for_key(&key).to_uri();
    match service.retrieve(&key, &location, &OutputHints::default()).await {
        Ok(result) => {
            let data = result
                .inline_data()
                .map(|data| String::from_utf8_lossy(data).into_owned())
                .unwrap_or_default();
            HttpResponse::Ok().json(FetchResponse {
                data,
                encoding_format: result.format,
                content_size: result.size,
            })
        }
        Err(e) if e.kind() == ErrorKind::NotFound => error_response(StatusCode::NOT_FOUND, "data not found"),
        Err(e) => {
            warn!("Legacy fetch of {} failed: {}", key, e.detailed());
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to read data")
        }
    }
}
