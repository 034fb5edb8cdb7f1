use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};

use workflow_storage::api::{configure, WORKFLOW_HEADER};
use workflow_storage::app_state::AppState;
use workflow_storage::config::AppConfig;
use workflow_storage::storage::mock_store::MockObjectStore;
use std::sync::Arc;

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new_for_testing()))
                .configure(configure),
        )
        .await
    };
}

fn action_request(body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/v1/api/semantic/action")
        .insert_header(("content-type", "application/json"))
        .set_payload(body.to_string())
}

#[actix_web::test]
async fn test_store_then_retrieve_inline() {
    let app = app!();

    let req = action_request(json!({
        "@context": "https://schema.org",
        "@type": "CreateAction",
        "identifier": "wf-1",
        "namespace": "default",
        "object": { "@type": "DigitalDocument", "text": "{\"a\":1}", "encodingFormat": "application/json" }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["actionStatus"], "CompletedActionStatus");
    assert_eq!(body["identifier"], "wf-1");
    assert_eq!(body["result"]["contentUrl"], "s3://px-semantic/workflow-results/default/wf-1.json");
    assert_eq!(body["result"]["contentSize"], 7);

    let req = action_request(json!({
        "@type": "RetrieveAction",
        "identifier": "wf-1",
        "object": { "contentUrl": body["result"]["contentUrl"] }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["actionStatus"], "CompletedActionStatus");
    assert_eq!(body["result"]["output"], "{\"a\":1}");
    assert_eq!(body["result"]["encodingFormat"], "application/json");
    assert!(body.get("error").is_none());
}

#[actix_web::test]
async fn test_workflow_header_supplies_namespace() {
    let app = app!();

    let req = action_request(json!({
        "@type": "StoreAction",
        "identifier": "step-3",
        "object": { "text": "hello" }
    }))
    .insert_header((WORKFLOW_HEADER, "run-42"))
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["namespace"], "run-42");
    assert_eq!(body["result"]["contentUrl"], "s3://px-semantic/workflow-results/run-42/step-3.json");
}

#[actix_web::test]
async fn test_retrieve_to_explicit_file() {
    let app = app!();
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out").join("wf-file.json");

    let req = action_request(json!({
        "@type": "CreateAction",
        "identifier": "wf-file",
        "object": { "text": "to disk" }
    }))
    .to_request();
    let stored: Value = test::call_and_read_body_json(&app, req).await;

    let req = action_request(json!({
        "@type": "ReadAction",
        "identifier": "wf-file",
        "object": { "contentUrl": stored["result"]["contentUrl"] },
        "properties": { "outputFile": target.to_string_lossy() }
    }))
    .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["actionStatus"], "CompletedActionStatus");
    assert_eq!(body["result"]["contentUrl"], &*target.to_string_lossy());
    assert!(body["result"].get("output").is_none());
    assert_eq!(std::fs::read(&target).unwrap(), b"to disk");
}

#[actix_web::test]
async fn test_invalid_json_is_rejected() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/v1/api/semantic/action")
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["actionStatus"], "FailedActionStatus");
    assert_eq!(body["error"]["code"], "invalid_envelope");
}

#[actix_web::test]
async fn test_empty_body_is_rejected() {
    let app = app!();

    let req = test::TestRequest::post().uri("/v1/api/semantic/action").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_unsupported_action_type() {
    let app = app!();

    let req = action_request(json!({
        "@type": "SearchAction",
        "identifier": "wf-1"
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "unsupported_verb");
    assert_eq!(body["@type"], "SearchAction");
    assert!(body.get("result").is_none());
}

#[actix_web::test]
async fn test_missing_identifier() {
    let app = app!();

    let req = action_request(json!({
        "@type": "CreateAction",
        "object": { "text": "orphan" }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "missing_identifier");
}

#[actix_web::test]
async fn test_store_by_reference_is_not_implemented() {
    let app = app!();

    let req = action_request(json!({
        "@type": "CreateAction",
        "identifier": "wf-ref",
        "object": { "contentUrl": "s3://elsewhere/some/key.json" }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "not_implemented");
}

#[actix_web::test]
async fn test_retrieve_unknown_object_is_not_found() {
    let app = app!();

    let req = action_request(json!({
        "@type": "RetrieveAction",
        "identifier": "ghost",
        "object": { "contentUrl": "s3://px-semantic/workflow-results/default/ghost.json" }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["identifier"], "ghost");
}

#[actix_web::test]
async fn test_retrieve_with_foreign_scheme() {
    let app = app!();

    let req = action_request(json!({
        "@type": "RetrieveAction",
        "identifier": "wf-1",
        "object": { "contentUrl": "http://not-s3" }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "invalid_location");
}

#[actix_web::test]
async fn test_health_and_docs() {
    let app = app!();

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");

    let req = test::TestRequest::get().uri("/v1/api/docs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["serviceId"], "workflow-storage");
    assert!(body["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .any(|endpoint| endpoint["path"] == "/v1/api/semantic/action"));
}

#[actix_web::test]
async fn test_backend_write_failure_is_server_error() {
    let store = Arc::new(MockObjectStore::new());
    store.set_fail_writes(true);
    let state = AppState::with_store(AppConfig::default(), store);
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let req = action_request(json!({
        "@type": "CreateAction",
        "identifier": "wf-down",
        "object": { "text": "payload" }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["actionStatus"], "FailedActionStatus");
    assert_eq!(body["error"]["code"], "storage_write_error");
    assert_eq!(body["error"]["message"], "failed to store data");
}

#[actix_web::test]
async fn test_backend_read_failure_is_server_error() {
    let store = Arc::new(MockObjectStore::new());
    store.set_fail_reads(true);
    let state = AppState::with_store(AppConfig::default(), store);
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let req = action_request(json!({
        "@type": "RetrieveAction",
        "identifier": "wf-1",
        "object": { "contentUrl": "s3://px-semantic/workflow-results/default/wf-1.json" }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "storage_read_error");
    assert_eq!(body["error"]["message"], "failed to read data");
}

#[actix_web::test]
async fn test_oversized_body_is_rejected() {
    let mut config = AppConfig::default();
    config.server.max_payload_size = 64;
    let state = AppState::with_store(config, Arc::new(MockObjectStore::new()));
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let req = action_request(json!({
        "@type": "CreateAction",
        "identifier": "wf-big",
        "object": { "text": "x".repeat(256) }
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
