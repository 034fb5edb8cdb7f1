//! End-to-end tests of the action service against the in-memory store

#[cfg(test)]
mod integration_tests {
    use crate::action::{derive_key, ActionEnvelope, ActionResult, ErrorKind, ResponseEnvelope};
    use crate::config::{ActionConfig, ObjectStoreConfig};
    use crate::service::ActionService;
    use crate::storage::mock_store::MockObjectStore;
    use serde_json::json;
    use std::path::Path;
    use std::sync::Arc;

    fn service(output_dir: &Path) -> ActionService {
        let actions = ActionConfig {
            output_dir: output_dir.to_path_buf(),
            ..ActionConfig::default()
        };
        ActionService::new(Arc::new(MockObjectStore::new()), &ObjectStoreConfig::default(), actions)
    }

    async fn submit(service: &ActionService, value: serde_json::Value) -> ResponseEnvelope {
        let envelope: ActionEnvelope = serde_json::from_value(value).unwrap();
        service.submit_action(envelope).await
    }

    fn stored_uri(envelope: &ResponseEnvelope) -> String {
        match envelope.result.as_ref() {
            Some(ActionResult::Stored(result)) => result.location.to_uri(),
            other => panic!("expected stored result, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_store_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let response = submit(&service, json!({
            "@type": "CreateAction",
            "identifier": "wf-1",
            "namespace": "default",
            "object": { "text": "{\"a\":1}", "encodingFormat": "application/json" }
        })).await;

        assert!(response.is_completed());
        let Some(ActionResult::Stored(result)) = &response.result else { panic!("expected stored result") };
        assert_eq!(result.location.to_uri(), "s3://px-semantic/workflow-results/default/wf-1.json");
        assert_eq!(result.size, "{\"a\":1}".len() as u64);
        assert_eq!(result.format, "application/json");
    }

    #[actix_web::test]
    async fn test_stored_key_matches_layout_for_many_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        for (namespace, identifier) in [("default", "a"), ("run-1", "step.2"), ("ns with space", "x_y")] {
            let response = submit(&service, json!({
                "@type": "StoreAction",
                "identifier": identifier,
                "namespace": namespace,
                "object": { "text": "payload" }
            })).await;

            let Some(ActionResult::Stored(result)) = &response.result else { panic!("expected stored result") };
            assert_eq!(result.location.key, derive_key(namespace, identifier));
            assert_eq!(result.location.key, format!("workflow-results/{}/{}.json", namespace, identifier));
        }
    }

    #[actix_web::test]
    async fn test_store_then_retrieve_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let payload = "line one\nline two";

        let stored = submit(&service, json!({
            "@type": "UploadAction",
            "identifier": "wf-rt",
            "object": { "text": payload, "encodingFormat": "text/plain" }
        })).await;
        let uri = stored_uri(&stored);

        let retrieved = submit(&service, json!({
            "@type": "RetrieveAction",
            "identifier": "wf-rt",
            "object": { "contentUrl": uri }
        })).await;

        assert!(retrieved.is_completed());
        let Some(ActionResult::Retrieved(result)) = &retrieved.result else { panic!("expected retrieved result") };
        assert_eq!(result.inline_data().map(|d| d.as_ref()), Some(payload.as_bytes()));
        assert_eq!(result.format, "text/plain");
        assert_eq!(result.size, payload.len() as u64);
    }

    #[actix_web::test]
    async fn test_retrieve_inline_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        submit(&service, json!({
            "@type": "CreateAction",
            "identifier": "wf-1",
            "object": { "text": "{\"a\":1}", "encodingFormat": "application/json" }
        })).await;

        let response = submit(&service, json!({
            "@type": "RetrieveAction",
            "identifier": "wf-1",
            "object": { "contentUrl": "s3://px-semantic/workflow-results/default/wf-1.json" }
        })).await;

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["actionStatus"], "CompletedActionStatus");
        assert_eq!(value["result"]["output"], "{\"a\":1}");
        assert_eq!(value["result"]["encodingFormat"], "application/json");
        assert!(value["result"].get("contentUrl").is_none());
    }

    #[actix_web::test]
    async fn test_retrieve_missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let response = submit(&service, json!({
            "@type": "FetchAction",
            "identifier": "never-stored",
            "object": { "contentUrl": "s3://px-semantic/workflow-results/default/never-stored.json" }
        })).await;

        assert!(!response.is_completed());
        assert!(response.result.is_none());
        assert_eq!(response.error_kind(), Some(ErrorKind::NotFound));
    }

    #[actix_web::test]
    async fn test_store_empty_payload_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let response = submit(&service, json!({
            "@type": "CreateAction",
            "identifier": "wf-empty",
            "object": { "text": "" }
        })).await;

        assert_eq!(response.error_kind(), Some(ErrorKind::NoData));
        assert_eq!(response.identifier.as_deref(), Some("wf-empty"));
    }

    #[actix_web::test]
    async fn test_retrieve_wrong_scheme_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let response = submit(&service, json!({
            "@type": "RetrieveAction",
            "identifier": "wf-1",
            "object": { "contentUrl": "http://not-s3" }
        })).await;

        assert_eq!(response.error_kind(), Some(ErrorKind::InvalidLocation));
    }

    #[actix_web::test]
    async fn test_retrieve_to_default_file_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let stored = submit(&service, json!({
            "@type": "CreateAction",
            "identifier": "wf-2",
            "object": { "text": "file bound bytes" }
        })).await;

        let response = submit(&service, json!({
            "@type": "RetrieveAction",
            "identifier": "wf-2",
            "object": { "contentUrl": stored_uri(&stored) },
            "properties": { "outputType": "file" }
        })).await;

        let Some(ActionResult::Retrieved(result)) = &response.result else { panic!("expected retrieved result") };
        let path = result.file_location().expect("file location");
        assert!(result.inline_data().is_none());
        assert!(path.to_string_lossy().ends_with("wf-2-result.dat"));
        assert_eq!(path, dir.path().join("wf-2-result.dat"));
        assert_eq!(std::fs::read(path).unwrap(), b"file bound bytes");
    }

    #[actix_web::test]
    async fn test_explicit_output_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let explicit = dir.path().join("custom/sub/result.json");

        let stored = submit(&service, json!({
            "@type": "CreateAction",
            "identifier": "wf-3",
            "object": { "text": "{}" }
        })).await;

        let response = submit(&service, json!({
            "@type": "DownloadAction",
            "identifier": "wf-3",
            "object": { "contentUrl": stored_uri(&stored) },
            "properties": { "outputType": "file", "outputFile": explicit.to_string_lossy() }
        })).await;

        let Some(ActionResult::Retrieved(result)) = &response.result else { panic!("expected retrieved result") };
        assert_eq!(result.file_location(), Some(explicit.as_path()));
        assert!(!dir.path().join("wf-3-result.dat").exists());
        assert_eq!(std::fs::read(&explicit).unwrap(), b"{}");
    }

    #[actix_web::test]
    async fn test_local_write_failure_fails_the_retrieve() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let stored = submit(&service, json!({
            "@type": "CreateAction",
            "identifier": "wf-4",
            "object": { "text": "data" }
        })).await;

        let response = submit(&service, json!({
            "@type": "RetrieveAction",
            "identifier": "wf-4",
            "object": { "contentUrl": stored_uri(&stored) },
            "properties": { "outputFile": blocker.join("out.dat").to_string_lossy() }
        })).await;

        assert_eq!(response.error_kind(), Some(ErrorKind::LocalWriteError));
        assert!(response.result.is_none());
    }

    #[actix_web::test]
    async fn test_every_successful_retrieve_has_exactly_one_destination() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let stored = submit(&service, json!({
            "@type": "CreateAction",
            "identifier": "wf-5",
            "object": { "text": "abc" }
        })).await;
        let uri = stored_uri(&stored);

        let hint_sets = [
            json!(null),
            json!({ "outputType": "inline" }),
            json!({ "outputType": "file" }),
            json!({ "outputFile": dir.path().join("x.dat").to_string_lossy() }),
            json!({ "outputType": "something-else" }),
        ];
        for properties in hint_sets {
            let mut request = json!({
                "@type": "RetrieveAction",
                "identifier": "wf-5",
                "object": { "contentUrl": uri }
            });
            if !properties.is_null() {
                request["properties"] = properties;
            }

            let response = submit(&service, request).await;
            let Some(ActionResult::Retrieved(result)) = &response.result else { panic!("expected retrieved result") };
            assert!(result.inline_data().is_some() != result.file_location().is_some());
        }
    }

    #[actix_web::test]
    async fn test_restore_overwrites_previous_object() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        for text in ["v1", "v2"] {
            submit(&service, json!({
                "@type": "UpdateAction",
                "identifier": "wf-6",
                "object": { "text": text }
            })).await;
        }

        let response = submit(&service, json!({
            "@type": "RetrieveAction",
            "identifier": "wf-6",
            "object": { "contentUrl": "s3://px-semantic/workflow-results/default/wf-6.json" }
        })).await;

        let Some(ActionResult::Retrieved(result)) = &response.result else { panic!("expected retrieved result") };
        assert_eq!(result.inline_data().map(|d| d.as_ref()), Some(&b"v2"[..]));
    }
}
