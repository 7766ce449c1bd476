use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use ingesta_application::commands::ingest_commands::{
    self, IngestContext, IngestRequest,
};
use ingesta_application::AppState;
use ingesta_domain::IngestReceipt;

use crate::error::HttpError;
use crate::middleware::{content_encoding, extract_api_key};

pub async fn ingest_raw(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<IngestReceipt>, HttpError> {
    let context = IngestContext::capture();
    let request = IngestRequest {
        api_key: extract_api_key(&headers),
        content_encoding: content_encoding(&headers),
        body: &body,
    };
    let receipt = ingest_commands::process_raw_ingest(&state, request, context).await?;
    Ok(Json(receipt))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::{HeaderValue, StatusCode};
    use axum::response::{IntoResponse, Response};
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use serde_json::{json, Value};

    use ingesta_domain::ports::RawStorageWriter;
    use ingesta_domain::{RuntimeConfig, StorageError, StorageKey};

    use super::*;
    use crate::middleware::API_KEY_HEADER;

    const STORAGE_SECRET: &str = "c3VwZXItc2VjcmV0LWFjY291bnQta2V5";

    #[derive(Default)]
    struct CountingWriter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RawStorageWriter for CountingWriter {
        async fn write(&self, _: &StorageKey, _: Vec<u8>, _: bool) -> Result<(), StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn describe(&self) -> String {
            "memory://counting".to_string()
        }
    }

    struct LeakyFailingWriter;

    #[async_trait]
    impl RawStorageWriter for LeakyFailingWriter {
        async fn write(&self, _: &StorageKey, _: Vec<u8>, _: bool) -> Result<(), StorageError> {
            Err(StorageError::Transport(format!(
                "connection refused (AccountKey={})",
                STORAGE_SECRET
            )))
        }

        fn describe(&self) -> String {
            "memory://failing".to_string()
        }
    }

    fn state(config: RuntimeConfig, writer: Arc<dyn RawStorageWriter>) -> AppState {
        AppState::new(config, Some(writer))
    }

    async fn call(state: AppState, headers: HeaderMap, body: &[u8]) -> (StatusCode, Value) {
        let response: Response = ingest_raw(State(state), headers, Bytes::copy_from_slice(body))
            .await
            .into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn valid_single_object_returns_ok_with_path_and_count() {
        let writer = Arc::new(CountingWriter::default());
        let (status, body) = call(
            state(RuntimeConfig::default(), writer.clone()),
            HeaderMap::new(),
            br#"{"nit":"800","empresa":"Acme","ciiu":"4690"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));
        assert_eq!(body["records"], json!(1));
        assert_eq!(body["shape"], json!("single"));
        assert_eq!(body["validation"], json!({"mode": "full", "validated": 1}));
        let path = body["path"].as_str().expect("path");
        assert!(path.starts_with("ingesta_ccma/year="));
        assert!(path.contains(body["ingest_id"].as_str().expect("ingest_id")));
        assert_eq!(writer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let writer = Arc::new(CountingWriter::default());
        let (status, body) =
            call(state(RuntimeConfig::default(), writer.clone()), HeaderMap::new(), b"{oops").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], json!("malformed_json"));
        assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_array_is_bad_request_without_write() {
        let writer = Arc::new(CountingWriter::default());
        let (status, body) =
            call(state(RuntimeConfig::default(), writer.clone()), HeaderMap::new(), b"[]").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], json!("empty_batch"));
        assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn violations_are_listed_with_index_and_missing_fields() {
        let writer = Arc::new(CountingWriter::default());
        let (status, body) = call(
            state(RuntimeConfig::default(), writer.clone()),
            HeaderMap::new(),
            br#"[{"nit":"1","empresa":"A","ciiu":"1"},{"nit":"2","empresa":"B"},5]"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], json!("missing_fields"));
        assert_eq!(
            body["violations"],
            json!([
                {"index": 1, "kind": "missing_fields", "missing": ["ciiu"]},
                {"index": 2, "kind": "not_an_object"}
            ])
        );
        assert!(body.get("truncated").is_none());
        assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn configured_key_without_header_is_unauthorized() {
        let writer = Arc::new(CountingWriter::default());
        let config = RuntimeConfig {
            api_key: Some("clave-123".to_string()),
            ..RuntimeConfig::default()
        };
        let (status, body) = call(
            state(config, writer.clone()),
            HeaderMap::new(),
            br#"{"nit":"1","empresa":"A","ciiu":"1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["kind"], json!("unauthorized"));
        assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn configured_key_with_matching_header_is_accepted() {
        let writer = Arc::new(CountingWriter::default());
        let config = RuntimeConfig {
            api_key: Some("clave-123".to_string()),
            ..RuntimeConfig::default()
        };
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("clave-123"));

        let (status, _) = call(
            state(config, writer.clone()),
            headers,
            br#"{"nit":"1","empresa":"A","ciiu":"1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(writer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gzip_encoded_body_is_accepted() {
        let writer = Arc::new(CountingWriter::default());
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(br#"{"body":[{"nit":"1","empresa":"A","ciiu":"1"}]}"#)
            .expect("write");
        let compressed = encoder.finish().expect("finish");
        let mut headers = HeaderMap::new();
        headers.insert("content-encoding", HeaderValue::from_static("gzip"));

        let (status, body) =
            call(state(RuntimeConfig::default(), writer.clone()), headers, &compressed).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shape"], json!("envelope"));
    }

    #[tokio::test]
    async fn gzip_body_inflating_past_the_limit_is_payload_too_large() {
        let writer = Arc::new(CountingWriter::default());
        let config = RuntimeConfig {
            max_body_bytes: 1024,
            ..RuntimeConfig::default()
        };
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&vec![b' '; 64 * 1024]).expect("write");
        let compressed = encoder.finish().expect("finish");
        let mut headers = HeaderMap::new();
        headers.insert("content-encoding", HeaderValue::from_static("gzip"));

        let (status, body) = call(state(config, writer.clone()), headers, &compressed).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["kind"], json!("payload_too_large"));
        assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn storage_failure_is_internal_error_without_leaking_credentials() {
        let (status, body) = call(
            state(RuntimeConfig::default(), Arc::new(LeakyFailingWriter)),
            HeaderMap::new(),
            br#"{"nit":"1","empresa":"A","ciiu":"1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], json!("storage_unavailable"));
        assert!(!body.to_string().contains(STORAGE_SECRET));
        assert!(!body.to_string().contains("AccountKey"));
    }

    #[tokio::test]
    async fn missing_storage_configuration_is_internal_error() {
        let app_state = AppState::new(RuntimeConfig::default(), None);
        let (status, body) = call(app_state, HeaderMap::new(), b"{}").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], json!("misconfigured_server"));
    }
}
