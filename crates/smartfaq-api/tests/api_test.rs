use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use mockito::Matcher;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use smartfaq_ai::{AiService, AiServiceClient};
use smartfaq_api::{build_router, config::Config, state::AppState};
use smartfaq_persist::{
    ChatRecord, ChatStore, InMemoryChatStore, NewChat, PersistError, StoreKind,
};

const BOUNDARY: &str = "smartfaq-test-boundary";

struct TestApp {
    router: Router,
    store: Arc<InMemoryChatStore>,
}

fn test_app(ai_url: &str, upload_dir: &Path) -> TestApp {
    let store = Arc::new(InMemoryChatStore::new());
    let router = app_with_store(ai_url, upload_dir, store.clone());
    TestApp { router, store }
}

fn app_with_store(ai_url: &str, upload_dir: &Path, store: Arc<dyn ChatStore>) -> Router {
    let mut config = Config::default();
    config.ai_service.url = ai_url.to_string();
    config.uploads.dir = upload_dir.to_path_buf();

    app_with_config(config, store)
}

fn app_with_config(config: Config, store: Arc<dyn ChatStore>) -> Router {
    let ai: Arc<dyn AiService> = Arc::new(
        AiServiceClient::new(config.ai_service.url.clone(), Duration::from_secs(5)).unwrap(),
    );

    build_router(Arc::new(AppState::new(config, store, ai)))
}

/// A store whose backend is gone
struct BrokenStore;

#[async_trait]
impl ChatStore for BrokenStore {
    async fn save_chat(&self, _chat: NewChat) -> smartfaq_persist::Result<ChatRecord> {
        Err(PersistError::Connection("connection reset".to_string()))
    }

    async fn recent_chats(&self, _limit: usize) -> smartfaq_persist::Result<Vec<ChatRecord>> {
        Err(PersistError::Connection("connection reset".to_string()))
    }

    fn kind(&self) -> StoreKind {
        StoreKind::MongoDb
    }
}

/// Parts are (field name, optional filename, content)
fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, file_name, content) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match file_name {
            Some(file_name) => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    name, file_name
                ));
                body.push_str("Content-Type: text/plain\r\n\r\n");
            }
            None => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    name
                ));
            }
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[tokio::test]
async fn test_liveness_returns_plain_text() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app("http://127.0.0.1:1", uploads.path());

    let response = app.router.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Smart FAQ Bot API is running");
}

#[tokio::test]
async fn test_upload_without_file_is_bad_request() {
    let mut server = mockito::Server::new_async().await;
    let ingest = server.mock("POST", "/ingest").expect(0).create_async().await;

    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(&server.url(), uploads.path());

    let response = app
        .router
        .oneshot(multipart_request(&[("comment", None, "hello")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No file uploaded");
    ingest.assert_async().await;
}

#[tokio::test]
async fn test_upload_text_field_named_file_is_not_a_file() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app("http://127.0.0.1:1", uploads.path());

    let response = app
        .router
        .oneshot(multipart_request(&[("file", None, "just text")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(dir_is_empty(uploads.path()));
}

#[tokio::test]
async fn test_upload_empty_file_input_never_reaches_ai_service() {
    let mut server = mockito::Server::new_async().await;
    let ingest = server.mock("POST", "/ingest").expect(0).create_async().await;

    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(&server.url(), uploads.path());

    let response = app
        .router
        .oneshot(multipart_request(&[("file", Some(""), "")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No file uploaded");
    assert!(dir_is_empty(uploads.path()));
    ingest.assert_async().await;
}

#[tokio::test]
async fn test_upload_non_multipart_body_is_bad_request() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app("http://127.0.0.1:1", uploads.path());

    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await.get("error").is_some());
}

#[tokio::test]
async fn test_upload_relays_ingest_reply_and_removes_temp_file() {
    let mut server = mockito::Server::new_async().await;
    let ingest = server
        .mock("POST", "/ingest")
        .match_body(Matcher::Regex("Our office is closed on Sundays".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Document processed and embedded successfully","chunks_added":2,"total_vectors":7}"#)
        .create_async()
        .await;

    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(&server.url(), uploads.path());

    let response = app
        .router
        .oneshot(multipart_request(&[(
            "file",
            Some("hours.txt"),
            "Our office is closed on Sundays",
        )]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["chunks_added"], 2);
    assert_eq!(body["total_vectors"], 7);

    ingest.assert_async().await;
    assert!(dir_is_empty(uploads.path()));
}

#[tokio::test]
async fn test_upload_relays_ai_service_error_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/ingest")
        .with_status(400)
        .with_body(r#"{"error":"Could not extract text. The PDF might be scanned (image-only)."}"#)
        .create_async()
        .await;

    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(&server.url(), uploads.path());

    let response = app
        .router
        .oneshot(multipart_request(&[("file", Some("scan.pdf"), "%PDF-1.4")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Could not extract text. The PDF might be scanned (image-only)."
    );
    assert!(dir_is_empty(uploads.path()));
}

#[tokio::test]
async fn test_upload_ai_service_crash_is_generic_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/ingest")
        .with_status(500)
        .with_body("<html>Internal Server Error</html>")
        .create_async()
        .await;

    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(&server.url(), uploads.path());

    let response = app
        .router
        .oneshot(multipart_request(&[("file", Some("notes.txt"), "some notes")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "Failed to process document");
    assert!(dir_is_empty(uploads.path()));
}

#[tokio::test]
async fn test_upload_unreachable_ai_service_still_removes_temp_file() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app("http://127.0.0.1:1", uploads.path());

    let response = app
        .router
        .oneshot(multipart_request(&[("file", Some("notes.txt"), "some notes")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(dir_is_empty(uploads.path()));
}

#[tokio::test]
async fn test_upload_creates_missing_upload_dir() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/ingest")
        .with_status(200)
        .with_body(r#"{"message":"ok"}"#)
        .create_async()
        .await;

    let root = tempfile::tempdir().unwrap();
    let uploads = root.path().join("nested").join("uploads");
    let app = test_app(&server.url(), &uploads);

    let response = app
        .router
        .oneshot(multipart_request(&[("file", Some("a.txt"), "content")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(dir_is_empty(&uploads));
}

#[tokio::test]
async fn test_chat_empty_question_never_reaches_ai_service() {
    let mut server = mockito::Server::new_async().await;
    let ask = server.mock("POST", "/ask").expect(0).create_async().await;

    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(&server.url(), uploads.path());

    for body in [json!({ "question": "" }), json!({ "question": "   " }), json!({})] {
        let response = app.router.clone().oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Question is required");
    }

    ask.assert_async().await;
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_chat_malformed_body_is_bad_request() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app("http://127.0.0.1:1", uploads.path());

    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_success_stores_exactly_one_record() {
    let mut server = mockito::Server::new_async().await;
    let ask = server
        .mock("POST", "/ask")
        .match_body(Matcher::Json(json!({ "question": "When do you open?" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"answer":"At 9am.","context_used":["We open at 9am on weekdays."]}"#)
        .create_async()
        .await;

    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(&server.url(), uploads.path());

    let response = app
        .router
        .oneshot(chat_request(json!({ "question": "When do you open?" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["answer"], "At 9am.");
    assert_eq!(body["context_used"], json!(["We open at 9am on weekdays."]));

    ask.assert_async().await;
    assert_eq!(app.store.len().await, 1);

    let stored = app.store.recent_chats(10).await.unwrap();
    assert_eq!(body["history_id"], stored[0].id.as_str());
    assert_eq!(stored[0].question, "When do you open?");
    assert_eq!(stored[0].answer, "At 9am.");
}

#[tokio::test]
async fn test_chat_ai_failure_persists_nothing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/ask")
        .with_status(502)
        .create_async()
        .await;

    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(&server.url(), uploads.path());

    let response = app
        .router
        .oneshot(chat_request(json!({ "question": "Anyone there?" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "Failed to get answer from AI");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_chat_store_failure_is_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/ask")
        .with_status(200)
        .with_body(r#"{"answer":"yes","context_used":[]}"#)
        .create_async()
        .await;

    let uploads = tempfile::tempdir().unwrap();
    let router = app_with_store(&server.url(), uploads.path(), Arc::new(BrokenStore));

    let response = router
        .oneshot(chat_request(json!({ "question": "Saved?" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "Failed to get answer from AI");
}

#[tokio::test]
async fn test_history_is_newest_first_and_capped_at_ten() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app("http://127.0.0.1:1", uploads.path());

    let base = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    for n in 0..12 {
        let chat = NewChat::new(format!("question {}", n), format!("answer {}", n))
            .with_timestamp(base + ChronoDuration::minutes(n));
        app.store.save_chat(chat).await.unwrap();
    }

    let response = app.router.oneshot(get("/api/history")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0]["question"], "question 11");
    assert_eq!(entries[9]["question"], "question 2");
    assert!(entries[0].get("_id").is_some());

    let timestamps: Vec<&str> = entries
        .iter()
        .map(|e| e["timestamp"].as_str().unwrap())
        .collect();
    let mut sorted = timestamps.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(timestamps, sorted);
}

#[tokio::test]
async fn test_history_store_failure_is_server_error() {
    let uploads = tempfile::tempdir().unwrap();
    let router = app_with_store("http://127.0.0.1:1", uploads.path(), Arc::new(BrokenStore));

    let response = router.oneshot(get("/api/history")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "Failed to fetch history");
}

#[tokio::test]
async fn test_health_reports_store_and_ai_service() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/status")
        .with_status(200)
        .with_body(r#"{"status":"running","docs_count":3}"#)
        .create_async()
        .await;

    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(&server.url(), uploads.path());

    let response = app.router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["storage"], "memory");
    assert_eq!(body["services"]["ai_service"], "available");
}

#[tokio::test]
async fn test_health_survives_ai_service_outage() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app("http://127.0.0.1:1", uploads.path());

    let response = app.router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["services"]["ai_service"], "unavailable");
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app("http://127.0.0.1:1", uploads.path());

    let response = app.router.oneshot(get("/api/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    for path in ["/api/upload", "/api/chat", "/api/history"] {
        assert!(body["paths"].get(path).is_some(), "missing {}", path);
    }
}

fn with_origin(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app("http://127.0.0.1:1", uploads.path());

    let response = app.router.oneshot(with_origin("/")).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_cors_disabled_sends_no_cors_headers() {
    let mut config = Config::default();
    config.cors.enabled = false;
    let app = app_with_config(config, Arc::new(InMemoryChatStore::new()));

    let response = app.oneshot(with_origin("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
