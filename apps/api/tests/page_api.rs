mod common;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{KeywordEmbedder, ScriptedGenerator};
use resume_chat::chat::agent::{AgentConfig, AgentError, ChatAgent, ModelBackend, ResumeAgent};
use resume_chat::chat::session::InMemorySessionStore;
use resume_chat::chat::ChatMode;
use resume_chat::config::Config;
use resume_chat::ingest::passages_from_pages;
use resume_chat::page::{AgentFactory, PageController};
use resume_chat::retrieval::EmbeddingIndex;
use resume_chat::routes::build_router;
use resume_chat::state::AppState;

const BOUNDARY: &str = "resume-chat-test-boundary";

/// Builds real agents over a fixed resume text and fake model backends.
struct FakeBackendFactory;

#[async_trait]
impl AgentFactory for FakeBackendFactory {
    async fn build(
        &self,
        mode: ChatMode,
        job_summary: &str,
        _resume_path: &Path,
    ) -> Result<Arc<dyn ChatAgent>, AgentError> {
        let embedder = Arc::new(KeywordEmbedder::default());
        let passages = passages_from_pages(&["5 years Python, no Go experience".to_string()]);
        let index = EmbeddingIndex::build(passages, embedder.as_ref()).await?;
        let backend = ModelBackend {
            generator: Arc::new(ScriptedGenerator::new("Rating: 5/10\n- Learn Go")),
            embedder,
        };
        Ok(Arc::new(ResumeAgent::from_index(
            AgentConfig::new(mode, job_summary),
            index,
            backend,
            Arc::new(InMemorySessionStore::new()),
        )))
    }
}

fn app(dir: &tempfile::TempDir) -> Router {
    let page = PageController::new(dir.path().join("resume.pdf"), Arc::new(FakeBackendFactory));
    build_router(AppState::new(Config::default(), page))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload_request(field: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"resume.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/page/resume")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn empty_post(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);
    let (status, body) = send(
        &app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn submitting_empty_form_lists_each_missing_field() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, body) = send(&app, empty_post("/api/v1/page/submit")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "FORM_INCOMPLETE");
    let fields: Vec<&str> = body["error"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["job_description", "resume", "mode"]);
    assert_eq!(body["error"]["fields"][0]["message"], "Enter a job description");
}

#[tokio::test]
async fn full_flow_reaches_chat_and_answers() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/v1/page/job-description",
            json!({ "text": "Backend engineer, Go and distributed systems" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode_selectable"], true);
    assert_eq!(body["phase"], "form_incomplete");

    let (status, body) = send(&app, upload_request("resume", b"%PDF-1.4\n%test\n")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resume_uploaded"], true);
    assert!(dir.path().join("resume.pdf").exists());

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/v1/page/mode",
            json!({ "mode": "Enhance resume" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "form_valid");
    assert_eq!(body["agent_generation"], 1);

    let (status, body) = send(&app, empty_post("/api/v1/page/submit")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "chatting");

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/page/messages",
            json!({ "content": "Rate my resume" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Rating: 5/10\n- Learn Go");
    assert_eq!(body["page"]["transcript"].as_array().unwrap().len(), 2);
    assert_eq!(body["page"]["transcript"][0]["role"], "user");

    // Switching mode clears the displayed transcript and builds a new agent.
    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/v1/page/mode",
            json!({ "mode": "Simulate interview" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agent_generation"], 2);
    assert_eq!(body["transcript"].as_array().unwrap().len(), 0);
    assert_eq!(body["mode"], "Simulate interview");
}

#[tokio::test]
async fn message_before_submit_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/page/messages",
            json!({ "content": "hello" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn mode_is_locked_until_job_description_entered() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/v1/page/mode",
            json!({ "mode": "Enhance resume" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_mode_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, body) = send(
        &app,
        json_request(Method::PUT, "/api/v1/page/mode", json!({ "mode": "Roast" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn non_pdf_upload_is_unprocessable() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, _) = send(&app, upload_request("resume", b"GIF89a")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!dir.path().join("resume.pdf").exists());
}

#[tokio::test]
async fn upload_without_resume_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, body) = send(&app, upload_request("avatar", b"%PDF-1.4")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("resume"));
}
