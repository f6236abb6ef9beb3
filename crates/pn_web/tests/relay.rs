use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use pn_core::{CompletionRequest, Error, InferenceModel, LensId, RawCompletion, Result};
use pn_inference::InferenceConfig;
use pn_web::{create_app, AppState, ServerOptions};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Debug)]
struct Unreachable;

#[async_trait]
impl InferenceModel for Unreachable {
    fn name(&self) -> &str {
        "Unreachable"
    }

    async fn chat(&self, _request: &CompletionRequest) -> Result<RawCompletion> {
        Err(Error::Inference("connection refused".to_string()))
    }
}

/// Answers every call with a fixed status and body, remembering the requests.
#[derive(Debug)]
struct Canned {
    status: u16,
    body: Value,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl Canned {
    fn new(status: u16, body: Value) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl InferenceModel for Canned {
    fn name(&self) -> &str {
        "Canned"
    }

    async fn chat(&self, request: &CompletionRequest) -> Result<RawCompletion> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(RawCompletion {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

fn app(model: Arc<dyn InferenceModel>) -> Router {
    let state = AppState::new(model, &InferenceConfig::default());
    create_app(state, &ServerOptions::default())
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_analyze_news_returns_five_fallbacks_when_backend_is_down() {
    let (status, body) = post(
        app(Arc::new(Unreachable)),
        "/api/analyze-news",
        json!({"newsText": "정부가 새로운 정책을 발표했다."}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let lenses = body.as_object().unwrap();
    assert_eq!(lenses.len(), 5);
    for lens in LensId::ALL {
        let entry = &body[lens.as_str()];
        assert_eq!(entry["keywords"].as_array().unwrap().len(), 3);
        assert!(entry["interpretation"]
            .as_str()
            .unwrap()
            .starts_with(lens.korean_name()));
    }
}

#[tokio::test]
async fn test_analyze_news_requires_news_text() {
    let (status, body) = post(app(Arc::new(Unreachable)), "/api/analyze-news", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "뉴스 텍스트가 필요합니다.");
}

#[tokio::test]
async fn test_custom_philosophy_requires_news_text() {
    let (status, body) = post(
        app(Arc::new(Unreachable)),
        "/api/create-custom-philosophy",
        json!({"strongKeywords": ["자유"]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "뉴스 텍스트가 필요합니다.");
}

#[tokio::test]
async fn test_custom_philosophy_surfaces_upstream_failure() {
    let model = Canned::new(429, json!({"error": {"message": "rate limited"}}));
    let (status, body) = post(
        app(model),
        "/api/create-custom-philosophy",
        json!({"newsText": "기사", "strongKeywords": ["평등"], "weakKeywords": []}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "OpenAI API 호출 실패");
    assert_eq!(body["details"]["error"]["message"], "rate limited");
}

#[tokio::test]
async fn test_custom_philosophy_transport_failure_is_internal_error() {
    let (status, body) = post(
        app(Arc::new(Unreachable)),
        "/api/create-custom-philosophy",
        json!({"newsText": "기사"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "서버 내부 오류");
}

#[tokio::test]
async fn test_custom_philosophy_unparseable_reply_falls_back() {
    let model = Canned::new(
        200,
        json!({"choices": [{"message": {"content": "I cannot produce JSON today"}}]}),
    );
    let (status, body) = post(
        app(model),
        "/api/create-custom-philosophy",
        json!({"newsText": "기사", "strongKeywords": ["평등"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["perspectiveName"]["korean"], "평등 중심주의");
    assert_eq!(body["analysis"]["event"]["weight"], "크게");
}

#[tokio::test]
async fn test_gpt_proxy_requires_messages() {
    let (status, body) = post(app(Arc::new(Unreachable)), "/api/gpt", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "메시지가 필요합니다.");
}

#[tokio::test]
async fn test_gpt_proxy_preserves_backend_status() {
    let model = Canned::new(401, json!({"error": {"message": "bad key"}}));
    let (status, body) = post(
        app(model),
        "/api/gpt",
        json!({"messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "OpenAI API 호출 실패");
    assert_eq!(body["details"]["error"]["message"], "bad key");
}

#[tokio::test]
async fn test_gpt_proxy_forwards_body_verbatim() {
    let reply = json!({"id": "cmpl-1", "choices": [{"message": {"role": "assistant", "content": "hello"}}]});
    let model = Canned::new(200, reply.clone());
    let (status, body) = post(
        app(model.clone()),
        "/api/gpt",
        json!({"messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, reply);

    let seen = model.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].max_tokens, 1500);
    assert_eq!(seen[0].model, InferenceConfig::default().analysis_model);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze-news")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(Arc::new(Unreachable)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
