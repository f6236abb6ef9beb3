use pn_client::api::HttpRelayClient;
use pn_client::highlight::Highlighter;
use pn_client::prelude::*;
use pn_core::{CustomLensRequest, CustomLensResult};
use pn_inference::models::create_model;
use pn_inference::{Config, InferenceConfig};
use pn_web::{create_app, AppState, ServerOptions};
use std::time::Duration;
use tokio::net::TcpListener;

const ARTICLE: &str = "정부가 새로운 노동 정책을 발표했다. 시민들은 자유와 책임 사이에서 선택을 고민하고 있으며 전문가들은 장기적인 영향을 주목하고 있다.";

/// Starts a relay backed by the offline model on a random local port.
async fn spawn_relay() -> HttpRelayClient {
    let config = Config {
        model_name: Some("dummy".to_string()),
        ..Config::default()
    };
    let model = create_model(Some(config)).await.unwrap();
    let app = create_app(
        AppState::new(model, &InferenceConfig::default()),
        &ServerOptions::default(),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    HttpRelayClient::new(&format!("http://{}", addr), Duration::from_secs(10)).unwrap()
}

#[tokio::test]
async fn test_analyze_through_live_relay() {
    let client = spawn_relay().await;
    let analysis = client.analyze(ARTICLE).await.unwrap();

    assert!(analysis.is_complete());
    for (lens, result) in analysis.iter() {
        assert_eq!(result.keywords.len(), 3, "{}", lens);
        assert!(result.interpretation.starts_with(lens.korean_name()));
    }
}

#[tokio::test]
async fn test_blank_article_surfaces_relay_rejection() {
    let client = spawn_relay().await;
    let err = client.analyze("  ").await.unwrap_err();
    match err {
        Error::Upstream { status, details } => {
            assert_eq!(status, 400);
            assert_eq!(details["error"], "뉴스 텍스트가 필요합니다.");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_custom_lens_through_live_relay() {
    let client = spawn_relay().await;
    let request = CustomLensRequest {
        news_text: ARTICLE.to_string(),
        strong_keywords: vec!["연대".to_string()],
        weak_keywords: vec!["효율".to_string()],
    };

    let lens = client.create_custom_lens(&request).await.unwrap();
    let CustomLensResult::Structured(structured) = &lens else {
        panic!("expected structured lens");
    };
    assert_eq!(structured.perspective_name.korean, "연대 실천주의");
    assert!(share_text(Some(&lens)).contains("연대 실천주의"));
}

#[tokio::test]
async fn test_controller_session_against_live_relay() {
    let client = spawn_relay().await;
    let mut controller = LensController::with_highlighter(client, Highlighter::seeded(5));

    controller.submit_article(ARTICLE).await.unwrap();
    assert_eq!(controller.view(), View::Results);

    let lens_view = controller.select_lens(LensId::Existentialism).unwrap();
    assert_eq!(lens_view.article.plain_text(), ARTICLE);
    assert!(lens_view.article.emphasized_count() >= 1);

    controller.toggle_lens_for_comparison(LensId::Existentialism).unwrap();
    let comparison = controller.toggle_lens_for_comparison(LensId::Marxism).unwrap();
    assert_eq!(comparison.cards.len(), 2);
    assert!(controller.can_recombine());
    assert!(controller.custom_lens_view().is_none());
}
