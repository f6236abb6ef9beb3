use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pn_core::{AnalysisResponse, ChatMessage, CompletionRequest, CustomLensRequest, CustomLensResult};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, MISSING_MESSAGES, MISSING_NEWS_TEXT};
use crate::AppState;

pub const PROXY_MAX_TOKENS: u32 = 1500;
pub const PROXY_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeNewsBody {
    #[serde(default)]
    pub news_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPhilosophyBody {
    #[serde(default)]
    pub news_text: Option<String>,
    #[serde(default)]
    pub strong_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub weak_keywords: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
}

fn require_news_text(news_text: Option<String>) -> Result<String, ApiError> {
    news_text
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(MISSING_NEWS_TEXT))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

pub async fn analyze_news(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeNewsBody>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let news_text = require_news_text(json_body(payload)?.news_text)?;
    info!("📰 /api/analyze-news ({} chars)", news_text.chars().count());
    Ok(Json(state.analyzer.analyze(&news_text).await))
}

pub async fn create_custom_philosophy(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CustomPhilosophyBody>, JsonRejection>,
) -> Result<Json<CustomLensResult>, ApiError> {
    let body = json_body(payload)?;
    let request = CustomLensRequest {
        news_text: require_news_text(body.news_text)?,
        strong_keywords: body.strong_keywords.unwrap_or_default(),
        weak_keywords: body.weak_keywords.unwrap_or_default(),
    };
    info!("🎨 /api/create-custom-philosophy");
    Ok(Json(state.custom_lens.generate(request).await?))
}

pub async fn proxy_chat_completion(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let messages = json_body(payload)?
        .messages
        .ok_or_else(|| ApiError::bad_request(MISSING_MESSAGES))?;
    info!("💬 /api/gpt ({} messages)", messages.len());

    let request = CompletionRequest {
        model: state.proxy_model_name.clone(),
        messages,
        max_tokens: PROXY_MAX_TOKENS,
        temperature: PROXY_TEMPERATURE,
    };
    let raw = state.inference_model.chat(&request).await?;
    let status = StatusCode::from_u16(raw.status).unwrap_or(StatusCode::BAD_GATEWAY);

    if !raw.is_success() {
        return Err(ApiError::upstream(status, raw.body));
    }
    Ok((status, Json(raw.body)))
}
