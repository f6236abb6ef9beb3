use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

pub const MISSING_NEWS_TEXT: &str = "뉴스 텍스트가 필요합니다.";
pub const MISSING_MESSAGES: &str = "메시지가 필요합니다.";
pub const INTERNAL_ERROR: &str = "서버 내부 오류";
pub const UPSTREAM_FAILED: &str = "OpenAI API 호출 실패";

/// JSON error body `{error, details?}` with its status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            details: None,
        }
    }

    pub fn upstream(status: StatusCode, details: Value) -> Self {
        Self {
            status,
            error: UPSTREAM_FAILED.to_string(),
            details: Some(details),
        }
    }
}

impl From<pn_core::Error> for ApiError {
    fn from(error: pn_core::Error) -> Self {
        match error {
            pn_core::Error::InvalidInput(message) => ApiError::bad_request(message),
            pn_core::Error::Upstream { details, .. } => {
                ApiError::upstream(StatusCode::INTERNAL_SERVER_ERROR, details)
            }
            other => {
                tracing::error!("🚨 Request failed: {}", other);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: INTERNAL_ERROR.to_string(),
                    details: Some(Value::String(other.to_string())),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({"error": self.error, "details": details}),
            None => json!({"error": self.error}),
        };
        (self.status, Json(body)).into_response()
    }
}
