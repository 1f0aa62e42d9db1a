//! HTTPエラーレスポンス

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ecosort_common::{ValidationError, ValidationIssue};
use serde_json::json;
use std::any::Any;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("No image file provided")]
    MissingFile,

    #[error("File too large")]
    PayloadTooLarge,

    #[error("Malformed upload: {0}")]
    BadUpload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// JSONボディのパース失敗を検証エラーとして扱う
    pub fn invalid_body(message: impl Into<String>) -> Self {
        ApiError::Validation(ValidationIssue::new("body", message).into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MissingFile | ApiError::BadUpload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(err) => json!({
                "error": "Validation error",
                "details": err.issues,
            }),
            ApiError::MissingFile => json!({ "error": "No image file provided" }),
            ApiError::PayloadTooLarge => json!({ "error": "File too large" }),
            ApiError::BadUpload(message) => json!({ "error": message }),
            ApiError::Internal(message) => {
                error!(error = %message, "Request failed");
                json!({ "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// ハンドラ内のpanicを500に変換する
pub(crate) fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    };

    ApiError::Internal(message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ApiError::invalid_body("bad json").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let response = panic_response(Box::new("secret detail"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("ボディ読み込み失敗");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("JSONでない");
        assert_eq!(body["error"], "Internal server error");
        assert!(!bytes.windows(6).any(|w| w == b"secret"));
    }
}
