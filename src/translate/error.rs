use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::agent::LlmError;
use crate::translate::interface::ErrorResponse;

/// Hard failures of the translate endpoint. Everything else degrades to
/// pass-through results.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    MissingConfig(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Service credits exhausted. Please contact support.")]
    QuotaExhausted,

    #[error("{0}")]
    Upstream(String),
}

impl TranslateError {
    pub fn status(&self) -> StatusCode {
        match self {
            TranslateError::BadRequest(_) => StatusCode::BAD_REQUEST,
            TranslateError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            TranslateError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            TranslateError::MissingConfig(_) | TranslateError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<LlmError> for TranslateError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential => {
                TranslateError::MissingConfig("LLM_API_KEY is not configured".to_string())
            }
            LlmError::RateLimited => TranslateError::RateLimited,
            LlmError::QuotaExhausted => TranslateError::QuotaExhausted,
            other => TranslateError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for TranslateError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
