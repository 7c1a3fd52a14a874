use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned to the client when no word was supplied.
pub const MISSING_WORD: &str = "Se necesita una palabra";

/// Generic message returned to the client when the provider call fails.
pub const GENERATION_FAILED: &str = "Error generando audio";

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Upstream error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },
}

impl AppError {
    pub fn missing_word() -> Self {
        AppError::Validation(MISSING_WORD.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Upstream {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: msg,
                        details: None,
                    },
                )
            }
            AppError::Upstream { status, message } => {
                tracing::error!(upstream_status = ?status, "TTS error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: GENERATION_FAILED.to_string(),
                        details: Some(message),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
