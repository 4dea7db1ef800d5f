use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::boundary::Fallback;
use crate::llm_client::LlmError;
use crate::rest::RestError;
use crate::settings::SettingsError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Transport and AI failures carry a `retry` action; not-found is terminal and
/// points home; render faults carry the boundary fallback.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("REST backend error: {0}")]
    Rest(#[from] RestError),

    #[error("AI error: {0}")]
    Llm(String),

    #[error("Local store error: {0}")]
    Store(#[from] StoreError),

    #[error("Render fault: {}", .0.message)]
    Render(Fallback),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn llm(context: &str, e: LlmError) -> Self {
        AppError::Llm(format!("{context}: {e}"))
    }
}

impl From<SettingsError> for AppError {
    fn from(e: SettingsError) -> Self {
        match e {
            SettingsError::Store(e) => AppError::Store(e),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, actions) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), vec!["go_home"]),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                vec![],
            ),
            AppError::Rest(e) => {
                tracing::error!("REST backend error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "BACKEND_ERROR",
                    "Could not reach the interview service. Please try again.".to_string(),
                    vec!["retry"],
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("AI error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AI_ERROR",
                    "The AI service failed to respond. Please try again.".to_string(),
                    vec!["retry"],
                )
            }
            AppError::Store(e) => {
                tracing::error!("Local store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "Local preferences could not be saved".to_string(),
                    vec!["retry"],
                )
            }
            AppError::Render(fallback) => {
                let body = Json(json!({
                    "error": {
                        "code": "RENDER_FAULT",
                        "message": fallback.message,
                        "view": fallback.view,
                        "actions": fallback.actions,
                        "diagnostics": fallback.diagnostics,
                    }
                }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    vec![],
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "actions": actions,
            }
        }));

        (status, body).into_response()
    }
}
