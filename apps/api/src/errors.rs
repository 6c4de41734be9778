use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::chat::agent::AgentError;
use crate::ingest::IngestError;
use crate::page::{FormError, PageError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Form incomplete")]
    Form(Vec<FormError>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<PageError> for AppError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::Form(errors) => AppError::Form(errors),
            PageError::ModeLocked | PageError::ChatInactive => AppError::Conflict(err.to_string()),
            PageError::UnknownMode(_) | PageError::EmptyMessage => {
                AppError::Validation(err.to_string())
            }
            PageError::NotPdf => AppError::UnprocessableEntity(err.to_string()),
            PageError::Upload(e) => AppError::Internal(anyhow::Error::new(e)),
            PageError::Agent(e) => e.into(),
        }
    }
}

impl From<AgentError> for AppError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Ingest(IngestError::Io { .. }) => AppError::Internal(err.into()),
            AgentError::Ingest(e) => AppError::UnprocessableEntity(e.to_string()),
            AgentError::Index(_) | AgentError::Llm(_) => AppError::Llm(err.to_string()),
            AgentError::Task(_) => AppError::Internal(err.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Form(errors) => {
                let fields: Vec<_> = errors
                    .iter()
                    .map(|e| json!({ "field": e.field(), "message": e.to_string() }))
                    .collect();
                let body = Json(json!({
                    "error": {
                        "code": "FORM_INCOMPLETE",
                        "message": "Required fields are missing",
                        "fields": fields
                    }
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The model backend failed to answer".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
