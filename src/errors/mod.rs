/// Unified error handling module
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("External API error: {0}")]
    ExternalApi(#[from] reqwest::Error),
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ExternalApi(e) => match e.status().map(|s| s.as_u16()) {
                Some(403) => "UPSTREAM_403",
                Some(404) => "UPSTREAM_404",
                Some(429) => "UPSTREAM_429",
                Some(500..=599) => "UPSTREAM_5XX",
                _ => "UPSTREAM_ERROR",
            },
            ApiError::Catalog(_) => "CATALOG_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::ExternalApi(_) => self.to_string(),
            ApiError::Catalog(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg)
            | ApiError::InvalidInput(msg) => msg.clone(),
        };

        let error_response = ErrorResponse {
            ok: false,
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
            },
        };

        // Always HTTP 200; clients branch on `ok`
        (StatusCode::OK, Json(error_response)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
