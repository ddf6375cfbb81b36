use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Config Error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Env File Error: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Http Error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Status Error: {status}, body: {body}")]
    Status { status: u16, body: String },

    #[error("Url Error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal Error: {0}")]
    Internal(String),
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NotFound",
            AppError::BadRequest(_) => "BadRequest",
            AppError::Config(_) => "Config",
            AppError::EnvFile(_) => "EnvFile",
            AppError::Http(_) => "Http",
            AppError::Status { .. } => "Status",
            AppError::Url(_) => "Url",
            AppError::Json(_) => "Json",
            AppError::Internal(_) => "Internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_type = self.kind();
        let (status, message) = match &self {
            AppError::NotFound(msg) => {
                tracing::warn!(
                    error_type = %error_type,
                    status_code = %StatusCode::NOT_FOUND,
                    message = %msg,
                    "Resource not found"
                );
                (StatusCode::NOT_FOUND, msg.clone())
            }
            AppError::BadRequest(msg) => {
                tracing::warn!(
                    error_type = %error_type,
                    status_code = %StatusCode::BAD_REQUEST,
                    message = %msg,
                    "Bad Request"
                );
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Http(_) | AppError::Status { .. } => {
                let msg = self.to_string();
                tracing::error!(
                    error_type = %error_type,
                    status_code = %StatusCode::INTERNAL_SERVER_ERROR,
                    message = %msg,
                    "Upstream request failed"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            _ => {
                let msg = self.to_string();
                tracing::error!(
                    error_type = %error_type,
                    status_code = %StatusCode::INTERNAL_SERVER_ERROR,
                    message = %msg,
                    "Internal server error"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });
        (status, body).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
pub type ApiResult<T> = std::result::Result<Json<T>, AppError>;
