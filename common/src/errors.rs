//! Error types shared by every endpoint.
//!
//! Each variant maps to exactly one HTTP status and is rendered as the
//! `{"error": "<message>"}` envelope, so callers can branch on the status
//! code alone.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::ErrorBody;

/// Application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or empty required input.
    #[error("{0}")]
    Validation(String),

    /// Access key configured but not presented, or presented wrong.
    #[error("{0}")]
    Unauthorized(String),

    /// Request body larger than the configured limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The temporary profile could not be written or removed.
    #[error("{0}")]
    Storage(String),

    /// The sharing client failed. The message is the client's, unmodified.
    #[error("{0}")]
    Gateway(String),

    /// Anything else that went wrong while building the response.
    #[error("{0}")]
    Internal(String),
}

/// Result alias used across the gateway.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Storage(_) | AppError::Gateway(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::Storage(_) => "storage",
            AppError::Gateway(_) => "gateway",
            AppError::Internal(_) => "internal",
        }
    }
}

/// 请求体读取失败：超出大小限制为 413，其余按请求错误处理
impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::Validation(rejection.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        } else {
            tracing::warn!(kind = self.kind(), error = %self, "request rejected");
        }

        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
