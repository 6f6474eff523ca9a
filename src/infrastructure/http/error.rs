//! HTTP Error Handling
//!
//! 错误体统一为 `{"error": "<message>"}`，状态码反映错误类别。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::{ApplicationError, CalibreError};
use crate::domain::book::BookError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Timeout(String),
    Conflict(String),
    PayloadTooLarge(String),
    UnsupportedMediaType(String),
    /// 请求体结构正确但字段无效
    Unprocessable(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Timeout(msg)
            | ApiError::Conflict(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::UnsupportedMediaType(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.message(), "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self.message(), "Request rejected");
        }

        let body = ErrorResponse {
            error: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        let message = e.to_string();
        match e {
            ApplicationError::NotFound { .. } => ApiError::NotFound(message),
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::Conflict(msg) => ApiError::Conflict(msg),
            ApplicationError::InvalidOutput(_) => ApiError::Internal(message),
            ApplicationError::Calibre(err) => err.into(),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<CalibreError> for ApiError {
    fn from(e: CalibreError) -> Self {
        let message = e.to_string();
        match e {
            CalibreError::InvalidCommand { .. } => ApiError::BadRequest(message),
            CalibreError::ExecutionFailure { timed_out: true, .. } => ApiError::Timeout(message),
            CalibreError::ExecutionFailure { .. } | CalibreError::NotFound(_) => {
                ApiError::Internal(message)
            }
        }
    }
}

impl From<BookError> for ApiError {
    fn from(e: BookError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
