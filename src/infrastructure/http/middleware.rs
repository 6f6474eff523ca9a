//! HTTP Middleware
//!
//! 按状态码记录请求日志

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// 错误状态码日志中间件
///
/// 4xx 记 warn，5xx 记 error，其余只在 debug 级别记录。
/// 错误消息本身在 `ApiError::into_response()` 中记录。
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        tracing::error!(%method, %uri, status, elapsed_ms, "HTTP server error");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, %uri, status, elapsed_ms, "HTTP client error");
    } else {
        tracing::debug!(%method, %uri, status, elapsed_ms, "HTTP request served");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::error::ApiError;
    use axum::{
        body::{to_bytes, Body},
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    async fn ok_handler() -> &'static str {
        "OK"
    }

    async fn conflict_handler() -> Result<&'static str, ApiError> {
        Err(ApiError::Conflict("Book x already exists".to_string()))
    }

    async fn timeout_handler() -> Result<&'static str, ApiError> {
        Err(ApiError::Timeout("calibredb list timed out".to_string()))
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/ok", get(ok_handler))
            .route("/conflict", get(conflict_handler))
            .route("/timeout", get(timeout_handler))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_of(uri: &str) -> (StatusCode, String) {
        let request = HttpRequest::builder().uri(uri).body(Body::empty()).unwrap();
        let response = create_test_router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_ok_response_passes_through() {
        let (status, body) = status_of("/ok").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_client_error_body_is_preserved() {
        let (status, body) = status_of("/conflict").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, r#"{"error":"Book x already exists"}"#);
    }

    #[tokio::test]
    async fn test_timeout_status() {
        let (status, _) = status_of("/timeout").await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    }
}
