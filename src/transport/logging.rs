//! HTTP Status Logging
//!
//! 按响应状态码记录日志：4xx 记 warn，5xx 记 error

use axum::{extract::Request, middleware::Next, response::Response};

use super::context::REQUEST_ID_HEADER;

/// HTTP 状态码日志中间件
pub async fn status_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            request_id = %request_id,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            request_id = %request_id,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}
