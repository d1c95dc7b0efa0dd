//! Error Encoder
//!
//! 全局错误编码器：所有端点的失败都经由这里转换为 HTTP 响应。
//! 阶段标记只决定状态码，响应体始终为 `{"error": <message>}`。

use std::error::Error as StdError;
use std::sync::Arc;

use axum::body::Body;
use axum::response::Response;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};

use crate::transport::{json_response, Stage, TransportError, JSON_CONTENT_TYPE};

/// 统一错误响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// 业务错误状态码映射
///
/// 返回 None 表示不处理，交由下一个映射或默认值（400）。
pub type StatusMapper =
    Arc<dyn Fn(&(dyn StdError + Send + Sync + 'static)) -> Option<StatusCode> + Send + Sync>;

/// 错误编码器
#[derive(Clone, Default)]
pub struct ErrorEncoder {
    business: Vec<StatusMapper>,
}

impl std::fmt::Debug for ErrorEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorEncoder")
            .field("business_mappers", &self.business.len())
            .finish()
    }
}

impl ErrorEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为 Do 阶段错误注册更细粒度的状态码映射，按注册顺序匹配
    pub fn with_business_status<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&(dyn StdError + Send + Sync + 'static)) -> Option<StatusCode>
            + Send
            + Sync
            + 'static,
    {
        self.business.push(Arc::new(mapper));
        self
    }

    /// 根据错误阶段选择状态码
    pub fn status_for(&self, err: &TransportError) -> StatusCode {
        match err.stage() {
            Some(Stage::Encode) => StatusCode::BAD_REQUEST,
            Some(Stage::Decode) => StatusCode::BAD_REQUEST,
            Some(Stage::Do) => self
                .business
                .iter()
                .find_map(|mapper| mapper(err.inner()))
                .unwrap_or(StatusCode::BAD_REQUEST),
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 编码错误响应
    pub fn encode(&self, err: &TransportError) -> Response {
        let status = self.status_for(err);
        let stage = err
            .stage()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        if status.is_server_error() {
            tracing::error!(
                stage = %stage,
                status = status.as_u16(),
                error = %err,
                "Request failed"
            );
        } else {
            tracing::warn!(
                stage = %stage,
                status = status.as_u16(),
                error = %err,
                "Request rejected"
            );
        }

        self.encode_status(status, err.to_string())
    }

    /// 以指定状态码输出统一错误响应体
    pub fn encode_status(&self, status: StatusCode, message: impl Into<String>) -> Response {
        let envelope = ErrorEnvelope::new(message);
        json_response(status, &envelope).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to serialize error envelope");
            let mut response = Response::new(Body::from(r#"{"error":"internal error"}"#));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
            response
        })
    }
}
