//! Server Bundle
//!
//! 组装中间件与端点，提供全局错误编码器和请求增强函数，
//! 并管理启动/关闭生命周期。

pub mod encoder;
pub mod endpoint;
pub mod lifecycle;
pub mod middleware;

use std::sync::Arc;

use http::request::Parts;
use thiserror::Error;

use crate::logger::Logger;
use crate::service::Service;
use crate::transport::{Endpoint, RequestContext, RequestFunc, RequestId};

pub use encoder::{ErrorEncoder, ErrorEnvelope};
pub use endpoint::{EndpointConfig, EndpointError, Endpoints};
pub use lifecycle::{Lifecycle, LifecycleError, LifecycleState};
pub use middleware::{Middleware, MiddlewareConfig, MiddlewareError};

/// 服务器构造错误
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to create middleware: {0}")]
    Middleware(#[from] MiddlewareError),

    #[error("failed to create endpoints: {0}")]
    Endpoint(#[from] EndpointError),
}

impl ServerError {
    /// 根因是否为配置无效
    pub fn is_invalid_config(&self) -> bool {
        match self {
            ServerError::InvalidConfig(_) => true,
            ServerError::Middleware(e) => e.is_invalid_config(),
            ServerError::Endpoint(e) => e.is_invalid_config(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    // Dependencies
    pub logger: Option<Logger>,
    pub service: Option<Arc<Service>>,
}

/// 服务器
///
/// 独占其中间件与端点实例；传输层通过 `endpoints`、`error_encoder`、
/// `request_funcs` 获取路由表与全局处理函数。
pub struct Server {
    logger: Logger,
    endpoints: Vec<Arc<dyn Endpoint>>,
    error_encoder: ErrorEncoder,
    request_funcs: Vec<RequestFunc>,
    lifecycle: Lifecycle,
}

impl Server {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let logger = config
            .logger
            .ok_or_else(|| ServerError::InvalidConfig("logger must not be empty".to_string()))?;
        let service = config
            .service
            .ok_or_else(|| ServerError::InvalidConfig("service must not be empty".to_string()))?;

        let middleware = Middleware::new(MiddlewareConfig {
            logger: Some(logger.component("middleware")),
            service: Some(service.clone()),
        })?;

        let endpoints = Endpoints::new(EndpointConfig {
            logger: Some(logger.component("endpoint")),
            middleware: Some(Arc::new(middleware)),
            service: Some(service),
        })?;
        let version: Arc<dyn Endpoint> = endpoints.version;

        Ok(Self {
            logger,
            endpoints: vec![version],
            error_encoder: ErrorEncoder::new(),
            request_funcs: vec![request_id_func()],
            lifecycle: Lifecycle::new(),
        })
    }

    /// 启动，最多执行一次
    pub fn boot(&self) -> Result<(), LifecycleError> {
        self.lifecycle.boot(|| {
            tracing::info!(
                parent: self.logger.span(),
                endpoints = self.endpoints.len(),
                "Server booted"
            );
        })
    }

    /// 关闭，最多执行一次；未启动时返回错误
    pub fn shutdown(&self) -> Result<(), LifecycleError> {
        self.lifecycle.shutdown(|| {
            tracing::info!(parent: self.logger.span(), "Server shut down");
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn endpoints(&self) -> &[Arc<dyn Endpoint>] {
        &self.endpoints
    }

    pub fn error_encoder(&self) -> &ErrorEncoder {
        &self.error_encoder
    }

    pub fn request_funcs(&self) -> &[RequestFunc] {
        &self.request_funcs
    }
}

/// 为每个请求写入请求 ID
fn request_id_func() -> RequestFunc {
    Arc::new(|ctx: RequestContext, parts: &Parts| ctx.with(RequestId::from_parts(parts)))
}
