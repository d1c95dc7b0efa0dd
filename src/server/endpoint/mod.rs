//! Endpoints
//!
//! 每个业务能力一个端点，由 decoder、被中间件包装的服务调用、encoder 组成

pub mod version;

use std::sync::Arc;

use thiserror::Error;

use crate::logger::Logger;
use crate::server::middleware::Middleware;
use crate::service::Service;

/// 端点构造错误
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to create version endpoint: {0}")]
    Version(#[source] Box<EndpointError>),
}

impl EndpointError {
    /// 根因是否为配置无效
    pub fn is_invalid_config(&self) -> bool {
        match self {
            EndpointError::InvalidConfig(_) => true,
            EndpointError::Version(inner) => inner.is_invalid_config(),
        }
    }
}

/// 端点集合配置
#[derive(Default)]
pub struct EndpointConfig {
    // Dependencies
    pub logger: Option<Logger>,
    pub middleware: Option<Arc<Middleware>>,
    pub service: Option<Arc<Service>>,
}

/// 端点集合
pub struct Endpoints {
    pub version: Arc<version::Endpoint>,
}

impl Endpoints {
    pub fn new(config: EndpointConfig) -> Result<Self, EndpointError> {
        let logger = config
            .logger
            .ok_or_else(|| EndpointError::InvalidConfig("logger must not be empty".to_string()))?;
        let middleware = config
            .middleware
            .ok_or_else(|| {
                EndpointError::InvalidConfig("middleware must not be empty".to_string())
            })?;
        let service = config
            .service
            .ok_or_else(|| EndpointError::InvalidConfig("service must not be empty".to_string()))?;

        let version = version::Endpoint::new(version::EndpointConfig {
            logger: Some(logger.component("version-endpoint")),
            middleware: Some(middleware),
            service: Some(service),
        })
        .map_err(|e| EndpointError::Version(Box::new(e)))?;

        Ok(Self {
            version: Arc::new(version),
        })
    }
}
