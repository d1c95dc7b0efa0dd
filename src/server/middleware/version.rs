//! Version Middleware

use std::sync::Arc;

use async_trait::async_trait;
use tower::BoxError;

use super::{Decorator, MiddlewareError};
use crate::logger::Logger;
use crate::service::{Service, VersionRequest, VersionResponse};
use crate::transport::{Handler, RequestContext};

/// Version 中间件配置
#[derive(Debug, Clone, Default)]
pub struct MiddlewareConfig {
    pub logger: Option<Logger>,
    pub service: Option<Arc<Service>>,
}

/// Version 中间件
///
/// 目前只记录调用并原样转发。
pub struct Middleware {
    logger: Logger,
    service: Arc<Service>,
}

impl Middleware {
    pub fn new(config: MiddlewareConfig) -> Result<Self, MiddlewareError> {
        let logger = config
            .logger
            .ok_or_else(|| MiddlewareError::InvalidConfig("logger must not be empty".to_string()))?;
        let service = config
            .service
            .ok_or_else(|| {
                MiddlewareError::InvalidConfig("service must not be empty".to_string())
            })?;

        Ok(Self { logger, service })
    }

    pub fn service(&self) -> &Arc<Service> {
        &self.service
    }
}

impl Decorator<VersionRequest, VersionResponse> for Middleware {
    fn decorate(
        &self,
        next: Arc<dyn Handler<VersionRequest, VersionResponse>>,
    ) -> Arc<dyn Handler<VersionRequest, VersionResponse>> {
        Arc::new(Decorated {
            logger: self.logger.clone(),
            service: self.service.clone(),
            next,
        })
    }
}

struct Decorated {
    logger: Logger,
    service: Arc<Service>,
    next: Arc<dyn Handler<VersionRequest, VersionResponse>>,
}

#[async_trait]
impl Handler<VersionRequest, VersionResponse> for Decorated {
    async fn call(
        &self,
        ctx: RequestContext,
        request: VersionRequest,
    ) -> Result<VersionResponse, BoxError> {
        let request_id = ctx
            .request_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        tracing::debug!(
            parent: self.logger.span(),
            service = self.service.version.name(),
            request_id = %request_id,
            "Version middleware"
        );

        self.next.call(ctx, request).await
    }
}
