//! Version Endpoint
//!
//! GET /version - 返回构建元数据

use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use bytes::Bytes;
use http::{Method, Request, StatusCode};
use tower::BoxError;

use super::EndpointError;
use crate::logger::Logger;
use crate::server::middleware::{chain, Decorator, Middleware};
use crate::service::{Service, VersionRequest, VersionResponse};
use crate::transport::{json_response, Endpoint as TransportEndpoint, Handler, HttpEndpoint};
use crate::transport::{RequestContext, TransportError};

pub const NAME: &str = "version";
pub const PATH: &str = "/version";

/// Version 端点配置
#[derive(Default)]
pub struct EndpointConfig {
    pub logger: Option<Logger>,
    pub middleware: Option<Arc<Middleware>>,
    pub service: Option<Arc<Service>>,
}

/// Version 端点
pub struct Endpoint {
    inner: HttpEndpoint<VersionRequest, VersionResponse>,
}

impl Endpoint {
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

        let version: Arc<dyn Decorator<VersionRequest, VersionResponse>> =
            middleware.version.clone();
        let decorators = vec![version];
        let handler: Arc<dyn Handler<VersionRequest, VersionResponse>> =
            Arc::new(VersionHandler { service });
        let handler = chain(handler, &decorators);

        tracing::debug!(
            parent: logger.span(),
            method = "GET",
            path = PATH,
            "Version endpoint created"
        );

        Ok(Self {
            inner: HttpEndpoint::new(NAME, Method::GET, PATH, decode, handler, encode),
        })
    }
}

#[async_trait]
impl TransportEndpoint for Endpoint {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn method(&self) -> Method {
        self.inner.method()
    }

    fn path(&self) -> &'static str {
        self.inner.path()
    }

    async fn serve(
        &self,
        ctx: RequestContext,
        request: Request<Bytes>,
    ) -> Result<Response, TransportError> {
        self.inner.serve(ctx, request).await
    }
}

/// 调用 Version 服务
struct VersionHandler {
    service: Arc<Service>,
}

#[async_trait]
impl Handler<VersionRequest, VersionResponse> for VersionHandler {
    async fn call(
        &self,
        _ctx: RequestContext,
        request: VersionRequest,
    ) -> Result<VersionResponse, BoxError> {
        Ok(self.service.version.get(request))
    }
}

/// 任何到达该路由的请求都解码为 VersionRequest
fn decode(_request: &Request<Bytes>) -> Result<VersionRequest, BoxError> {
    Ok(VersionRequest)
}

fn encode(response: VersionResponse) -> Result<Response, BoxError> {
    json_response(StatusCode::OK, &response)
}
