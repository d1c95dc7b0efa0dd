//! HTTP Server
//!
//! Axum 驱动：注册服务器的端点，安装错误编码器与请求增强函数，
//! 在服务前后调用启动/关闭。

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{Method, StatusCode, Uri};
use axum::middleware;
use axum::response::Response;
use axum::routing::{MethodFilter, MethodRouter};
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::logging::status_logging_middleware;
use super::{Endpoint, RequestContext, RequestFunc, TransportError};
use crate::config::HttpConfig;
use crate::server::{ErrorEncoder, LifecycleError, Server};

/// 请求体大小上限
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// HTTP 服务器错误
#[derive(Debug, Error)]
pub enum HttpServerError {
    #[error("unsupported method for endpoint {endpoint}: {method}")]
    UnsupportedMethod {
        endpoint: &'static str,
        method: Method,
    },

    #[error("duplicate route: {method} {path}")]
    DuplicateRoute {
        method: Method,
        path: &'static str,
    },

    #[error("invalid path for endpoint {endpoint}: {path}")]
    InvalidPath {
        endpoint: &'static str,
        path: &'static str,
    },

    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 单次请求的处理流程：增强上下文 → 读取请求体 → 端点 → 错误编码
struct Pipeline {
    encoder: ErrorEncoder,
    request_funcs: Vec<RequestFunc>,
}

impl Pipeline {
    async fn dispatch(&self, endpoint: &dyn Endpoint, request: Request) -> Response {
        let (parts, body) = request.into_parts();

        let ctx = self
            .request_funcs
            .iter()
            .fold(RequestContext::new(), |ctx, f| f(ctx, &parts));

        let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
            Ok(body) => body,
            Err(e) => return self.encoder.encode(&TransportError::decode(e)),
        };

        match endpoint
            .serve(ctx, http::Request::from_parts(parts, body))
            .await
        {
            Ok(response) => response,
            Err(e) => self.encoder.encode(&e),
        }
    }
}

/// 构建路由表
///
/// 同一路径的端点共用一个方法路由；未匹配的路径（404）与方法（405）
/// 同样返回统一错误响应体。
pub fn build_routes(
    endpoints: &[Arc<dyn Endpoint>],
    encoder: ErrorEncoder,
    request_funcs: Vec<RequestFunc>,
) -> Result<Router, HttpServerError> {
    let pipeline = Arc::new(Pipeline {
        encoder,
        request_funcs,
    });
    let mut router = Router::new();

    for (path, group) in group_by_path(endpoints)? {
        let mut method_router: MethodRouter = MethodRouter::new();

        for endpoint in group {
            let method = endpoint.method();
            let filter = MethodFilter::try_from(method.clone()).map_err(|_| {
                HttpServerError::UnsupportedMethod {
                    endpoint: endpoint.name(),
                    method: method.clone(),
                }
            })?;

            info!(
                endpoint = endpoint.name(),
                method = %method,
                path = path,
                "Registering endpoint"
            );

            let pipeline = pipeline.clone();
            method_router = method_router.on(filter, move |request: Request| {
                let endpoint = endpoint.clone();
                let pipeline = pipeline.clone();
                async move { pipeline.dispatch(endpoint.as_ref(), request).await }
            });
        }

        let method_fallback = pipeline.clone();
        router = router.route(
            path,
            method_router.fallback(move |method: Method, uri: Uri| {
                let pipeline = method_fallback.clone();
                async move {
                    pipeline.encoder.encode_status(
                        StatusCode::METHOD_NOT_ALLOWED,
                        format!("method {} not allowed for {}", method, uri.path()),
                    )
                }
            }),
        );
    }

    let fallback = pipeline.clone();
    Ok(router.fallback(move |uri: Uri| {
        let fallback = fallback.clone();
        async move {
            fallback
                .encoder
                .encode_status(StatusCode::NOT_FOUND, format!("route not found: {}", uri.path()))
        }
    }))
}

/// 按路径分组（保持注册顺序），拒绝非法路径与重复的方法+路径
fn group_by_path(
    endpoints: &[Arc<dyn Endpoint>],
) -> Result<Vec<(&'static str, Vec<Arc<dyn Endpoint>>)>, HttpServerError> {
    let mut groups: Vec<(&'static str, Vec<Arc<dyn Endpoint>>)> = Vec::new();

    for endpoint in endpoints {
        let path = endpoint.path();
        if !path.starts_with('/') {
            return Err(HttpServerError::InvalidPath {
                endpoint: endpoint.name(),
                path,
            });
        }

        match groups.iter().position(|(p, _)| *p == path) {
            Some(index) => {
                let group = &mut groups[index].1;
                let method = endpoint.method();
                if group.iter().any(|e| e.method() == method) {
                    return Err(HttpServerError::DuplicateRoute { method, path });
                }
                group.push(endpoint.clone());
            }
            None => groups.push((path, vec![endpoint.clone()])),
        }
    }

    Ok(groups)
}

/// HTTP 服务器
pub struct HttpServer {
    config: HttpConfig,
    server: Arc<Server>,
}

impl HttpServer {
    pub fn new(config: HttpConfig, server: Arc<Server>) -> Self {
        Self { config, server }
    }

    /// 构建 Router
    pub fn router(&self) -> Result<Router, HttpServerError> {
        let routes = build_routes(
            self.server.endpoints(),
            self.server.error_encoder().clone(),
            self.server.request_funcs().to_vec(),
        )?;

        Ok(routes
            .layer(middleware::from_fn(status_logging_middleware))
            .layer(TraceLayer::new_for_http()))
    }

    /// 启动服务器（带优雅关闭）
    ///
    /// 服务前调用 `Server::boot`，停止后调用 `Server::shutdown`。
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), HttpServerError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.router()?;
        self.server.boot()?;

        let served = self.serve(router, shutdown_signal).await;
        self.server.shutdown()?;
        served
    }

    async fn serve<F>(&self, router: Router, shutdown_signal: F) -> Result<(), HttpServerError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr).await?;

        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}
