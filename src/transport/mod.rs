//! Transport Layer
//!
//! 通用的请求处理契约：
//! - Handler: 类型化的业务调用 `(context, request) -> response`
//! - Endpoint: 路由到 HTTP 的通用处理器（decode → handler → encode）
//! - RequestFunc: decode 之前执行的请求上下文增强函数

pub mod context;
pub mod error;
pub mod http;
pub mod logging;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::response::Response;
use bytes::Bytes;
use ::http::header::CONTENT_TYPE;
use ::http::request::Parts;
use ::http::{HeaderValue, Method, Request, StatusCode};
use serde::Serialize;
use tower::BoxError;

pub use self::context::{RequestContext, RequestId};
pub use self::error::{Stage, TransportError};

/// JSON 响应的 Content-Type
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// 类型化处理器
#[async_trait]
pub trait Handler<Req, Resp>: Send + Sync
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    async fn call(&self, ctx: RequestContext, request: Req) -> Result<Resp, BoxError>;
}

/// 通用传输端点
#[async_trait]
pub trait Endpoint: Send + Sync {
    fn name(&self) -> &'static str;

    fn method(&self) -> Method;

    fn path(&self) -> &'static str;

    async fn serve(
        &self,
        ctx: RequestContext,
        request: Request<Bytes>,
    ) -> Result<Response, TransportError>;
}

/// 请求增强函数
///
/// 在 decode 之前执行，按注册顺序依次接收上一个函数产出的上下文。
pub type RequestFunc = Arc<dyn Fn(RequestContext, &Parts) -> RequestContext + Send + Sync>;

/// 请求解码函数
pub type DecodeFn<Req> = fn(&Request<Bytes>) -> Result<Req, BoxError>;

/// 响应编码函数
pub type EncodeFn<Resp> = fn(Resp) -> Result<Response, BoxError>;

/// 由 decoder、handler、encoder 组成的 HTTP 端点
///
/// 各阶段的失败分别标记为 Decode、Do、Encode。
pub struct HttpEndpoint<Req, Resp> {
    name: &'static str,
    method: Method,
    path: &'static str,
    decode: DecodeFn<Req>,
    handler: Arc<dyn Handler<Req, Resp>>,
    encode: EncodeFn<Resp>,
    _marker: PhantomData<fn(Req) -> Resp>,
}

impl<Req, Resp> HttpEndpoint<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    pub fn new(
        name: &'static str,
        method: Method,
        path: &'static str,
        decode: DecodeFn<Req>,
        handler: Arc<dyn Handler<Req, Resp>>,
        encode: EncodeFn<Resp>,
    ) -> Self {
        Self {
            name,
            method,
            path,
            decode,
            handler,
            encode,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<Req, Resp> Endpoint for HttpEndpoint<Req, Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn method(&self) -> Method {
        self.method.clone()
    }

    fn path(&self) -> &'static str {
        self.path
    }

    async fn serve(
        &self,
        ctx: RequestContext,
        request: Request<Bytes>,
    ) -> Result<Response, TransportError> {
        let request = (self.decode)(&request).map_err(TransportError::decode)?;
        let response = self
            .handler
            .call(ctx, request)
            .await
            .map_err(TransportError::business)?;
        (self.encode)(response).map_err(TransportError::encode)
    }
}

/// 将值序列化为 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Result<Response, BoxError> {
    let body = serde_json::to_vec(value)?;
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    Ok(response)
}
