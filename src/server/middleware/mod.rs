//! Middleware
//!
//! 类型化装饰器：包装一个 Handler，可在委托前读写请求上下文，
//! 在委托后检查或改写结果。

pub mod version;

use std::sync::Arc;

use thiserror::Error;

use crate::logger::Logger;
use crate::service::Service;
use crate::transport::Handler;

/// 中间件构造错误
#[derive(Debug, Error)]
pub enum MiddlewareError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to create version middleware: {0}")]
    Version(#[source] Box<MiddlewareError>),
}

impl MiddlewareError {
    /// 根因是否为配置无效
    pub fn is_invalid_config(&self) -> bool {
        match self {
            MiddlewareError::InvalidConfig(_) => true,
            MiddlewareError::Version(inner) => inner.is_invalid_config(),
        }
    }
}

/// 装饰器
pub trait Decorator<Req, Resp>: Send + Sync
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    fn decorate(&self, next: Arc<dyn Handler<Req, Resp>>) -> Arc<dyn Handler<Req, Resp>>;
}

/// 按从左到右的顺序组合装饰器
///
/// `decorators[0]` 位于最外层，最先看到请求；它在委托前写入的上下文
/// 对其后的所有装饰器以及最终的 handler 可见。
pub fn chain<Req, Resp>(
    handler: Arc<dyn Handler<Req, Resp>>,
    decorators: &[Arc<dyn Decorator<Req, Resp>>],
) -> Arc<dyn Handler<Req, Resp>>
where
    Req: Send + 'static,
    Resp: Send + 'static,
{
    decorators
        .iter()
        .rev()
        .fold(handler, |next, decorator| decorator.decorate(next))
}

/// 中间件配置
#[derive(Debug, Clone, Default)]
pub struct MiddlewareConfig {
    // Dependencies
    pub logger: Option<Logger>,
    pub service: Option<Arc<Service>>,
}

/// 中间件集合
pub struct Middleware {
    pub version: Arc<version::Middleware>,
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

        let version = version::Middleware::new(version::MiddlewareConfig {
            logger: Some(logger.component("version-middleware")),
            service: Some(service),
        })
        .map_err(|e| MiddlewareError::Version(Box::new(e)))?;

        Ok(Self {
            version: Arc::new(version),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tower::BoxError;

    use crate::transport::RequestContext;

    #[derive(Debug, Clone)]
    struct Trail(Vec<&'static str>);

    /// 记录调用顺序，并把自己的名字追加到上下文中
    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    struct Recorded {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        next: Arc<dyn Handler<String, String>>,
    }

    impl Decorator<String, String> for Recorder {
        fn decorate(
            &self,
            next: Arc<dyn Handler<String, String>>,
        ) -> Arc<dyn Handler<String, String>> {
            Arc::new(Recorded {
                name: self.name,
                log: self.log.clone(),
                next,
            })
        }
    }

    #[async_trait]
    impl Handler<String, String> for Recorded {
        async fn call(&self, mut ctx: RequestContext, request: String) -> Result<String, BoxError> {
            self.log.lock().push(format!("before {}", self.name));
            let mut trail = ctx.get::<Trail>().cloned().unwrap_or(Trail(Vec::new()));
            trail.0.push(self.name);
            ctx.insert(trail);

            let response = self.next.call(ctx, request).await;
            self.log.lock().push(format!("after {}", self.name));
            response
        }
    }

    /// 返回上下文中累积的装饰器名字
    struct Terminal;

    fn terminal() -> Arc<dyn Handler<String, String>> {
        Arc::new(Terminal)
    }

    #[async_trait]
    impl Handler<String, String> for Terminal {
        async fn call(&self, ctx: RequestContext, request: String) -> Result<String, BoxError> {
            let trail = ctx.get::<Trail>().map(|t| t.0.join(",")).unwrap_or_default();
            Ok(format!("{}:{}", request, trail))
        }
    }

    struct Uppercase;

    struct Uppercased(Arc<dyn Handler<String, String>>);

    impl Decorator<String, String> for Uppercase {
        fn decorate(
            &self,
            next: Arc<dyn Handler<String, String>>,
        ) -> Arc<dyn Handler<String, String>> {
            Arc::new(Uppercased(next))
        }
    }

    #[async_trait]
    impl Handler<String, String> for Uppercased {
        async fn call(&self, ctx: RequestContext, request: String) -> Result<String, BoxError> {
            self.0.call(ctx, request).await.map(|r| r.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_chain_is_left_to_right() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let decorators: Vec<Arc<dyn Decorator<String, String>>> = vec![
            Arc::new(Recorder {
                name: "a",
                log: log.clone(),
            }),
            Arc::new(Recorder {
                name: "b",
                log: log.clone(),
            }),
        ];

        let handler = chain(terminal(), &decorators);
        let response = handler
            .call(RequestContext::new(), "req".to_string())
            .await
            .unwrap();

        assert_eq!(response, "req:a,b");
        assert_eq!(
            *log.lock(),
            vec!["before a", "before b", "after b", "after a"]
        );
    }

    #[tokio::test]
    async fn test_chain_without_decorators_is_identity() {
        let handler = chain(terminal(), &[]);
        let response = handler
            .call(RequestContext::new(), "req".to_string())
            .await
            .unwrap();
        assert_eq!(response, "req:");
    }

    #[tokio::test]
    async fn test_decorator_may_rewrite_response() {
        let decorators: Vec<Arc<dyn Decorator<String, String>>> = vec![Arc::new(Uppercase)];
        let handler = chain(terminal(), &decorators);
        let response = handler
            .call(RequestContext::new(), "req".to_string())
            .await
            .unwrap();
        assert_eq!(response, "REQ:");
    }

    #[test]
    fn test_missing_dependencies_rejected() {
        let err = Middleware::new(MiddlewareConfig::default()).err().unwrap();
        assert!(err.is_invalid_config());

        let err = Middleware::new(MiddlewareConfig {
            logger: Some(Logger::new("test")),
            service: None,
        })
        .err()
        .unwrap();
        assert!(matches!(err, MiddlewareError::InvalidConfig(ref msg) if msg.contains("service")));
    }
}
