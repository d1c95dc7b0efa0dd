//! Logging
//!
//! 日志初始化与组件级 Logger

use tracing::Span;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// 初始化全局日志订阅者
///
/// `RUST_LOG` 环境变量优先于配置文件中的日志级别。
pub fn init_logging(config: &LogConfig) {
    let log_filter = format!(
        "{},service_skeleton={},tower_http=debug",
        config.level, config.level
    );
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&log_filter));

    if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 组件 Logger
///
/// 包装一个 tracing span，各层构造时从父 Logger 派生子 Logger，
/// 日志事件通过 `parent: logger.span()` 归属到对应组件。
#[derive(Debug, Clone)]
pub struct Logger {
    component: &'static str,
    span: Span,
}

impl Logger {
    /// 创建根 Logger
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            span: tracing::info_span!("component", name = component),
        }
    }

    /// 派生子组件 Logger
    pub fn component(&self, component: &'static str) -> Self {
        Self {
            component,
            span: tracing::info_span!(parent: &self.span, "component", name = component),
        }
    }

    pub fn name(&self) -> &'static str {
        self.component
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}
