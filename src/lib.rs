//! Service Skeleton - 服务组合骨架
//!
//! 分层：
//! - service/: 业务服务（Version）
//! - server/: 中间件、端点、全局错误编码与生命周期
//! - transport/: 通用处理契约与 HTTP 驱动
//! - config/, logger, build_info: 配置、日志、构建元数据

pub mod build_info;
pub mod config;
pub mod logger;
pub mod server;
pub mod service;
pub mod transport;

pub use config::{load_config, AppConfig};
pub use server::{Server, ServerConfig};
pub use service::{Service, ServiceConfig};
