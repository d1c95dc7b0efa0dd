//! Service Skeleton
//!
//! 启动流程：配置 → 日志 → Service → Server → HTTP 驱动

use std::sync::Arc;

use anyhow::Context;

use service_skeleton::build_info;
use service_skeleton::config::{load_config, print_config};
use service_skeleton::logger::{init_logging, Logger};
use service_skeleton::server::{Server, ServerConfig};
use service_skeleton::service::{Service, ServiceConfig};
use service_skeleton::transport::http::HttpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().context("Failed to load config")?;

    init_logging(&config.log);

    tracing::info!(
        name = build_info::NAME,
        version = build_info::PROJECT_VERSION,
        git_commit = build_info::GIT_COMMIT,
        "Starting {}",
        build_info::DESCRIPTION
    );
    print_config(&config);

    let logger = Logger::new(build_info::NAME);

    // 业务服务
    let service = Service::new(ServiceConfig {
        logger: Some(logger.component("service")),
        description: build_info::DESCRIPTION.to_string(),
        git_commit: build_info::GIT_COMMIT.to_string(),
        name: build_info::NAME.to_string(),
        project_version: build_info::PROJECT_VERSION.to_string(),
        source: build_info::SOURCE.to_string(),
    })
    .context("Failed to create service")?;

    // 服务器：中间件 + 端点
    let server = Server::new(ServerConfig {
        logger: Some(logger.component("server")),
        service: Some(Arc::new(service)),
    })
    .context("Failed to create server")?;

    let http_server = HttpServer::new(config.http.clone(), Arc::new(server));

    http_server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
