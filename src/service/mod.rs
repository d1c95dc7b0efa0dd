//! Service Layer
//!
//! 业务逻辑服务集合，进程内唯一，由入口创建并在服务器生命周期内共享。

pub mod version;

use thiserror::Error;

use crate::logger::Logger;
use version::{VersionError, VersionService, VersionServiceConfig};

pub use version::{VersionRequest, VersionResponse};

/// 服务层错误
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to create version service: {0}")]
    Version(#[source] VersionError),
}

impl ServiceError {
    /// 根因是否为配置无效
    pub fn is_invalid_config(&self) -> bool {
        match self {
            ServiceError::Version(VersionError::InvalidConfig(_)) => true,
        }
    }
}

/// 服务集合配置
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    // Dependencies
    pub logger: Option<Logger>,

    // Settings
    pub description: String,
    pub git_commit: String,
    pub name: String,
    pub project_version: String,
    pub source: String,
}

/// 服务集合
#[derive(Debug)]
pub struct Service {
    pub version: VersionService,
}

impl Service {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let version_config = VersionServiceConfig {
            logger: config.logger.map(|l| l.component("version-service")),
            description: config.description,
            git_commit: config.git_commit,
            name: config.name,
            project_version: config.project_version,
            source: config.source,
        };
        let version = VersionService::new(version_config).map_err(ServiceError::Version)?;

        Ok(Self { version })
    }
}
