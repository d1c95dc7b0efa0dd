//! Version Service
//!
//! 报告构建元数据（名称、描述、提交、源码地址）与运行时平台信息

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::build_info;
use crate::logger::Logger;

/// Version 服务错误
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Version 服务配置
#[derive(Debug, Clone, Default)]
pub struct VersionServiceConfig {
    // Dependencies
    pub logger: Option<Logger>,

    // Settings
    pub description: String,
    pub git_commit: String,
    pub name: String,
    pub project_version: String,
    pub source: String,
}

/// Version 查询（无字段）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionRequest;

/// Version 查询结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub description: String,
    pub git_commit: String,
    pub name: String,
    pub os_arch: String,
    pub project_version: String,
    pub runtime_version: String,
    pub source: String,
}

/// Version 服务
///
/// 构造后不可变；`get` 为纯读取，平台信息在每次调用时重新获取。
#[derive(Debug)]
pub struct VersionService {
    logger: Logger,
    description: String,
    git_commit: String,
    name: String,
    project_version: String,
    source: String,
}

impl VersionService {
    pub fn new(config: VersionServiceConfig) -> Result<Self, VersionError> {
        let logger = config
            .logger
            .ok_or_else(|| VersionError::InvalidConfig("logger must not be empty".to_string()))?;

        require(&config.description, "description")?;
        require(&config.git_commit, "git commit")?;
        require(&config.name, "name")?;
        require(&config.source, "source")?;

        let project_version = if config.project_version.is_empty() {
            "n/a".to_string()
        } else {
            config.project_version
        };

        tracing::debug!(
            parent: logger.span(),
            name = %config.name,
            git_commit = %config.git_commit,
            "Version service created"
        );

        Ok(Self {
            logger,
            description: config.description,
            git_commit: config.git_commit,
            name: config.name,
            project_version,
            source: config.source,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, _request: VersionRequest) -> VersionResponse {
        tracing::trace!(parent: self.logger.span(), "Version requested");

        VersionResponse {
            description: self.description.clone(),
            git_commit: self.git_commit.clone(),
            name: self.name.clone(),
            os_arch: build_info::os_arch(),
            project_version: self.project_version.clone(),
            runtime_version: build_info::runtime_version(),
            source: self.source.clone(),
        }
    }
}

fn require(value: &str, field: &str) -> Result<(), VersionError> {
    if value.is_empty() {
        return Err(VersionError::InvalidConfig(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}
