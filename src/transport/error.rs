//! Transport Errors
//!
//! 按产生阶段标记的请求错误

use std::fmt;

use thiserror::Error;
use tower::BoxError;

/// 请求处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// 响应编码
    Encode,
    /// 请求解码
    Decode,
    /// 业务逻辑
    Do,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Encode => f.write_str("encode"),
            Stage::Decode => f.write_str("decode"),
            Stage::Do => f.write_str("do"),
        }
    }
}

/// 请求错误
///
/// `stage` 为 None 表示未归属到任何处理阶段（基础设施错误）。
/// Display 输出内部错误的原始信息。
#[derive(Debug, Error)]
#[error("{source}")]
pub struct TransportError {
    stage: Option<Stage>,
    #[source]
    source: BoxError,
}

impl TransportError {
    pub fn new(stage: Option<Stage>, source: impl Into<BoxError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    pub fn encode(source: impl Into<BoxError>) -> Self {
        Self::new(Some(Stage::Encode), source)
    }

    pub fn decode(source: impl Into<BoxError>) -> Self {
        Self::new(Some(Stage::Decode), source)
    }

    pub fn business(source: impl Into<BoxError>) -> Self {
        Self::new(Some(Stage::Do), source)
    }

    pub fn unknown(source: impl Into<BoxError>) -> Self {
        Self::new(None, source)
    }

    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }
}
