//! Server Lifecycle
//!
//! 启动/关闭状态机，保证启动与关闭逻辑各最多执行一次

use parking_lot::Mutex;
use thiserror::Error;

/// 生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    NotStarted,
    Started,
    Stopped,
}

/// 非法的生命周期转换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("server has not been booted")]
    NotStarted,

    #[error("server has already been shut down")]
    AlreadyStopped,
}

/// 生命周期
///
/// 转换逻辑在持锁期间执行，并发调用会等待第一个调用完成后看到新状态。
/// 状态在执行 `body` 之前更新：`body` panic 后不会被再次执行。
#[derive(Debug)]
pub struct Lifecycle {
    state: Mutex<LifecycleState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LifecycleState::NotStarted),
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    /// NotStarted → Started 时执行 `body`；已启动时为空操作
    pub fn boot<F: FnOnce()>(&self, body: F) -> Result<(), LifecycleError> {
        let mut state = self.state.lock();
        match *state {
            LifecycleState::NotStarted => {
                *state = LifecycleState::Started;
                body();
                Ok(())
            }
            LifecycleState::Started => Ok(()),
            LifecycleState::Stopped => Err(LifecycleError::AlreadyStopped),
        }
    }

    /// Started → Stopped 时执行 `body`；已关闭时为空操作
    pub fn shutdown<F: FnOnce()>(&self, body: F) -> Result<(), LifecycleError> {
        let mut state = self.state.lock();
        match *state {
            LifecycleState::Started => {
                *state = LifecycleState::Stopped;
                body();
                Ok(())
            }
            LifecycleState::Stopped => Ok(()),
            LifecycleState::NotStarted => Err(LifecycleError::NotStarted),
        }
    }
}
