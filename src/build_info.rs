//! Build Metadata
//!
//! 编译期注入的构建信息（由 build.rs 与 Cargo 提供）

/// 项目名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 项目描述
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 项目版本
pub const PROJECT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 源码地址
pub const SOURCE: &str = env!("CARGO_PKG_REPOSITORY");

/// Git 提交（无法获取时为 "n/a"）
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");

/// 编译器版本
pub const RUSTC_VERSION: &str = env!("RUSTC_VERSION");

/// 当前进程的平台标识，格式为 `os/arch`
pub fn os_arch() -> String {
    format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)
}

/// 当前进程的运行时版本
pub fn runtime_version() -> String {
    RUSTC_VERSION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_arch_format() {
        let os_arch = os_arch();
        let (os, arch) = os_arch.split_once('/').unwrap();
        assert_eq!(os, std::env::consts::OS);
        assert_eq!(arch, std::env::consts::ARCH);
    }

    #[test]
    fn test_build_metadata_present() {
        assert!(!NAME.is_empty());
        assert!(!GIT_COMMIT.is_empty());
        assert!(!runtime_version().is_empty());
    }
}
