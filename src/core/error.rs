//! 统一错误处理模块
//!
//! 提供场景范围内的统一错误类型定义
//!
//! ## 失败策略
//!
//! - **初始化错误**（窗口、适配器、设备）：从 `Engine::run` 返回，由 `main` 打印并退出
//! - **资源错误**：只记录日志，资源永远不会出现，不重试
//! - **帧错误**：表面丢失/过期时重新配置并跳过该帧；内存耗尽时停止渲染循环

use thiserror::Error;

use crate::config::ConfigError;

/// 引擎核心错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Window creation failed: {0}")]
    Window(String),

    #[error("Event loop error: {0}")]
    EventLoop(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 渲染系统错误
#[derive(Error, Debug, Clone)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    SurfaceCreation(String),

    #[error("Failed to request adapter: no compatible GPU found")]
    NoAdapter,

    #[error("Failed to request device: {0}")]
    DeviceRequest(String),

    #[error("Surface error: {0}")]
    Surface(String),
}

/// 资源管理错误
#[derive(Error, Debug, Clone)]
pub enum AssetError {
    #[error("Asset not found: {path}")]
    NotFound { path: String },

    #[error("Failed to load asset: {path}, reason: {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("Asset decode error: {0}")]
    Decode(String),
}

impl AssetError {
    /// 将IO错误映射为资源错误，文件缺失单独归类
    pub fn from_io(path: &std::path::Path, err: &std::io::Error) -> Self {
        let path = path.display().to_string();
        if err.kind() == std::io::ErrorKind::NotFound {
            AssetError::NotFound { path }
        } else {
            AssetError::LoadFailed {
                path,
                reason: err.to_string(),
            }
        }
    }
}

/// 引擎结果类型别名
pub type EngineResult<T> = Result<T, EngineError>;
pub type RenderResult<T> = Result<T, RenderError>;
pub type AssetResult<T> = Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let asset_err = AssetError::NotFound {
            path: "static/bathroom.glb".to_string(),
        };
        let engine_err: EngineError = asset_err.into();
        assert!(matches!(engine_err, EngineError::Asset(_)));
    }

    #[test]
    fn test_error_display() {
        let err = RenderError::NoAdapter;
        assert_eq!(
            err.to_string(),
            "Failed to request adapter: no compatible GPU found"
        );
    }

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AssetError::from_io(std::path::Path::new("static/12.png"), &io);
        assert!(matches!(err, AssetError::NotFound { ref path } if path == "static/12.png"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = AssetError::from_io(std::path::Path::new("static/12.png"), &io);
        assert!(matches!(err, AssetError::LoadFailed { .. }));
    }
}
