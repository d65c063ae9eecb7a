//! 核心模块
//!
//! - `engine` - 主引擎入口和运行循环
//! - `error` - 错误类型定义
//! - `macros` - 配置默认值宏

pub mod engine;
pub mod error;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{
    AssetError, AssetResult, EngineError, EngineResult, RenderError, RenderResult,
};

pub use engine::Engine;
