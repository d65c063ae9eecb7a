/// 统一配置系统
///
/// 场景的所有常量（粒子数量、相机参数、材质颜色、资源路径）都有硬编码默认值，
/// 同时可以从TOML/JSON配置文件和环境变量覆盖。
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub mod camera;
pub mod graphics;
pub mod particles;

pub use camera::CameraConfig;
pub use graphics::{AssetsConfig, MaterialsConfig, RendererConfig, WindowConfig};
pub use particles::{DropletConfig, WaterConfig};

use crate::impl_default;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 场景主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// 窗口配置
    pub window: WindowConfig,

    /// 相机与轨道控制配置
    pub camera: CameraConfig,

    /// 水粒子配置
    pub water: WaterConfig,

    /// 水滴粒子配置
    pub droplets: DropletConfig,

    /// 材质配置
    pub materials: MaterialsConfig,

    /// 资源路径配置
    pub assets: AssetsConfig,

    /// 渲染器配置
    pub renderer: RendererConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

impl SceneConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        if let Some(count) = env_parse("BATHROOM_WATER_COUNT") {
            self.water.count = count;
        }
        if let Some(count) = env_parse("BATHROOM_DROPLET_COUNT") {
            self.droplets.count = count;
        }
        if let Ok(root) = env::var("BATHROOM_ASSET_ROOT") {
            self.assets.root = root.into();
        }
        if let Some(ratio) = env_parse("BATHROOM_MAX_PIXEL_RATIO") {
            self.renderer.max_pixel_ratio = ratio;
        }
        if let Some(width) = env_parse("BATHROOM_WINDOW_WIDTH") {
            self.window.width = width;
        }
        if let Some(height) = env_parse("BATHROOM_WINDOW_HEIGHT") {
            self.window.height = height;
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.window.validate()?;
        self.camera.validate()?;
        self.water.validate()?;
        self.droplets.validate()?;
        self.renderer.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./bathroom.toml
    /// 2. ./bathroom.json
    /// 3. 使用默认配置
    pub fn load_or_default() -> Self {
        Self::load_from_dir(".").0
    }

    /// 在指定目录中按`load_or_default`的顺序查找配置，并返回配置来源
    ///
    /// 不在这里记录日志：调用时订阅者可能尚未安装。
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> (Self, ConfigSource) {
        let dir = dir.as_ref();
        if let Ok(config) = Self::from_toml_file(dir.join(TOML_FILE)) {
            return (config, ConfigSource::Toml);
        }
        if let Ok(config) = Self::from_json_file(dir.join(JSON_FILE)) {
            return (config, ConfigSource::Json);
        }
        (Self::default(), ConfigSource::Default)
    }
}

const TOML_FILE: &str = "bathroom.toml";
const JSON_FILE: &str = "bathroom.json";

/// 配置的实际来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Toml,
    Json,
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Toml => write!(f, "{}", TOML_FILE),
            ConfigSource::Json => write!(f, "{}", JSON_FILE),
            ConfigSource::Default => write!(f, "built-in defaults"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 未设置`RUST_LOG`时使用的日志级别
    pub level: LogLevel,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// 转换为`EnvFilter`指令
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.water.count, 250);
        assert_eq!(config.droplets.count, 150);
        assert_eq!(config.camera.fov_degrees, 45.0);
    }

    #[test]
    fn test_toml_serialization() {
        let config = SceneConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: SceneConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.water.count, parsed.water.count);
        assert_eq!(config.assets.model, parsed.assets.model);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed = SceneConfig::from_toml_str("[water]\ncount = 10\n").unwrap();
        assert_eq!(parsed.water.count, 10);
        assert_eq!(parsed.water.reset_height, 1.07);
        assert_eq!(parsed.droplets.count, 150);
    }

    #[test]
    fn test_json_serialization() {
        let config = SceneConfig::default();
        let json_str = serde_json::to_string(&config).unwrap();
        let parsed = SceneConfig::from_json_str(&json_str).unwrap();
        assert_eq!(config.window.width, parsed.window.width);
    }

    #[test]
    fn test_save_and_reload_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bathroom.toml");
        let mut config = SceneConfig::default();
        config.droplets.count = 42;
        config.save_toml(&path).unwrap();

        let loaded = SceneConfig::from_toml_file(&path).unwrap();
        assert_eq!(loaded.droplets.count, 42);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = SceneConfig::from_toml_str("[water\ncount = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = SceneConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
    }

    #[test]
    fn test_nan_min_distance_fails_validation() {
        let config = SceneConfig::from_toml_str("[camera]\nmin_distance = nan\n").unwrap();
        assert!(config.camera.min_distance.is_nan());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_nan_water_step_fails_validation() {
        let config = SceneConfig::from_toml_str("[water]\nstep = nan\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_load_from_dir_prefers_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bathroom.json"), r#"{"water":{"count":7}}"#).unwrap();
        let (config, source) = SceneConfig::load_from_dir(dir.path());
        assert_eq!(source, ConfigSource::Json);
        assert_eq!(config.water.count, 7);

        fs::write(dir.path().join("bathroom.toml"), "[water]\ncount = 3\n").unwrap();
        let (config, source) = SceneConfig::load_from_dir(dir.path());
        assert_eq!(source, ConfigSource::Toml);
        assert_eq!(config.water.count, 3);
    }

    #[test]
    fn test_load_from_empty_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = SceneConfig::load_from_dir(dir.path());
        assert_eq!(source, ConfigSource::Default);
        assert_eq!(config.water.count, 250);
        assert_eq!(source.to_string(), "built-in defaults");
    }
}
