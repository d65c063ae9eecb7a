use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// 窗口标题
    pub title: String,
    /// 逻辑宽度
    pub width: u32,
    /// 逻辑高度
    pub height: u32,
}

impl_default!(WindowConfig {
    title: "Bathroom".to_string(),
    width: 1280,
    height: 720,
});

impl WindowConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ValidationError(
                "Invalid window size".to_string(),
            ));
        }
        Ok(())
    }
}

/// 渲染器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// 设备像素比上限，限制高密度屏幕的填充率
    pub max_pixel_ratio: f32,
    /// 抗锯齿（MSAA 4x，不支持时回退到1x）
    pub antialias: bool,
    /// 清屏颜色（线性空间）
    pub clear_color: [f32; 3],
    /// 垂直同步
    pub vsync: bool,
}

impl_default!(RendererConfig {
    max_pixel_ratio: 2.0,
    antialias: true,
    clear_color: [0.0, 0.0, 0.0],
    vsync: true,
});

impl RendererConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.max_pixel_ratio > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "max_pixel_ratio must be positive, got {}",
                self.max_pixel_ratio
            )));
        }
        Ok(())
    }

    /// MSAA采样数
    pub fn sample_count(&self) -> u32 {
        if self.antialias {
            4
        } else {
            1
        }
    }
}

/// 固定材质配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialsConfig {
    /// 壁灯发光颜色（sRGB十六进制）
    pub sconce_light_color: u32,
}

impl_default!(MaterialsConfig {
    sconce_light_color: 0xE9F1FF,
});

/// 静态资源路径
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// 资源根目录
    pub root: PathBuf,
    /// 模型文件（.glb/.gltf）
    pub model: String,
    /// 烘焙光照贴图
    pub baked_texture: String,
    /// 粒子透明度贴图
    pub particle_texture: String,
}

impl_default!(AssetsConfig {
    root: PathBuf::from("static"),
    model: "bathroom.glb".to_string(),
    baked_texture: "bathroomBaked.jpg".to_string(),
    particle_texture: "12.png".to_string(),
});

impl AssetsConfig {
    pub fn model_path(&self) -> PathBuf {
        self.root.join(&self.model)
    }

    pub fn baked_texture_path(&self) -> PathBuf {
        self.root.join(&self.baked_texture)
    }

    pub fn particle_texture_path(&self) -> PathBuf {
        self.root.join(&self.particle_texture)
    }
}
