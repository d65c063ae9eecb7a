use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 相机与轨道控制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// 垂直视野（角度）
    pub fov_degrees: f32,
    /// 近裁剪面
    pub near: f32,
    /// 远裁剪面
    pub far: f32,
    /// 初始位置
    pub position: [f32; 3],
    /// 轨道中心
    pub target: [f32; 3],
    /// 是否启用阻尼（惯性）
    pub enable_damping: bool,
    /// 阻尼系数，范围 (0, 1]
    pub damping_factor: f32,
    /// 旋转速度倍率
    pub rotate_speed: f32,
    /// 缩放速度倍率
    pub zoom_speed: f32,
    /// 最小距离
    pub min_distance: f32,
    /// 最大距离
    pub max_distance: f32,
}

impl_default!(CameraConfig {
    fov_degrees: 45.0,
    near: 0.1,
    far: 100.0,
    position: [4.0, 2.0, 4.0],
    target: [0.0, 0.0, 0.0],
    enable_damping: true,
    damping_factor: 0.05,
    rotate_speed: 1.0,
    zoom_speed: 1.0,
    min_distance: 0.0,
    max_distance: f32::MAX,
});

impl CameraConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::ValidationError(format!(
                "Camera fov must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !(self.near > 0.0 && self.far > self.near && self.far.is_finite()) {
            return Err(ConfigError::ValidationError(format!(
                "Camera planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "Damping factor must be in (0, 1], got {}",
                self.damping_factor
            )));
        }
        // max_distance 允许为 +inf
        if !(self.min_distance >= 0.0
            && self.min_distance.is_finite()
            && self.max_distance >= self.min_distance)
        {
            return Err(ConfigError::ValidationError(format!(
                "Orbit distance limits must satisfy 0 <= min <= max, got min={} max={}",
                self.min_distance, self.max_distance
            )));
        }
        if !(self.rotate_speed.is_finite() && self.zoom_speed.is_finite()) {
            return Err(ConfigError::ValidationError(
                "Rotate and zoom speeds must be finite".to_string(),
            ));
        }
        if !self.position.iter().chain(&self.target).all(|v| v.is_finite()) {
            return Err(ConfigError::ValidationError(
                "Camera position and target must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
