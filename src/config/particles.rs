use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 水粒子配置（主机端逐帧下落、回收）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// 点数量，构造后固定
    pub count: usize,
    /// 每帧下降高度
    pub step: f32,
    /// 回收后的高度
    pub reset_height: f32,
    /// 水平随机带中心 (x, z)
    pub center: [f32; 2],
    /// 水平随机带宽度
    pub spread: f32,
    /// 每帧水平抖动幅度
    pub jitter: f32,
    /// 初始高度上限
    pub initial_height_max: f32,
    /// 点大小（世界单位）
    pub size: f32,
    /// 颜色（sRGB十六进制）
    pub color: u32,
}

impl_default!(WaterConfig {
    count: 250,
    step: 0.02,
    reset_height: 1.07,
    center: [-0.55, -0.5],
    spread: 0.1,
    jitter: 0.01,
    initial_height_max: 1.0,
    size: 0.1,
    color: 0xaaaaaa,
});

impl WaterConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.step >= 0.0 && self.step.is_finite()) {
            return Err(ConfigError::ValidationError(format!(
                "Water step must not be negative, got {}",
                self.step
            )));
        }
        if !(non_negative(self.spread) && non_negative(self.jitter)) {
            return Err(ConfigError::ValidationError(
                "Water spread and jitter must be finite and not negative".to_string(),
            ));
        }
        if !(self.size > 0.0 && self.size.is_finite()) {
            return Err(ConfigError::ValidationError(
                "Water point size must be positive".to_string(),
            ));
        }
        if !(self.reset_height.is_finite()
            && non_negative(self.initial_height_max)
            && self.center.iter().all(|v| v.is_finite()))
        {
            return Err(ConfigError::ValidationError(
                "Water heights and center must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// 水滴粒子配置（动画在GPU着色器中完成）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DropletConfig {
    /// 点数量，构造后固定
    pub count: usize,
    /// 水平随机带中心 (x, z)
    pub center: [f32; 2],
    /// 水平随机带宽度
    pub spread: f32,
    /// 初始高度
    pub height: f32,
    /// 点大小（世界单位）
    pub size: f32,
}

impl_default!(DropletConfig {
    count: 150,
    center: [-0.5, -0.5],
    spread: 0.25,
    height: 0.0,
    size: 0.1,
});

impl DropletConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !non_negative(self.spread) {
            return Err(ConfigError::ValidationError(
                "Droplet spread must be finite and not negative".to_string(),
            ));
        }
        if !(self.height.is_finite() && self.center.iter().all(|v| v.is_finite())) {
            return Err(ConfigError::ValidationError(
                "Droplet height and center must be finite".to_string(),
            ));
        }
        if !(self.size > 0.0 && self.size.is_finite()) {
            return Err(ConfigError::ValidationError(
                "Droplet point size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// 有限且非负（NaN返回false）
fn non_negative(value: f32) -> bool {
    value >= 0.0 && value.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_counts_are_valid() {
        let water = WaterConfig {
            count: 0,
            ..Default::default()
        };
        assert!(water.validate().is_ok());

        let droplets = DropletConfig {
            count: 0,
            ..Default::default()
        };
        assert!(droplets.validate().is_ok());
    }

    #[test]
    fn test_negative_step_rejected() {
        let water = WaterConfig {
            step: -0.1,
            ..Default::default()
        };
        assert!(water.validate().is_err());
    }

    #[test]
    fn test_nan_values_rejected() {
        let water = WaterConfig {
            step: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(water.validate(), Err(ConfigError::ValidationError(_))));

        let water = WaterConfig {
            jitter: f32::NAN,
            ..Default::default()
        };
        assert!(water.validate().is_err());

        let droplets = DropletConfig {
            spread: f32::NAN,
            ..Default::default()
        };
        assert!(droplets.validate().is_err());
    }
}
