//! 水滴粒子：位置在构造时随机一次，动画交给GPU着色器

use bevy_ecs::prelude::*;
use rand::Rng;

use super::{spread_around, PointCloud};
use crate::config::DropletConfig;

/// 推送给水滴着色器的uniform
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DropletUniforms {
    /// 经过的时间（秒）
    pub time: f32,
}

/// 定向水滴粒子
#[derive(Resource, Debug, Clone)]
pub struct DropletParticles {
    cloud: PointCloud,
    /// 每点修正值 `aMod`，范围 (0, 1]
    modifiers: Vec<f32>,
    uniforms: DropletUniforms,
    size: f32,
}

impl DropletParticles {
    pub fn new<R: Rng + ?Sized>(config: &DropletConfig, rng: &mut R) -> Self {
        let mut cloud = PointCloud::new(config.count);
        let mut modifiers = Vec::with_capacity(config.count);
        for i in 0..config.count {
            let x = spread_around(rng, config.center[0], config.spread);
            let z = spread_around(rng, config.center[1], config.spread);
            cloud.set_point(i, [x, config.height, z]);

            modifiers.push(2.0 - (rng.gen::<f32>() + 1.0));
        }

        tracing::debug!(
            target: "scene",
            count = config.count,
            position_len = cloud.positions().len(),
            modifier_len = modifiers.len(),
            "Droplet geometry created"
        );

        Self {
            cloud,
            modifiers,
            uniforms: DropletUniforms::default(),
            size: config.size,
        }
    }

    /// 写入着色器时间；主机端不移动任何点
    pub fn set_time(&mut self, seconds: f32) {
        self.uniforms.time = seconds;
    }

    pub fn uniforms(&self) -> DropletUniforms {
        self.uniforms
    }

    pub fn count(&self) -> usize {
        self.cloud.len()
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    pub fn modifiers(&self) -> &[f32] {
        &self.modifiers
    }

    pub fn size(&self) -> f32 {
        self.size
    }
}
