//! 粒子的每帧ECS系统

use bevy_ecs::prelude::*;

use super::{DropletParticles, SceneRng, WaterParticles};
use crate::ecs::Time;

/// 推进水粒子并标记位置缓冲需要上传
pub fn water_update_system(mut water: ResMut<WaterParticles>, mut rng: ResMut<SceneRng>) {
    water.update(&mut rng.0);
}

/// 把经过的时间推送到水滴着色器uniform
pub fn droplet_time_system(time: Res<Time>, mut droplets: ResMut<DropletParticles>) {
    droplets.set_time(time.elapsed_seconds as f32);
}
