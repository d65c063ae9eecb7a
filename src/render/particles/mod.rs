//! 粒子系统模块
//!
//! 两组独立生成的点云：
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Water（250点）                                           │
//! │   - 主机端逐帧下降，跌破0后回收到顶部                        │
//! │   - 修改位置缓冲并标记脏，渲染前上传                         │
//! ├──────────────────────────────────────────────────────────┤
//! │  Droplets（150点）                                        │
//! │   - 位置与每点修正值只在构造时随机一次                       │
//! │   - 每帧只推送时间uniform，动画在着色器中完成                │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! 点数量在构造时固定，之后不会增删点；回收是覆盖已有槽位。

pub mod droplet;
pub mod point_cloud;
pub mod system;
pub mod water;

use bevy_ecs::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub use droplet::{DropletParticles, DropletUniforms};
pub use point_cloud::PointCloud;
pub use system::{droplet_time_system, water_update_system};
pub use water::WaterParticles;

/// 场景随机数源
///
/// 运行时从熵源播种；测试中使用固定种子以获得可复现结果。
#[derive(Resource, Debug, Clone)]
pub struct SceneRng(pub StdRng);

impl SceneRng {
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// 在 `center ± spread/2` 区间内取随机值
#[inline]
pub(crate) fn spread_around<R: rand::Rng + ?Sized>(rng: &mut R, center: f32, spread: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * spread + center
}
