//! 水粒子：主机端逐帧下落并在跌破地面时回收

use bevy_ecs::prelude::*;
use rand::Rng;
use std::ops::RangeInclusive;

use super::{spread_around, PointCloud};
use crate::config::WaterConfig;

/// 环境水粒子
#[derive(Resource, Debug, Clone)]
pub struct WaterParticles {
    cloud: PointCloud,
    config: WaterConfig,
}

impl WaterParticles {
    /// 按配置随机生成初始位置
    ///
    /// x/z 落在回收带内，y 在 `[0, initial_height_max)` 内均匀分布。
    pub fn new<R: Rng + ?Sized>(config: &WaterConfig, rng: &mut R) -> Self {
        let mut cloud = PointCloud::new(config.count);
        for i in 0..config.count {
            let x = spread_around(rng, config.center[0], config.spread);
            let y = rng.gen::<f32>() * config.initial_height_max;
            let z = spread_around(rng, config.center[1], config.spread);
            cloud.set_point(i, [x, y, z]);
        }
        Self {
            cloud,
            config: config.clone(),
        }
    }

    /// 使用给定位置创建，点数量取自`positions`
    pub fn with_positions(config: &WaterConfig, positions: &[[f32; 3]]) -> Self {
        let mut config = config.clone();
        config.count = positions.len();
        Self {
            cloud: PointCloud::from_points(positions),
            config,
        }
    }

    /// 推进一帧
    ///
    /// 每个点下降 `step`；结果小于0时重置到顶部的随机位置，
    /// 否则保留新高度并施加微小水平抖动。
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let config = &self.config;
        for i in 0..self.cloud.len() {
            let [x, y, z] = self.cloud.point(i);
            let y = y - config.step;

            let next = if y < 0.0 {
                [
                    spread_around(rng, config.center[0], config.spread),
                    config.reset_height,
                    spread_around(rng, config.center[1], config.spread),
                ]
            } else {
                [
                    x + (rng.gen::<f32>() - 0.5) * config.jitter,
                    y,
                    z + (rng.gen::<f32>() - 0.5) * config.jitter,
                ]
            };
            self.cloud.set_point(i, next);
        }
        self.cloud.mark_dirty();
    }

    pub fn count(&self) -> usize {
        self.cloud.len()
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    pub fn point(&self, index: usize) -> [f32; 3] {
        self.cloud.point(index)
    }

    pub fn config(&self) -> &WaterConfig {
        &self.config
    }

    pub fn needs_update(&self) -> bool {
        self.cloud.needs_update()
    }

    pub fn mark_uploaded(&mut self) {
        self.cloud.mark_uploaded();
    }

    /// 回收点的水平落点区间 (x, z)
    pub fn reset_band(&self) -> (RangeInclusive<f32>, RangeInclusive<f32>) {
        let half = self.config.spread * 0.5;
        let [cx, cz] = self.config.center;
        ((cx - half)..=(cx + half), (cz - half)..=(cz + half))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_initial_positions_within_volume() {
        let config = WaterConfig::default();
        let water = WaterParticles::new(&config, &mut rng());
        assert_eq!(water.count(), 250);
        assert_eq!(water.cloud().positions().len(), 750);

        let (band_x, band_z) = water.reset_band();
        for i in 0..water.count() {
            let [x, y, z] = water.point(i);
            assert!(band_x.contains(&x));
            assert!(band_z.contains(&z));
            assert!((0.0..1.0).contains(&y));
        }
    }

    #[test]
    fn test_point_crossing_zero_is_recycled() {
        let config = WaterConfig {
            step: 0.02,
            ..Default::default()
        };
        let mut water = WaterParticles::with_positions(&config, &[[-0.55, 0.01, -0.5]]);
        water.update(&mut rng());

        let [x, y, z] = water.point(0);
        assert_eq!(y, config.reset_height);
        let (band_x, band_z) = water.reset_band();
        assert!(band_x.contains(&x));
        assert!(band_z.contains(&z));
    }

    #[test]
    fn test_point_landing_on_zero_is_kept() {
        let config = WaterConfig {
            step: 0.5,
            jitter: 0.0,
            ..Default::default()
        };
        let mut water = WaterParticles::with_positions(&config, &[[0.0, 0.5, 0.0]]);
        water.update(&mut rng());
        assert_eq!(water.point(0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_falling_point_jitters_horizontally() {
        let config = WaterConfig::default();
        let mut water = WaterParticles::with_positions(&config, &[[1.0, 0.5, 1.0]]);
        water.update(&mut rng());

        let [x, y, z] = water.point(0);
        assert_eq!(y, 0.5 - config.step);
        assert!((x - 1.0).abs() <= config.jitter * 0.5 + 1e-6);
        assert!((z - 1.0).abs() <= config.jitter * 0.5 + 1e-6);
    }

    #[test]
    fn test_update_marks_buffer_dirty() {
        let mut water = WaterParticles::new(&WaterConfig::default(), &mut rng());
        water.mark_uploaded();
        assert!(!water.needs_update());
        water.update(&mut rng());
        assert!(water.needs_update());
    }

    #[test]
    fn test_count_never_changes() {
        let mut water = WaterParticles::new(&WaterConfig::default(), &mut rng());
        let mut r = rng();
        for _ in 0..200 {
            water.update(&mut r);
        }
        assert_eq!(water.count(), 250);
        assert_eq!(water.cloud().positions().len(), 750);
    }

    proptest! {
        #[test]
        fn test_height_is_stepped_or_reset(
            heights in proptest::collection::vec(0.0f32..1.2, 1..64),
            seed in any::<u64>(),
        ) {
            let config = WaterConfig::default();
            let points: Vec<[f32; 3]> = heights.iter().map(|&y| [-0.55, y, -0.5]).collect();
            let mut water = WaterParticles::with_positions(&config, &points);
            water.update(&mut StdRng::seed_from_u64(seed));

            let (band_x, band_z) = water.reset_band();
            for (i, &before) in heights.iter().enumerate() {
                let [x, y, z] = water.point(i);
                let stepped = before - config.step;
                if stepped < 0.0 {
                    prop_assert_eq!(y, config.reset_height);
                    prop_assert!(band_x.contains(&x));
                    prop_assert!(band_z.contains(&z));
                } else {
                    prop_assert_eq!(y, stepped);
                }
            }
        }
    }
}
