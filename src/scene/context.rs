use bevy_ecs::prelude::*;

use crate::camera::{orbit_controls_system, OrbitControls, PerspectiveCamera};
use crate::config::SceneConfig;
use crate::ecs::{Time, Viewport};
use crate::platform::InputEvent;
use crate::render::particles::{
    droplet_time_system, water_update_system, DropletParticles, SceneRng, WaterParticles,
};
use crate::render::RenderScene;
use crate::resources::{spawn_model, MaterialKind, MeshData, MeshMaterial, ModelNode, ModelNodeName};

/// 场景上下文：世界、每帧调度以及已挂载的模型实体
pub struct SceneContext {
    world: World,
    schedule: Schedule,
    model_entities: Vec<Entity>,
}

impl SceneContext {
    /// `rng_seed`为`None`时从熵源播种
    pub fn new(config: &SceneConfig, rng_seed: Option<u64>) -> Self {
        let mut rng = match rng_seed {
            Some(seed) => SceneRng::seeded(seed),
            None => SceneRng::from_entropy(),
        };
        let water = WaterParticles::new(&config.water, &mut rng.0);
        let droplets = DropletParticles::new(&config.droplets, &mut rng.0);

        let viewport = Viewport {
            width: config.window.width.max(1),
            height: config.window.height.max(1),
        };
        let camera = PerspectiveCamera::from_config(&config.camera, viewport.aspect());
        let controls = OrbitControls::new(&config.camera);

        let mut world = World::new();
        world.insert_resource(Time::default());
        world.insert_resource(viewport);
        world.insert_resource(rng);
        world.insert_resource(water);
        world.insert_resource(droplets);
        world.insert_resource(camera);
        world.insert_resource(controls);

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                water_update_system,
                droplet_time_system,
                orbit_controls_system,
            )
                .chain(),
        );

        tracing::info!(
            target: "scene",
            water = config.water.count,
            droplets = config.droplets.count,
            "Scene created"
        );

        Self {
            world,
            schedule,
            model_entities: Vec::new(),
        }
    }

    /// 推进一帧，`timestamp_ms`为显示刷新回调给出的毫秒时间戳
    pub fn tick(&mut self, timestamp_ms: f64) {
        let seconds = timestamp_ms / 1000.0;
        self.world.resource_mut::<Time>().advance_to(seconds);
        self.schedule.run(&mut self.world);
    }

    /// 窗口尺寸变化：相机宽高比取`width / height`，零尺寸忽略
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            tracing::debug!(target: "scene", width, height, "Ignoring zero-sized resize");
            return false;
        }
        let viewport = Viewport { width, height };
        self.world.insert_resource(viewport);
        self.world
            .resource_mut::<PerspectiveCamera>()
            .set_aspect(viewport.aspect());
        true
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        if let InputEvent::WindowResized { width, height } = *event {
            self.resize(width, height);
            return;
        }
        let height = self.world.resource::<Viewport>().height as f32;
        self.world
            .resource_scope(|world, mut controls: Mut<OrbitControls>| {
                let camera = world.resource::<PerspectiveCamera>();
                controls.handle_input(event, height, camera);
            });
    }

    /// 挂载模型根节点，只接受第一次加载的结果
    pub fn attach_model(&mut self, nodes: &[ModelNode]) -> &[Entity] {
        if !self.model_entities.is_empty() {
            tracing::warn!(target: "scene", "Model already attached, ignoring");
            return &self.model_entities;
        }
        self.model_entities = spawn_model(&mut self.world, nodes);
        for node in nodes {
            tracing::debug!(target: "scene", "Node '{}' -> {:?}", node.name, node.material());
        }
        &self.model_entities
    }

    /// 已挂载节点，按模型中的顺序
    pub fn model_nodes(&self) -> Vec<(&str, MaterialKind, &MeshData)> {
        self.model_entities
            .iter()
            .filter_map(|&entity| {
                let name = self.world.get::<ModelNodeName>(entity)?;
                let material = self.world.get::<MeshMaterial>(entity)?;
                let mesh = self.world.get::<MeshData>(entity)?;
                Some((name.0.as_str(), material.0, mesh))
            })
            .collect()
    }

    pub fn render_scene(&self) -> RenderScene<'_> {
        RenderScene {
            camera: self.world.resource::<PerspectiveCamera>(),
            water: self.world.resource::<WaterParticles>(),
            droplets: self.world.resource::<DropletParticles>(),
        }
    }

    pub fn time(&self) -> Time {
        *self.world.resource::<Time>()
    }

    pub fn viewport(&self) -> Viewport {
        *self.world.resource::<Viewport>()
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        self.world.resource::<PerspectiveCamera>()
    }

    pub fn controls(&self) -> &OrbitControls {
        self.world.resource::<OrbitControls>()
    }

    pub fn water(&self) -> &WaterParticles {
        self.world.resource::<WaterParticles>()
    }

    pub fn water_mut(&mut self) -> Mut<'_, WaterParticles> {
        self.world.resource_mut::<WaterParticles>()
    }

    pub fn droplets(&self) -> &DropletParticles {
        self.world.resource::<DropletParticles>()
    }

    /// 替换水粒子（测试中用于放置确定的初始位置）
    pub fn set_water(&mut self, water: WaterParticles) {
        self.world.insert_resource(water);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_time_and_particles() {
        let mut scene = SceneContext::new(&SceneConfig::default(), Some(7));
        let before = scene.water().cloud().clone();

        scene.tick(16.0);
        assert_eq!(scene.time().elapsed_seconds, 0.016);
        assert!((scene.droplets().uniforms().time - 0.016).abs() < 1e-7);
        assert!(scene.water().needs_update());
        assert_ne!(scene.water().cloud(), &before);

        scene.tick(48.0);
        assert!((scene.time().delta_seconds - 0.032).abs() < 1e-6);
    }

    #[test]
    fn test_camera_uniform_follows_scene_camera() {
        let mut config = SceneConfig::default();
        config.camera.fov_degrees = 60.0;
        config.camera.position = [1.0, 3.0, 5.0];
        let mut scene = SceneContext::new(&config, Some(7));
        scene.resize(1600, 900);

        let uniform = scene.render_scene().camera_uniform();
        assert_eq!(uniform.position, [1.0, 3.0, 5.0, 1.0]);
        assert_eq!(
            uniform.view_proj,
            scene.camera().view_projection().to_cols_array_2d()
        );

        let fallback = PerspectiveCamera::new(45.0, 1.0, 0.1, 100.0);
        assert_ne!(
            uniform.view_proj,
            fallback.view_projection().to_cols_array_2d()
        );
    }

    #[test]
    fn test_resize_sets_exact_aspect() {
        let mut scene = SceneContext::new(&SceneConfig::default(), Some(1));
        assert!(scene.resize(1000, 500));
        assert_eq!(scene.camera().aspect, 2.0);
        assert_eq!(scene.viewport(), Viewport { width: 1000, height: 500 });
    }

    #[test]
    fn test_zero_resize_is_ignored() {
        let mut scene = SceneContext::new(&SceneConfig::default(), Some(1));
        scene.resize(800, 600);
        assert!(!scene.resize(0, 600));
        assert!(!scene.resize(800, 0));
        assert_eq!(scene.camera().aspect, 800.0 / 600.0);
    }

    #[test]
    fn test_resize_input_event_routes_to_handler() {
        let mut scene = SceneContext::new(&SceneConfig::default(), Some(1));
        scene.handle_input(&InputEvent::WindowResized {
            width: 300,
            height: 100,
        });
        assert_eq!(scene.camera().aspect, 3.0);
    }

    #[test]
    fn test_model_attaches_once() {
        let mut scene = SceneContext::new(&SceneConfig::default(), Some(1));
        let nodes = vec![
            ModelNode {
                name: "baked".to_string(),
                meshes: vec![],
            },
            ModelNode {
                name: "sconceLightB".to_string(),
                meshes: vec![],
            },
        ];
        assert_eq!(scene.attach_model(&nodes).len(), 2);
        assert_eq!(scene.attach_model(&nodes).len(), 2);

        let attached: Vec<_> = scene
            .model_nodes()
            .into_iter()
            .map(|(name, material, _)| (name.to_string(), material))
            .collect();
        assert_eq!(
            attached,
            vec![
                ("baked".to_string(), MaterialKind::Baked),
                ("sconceLightB".to_string(), MaterialKind::SconceLight),
            ]
        );
    }
}
