//! 引擎主入口
//!
//! 定义Engine结构和主运行循环

use std::time::Instant;

use winit::event::{Event, WindowEvent};
use winit::event_loop::{EventLoop, EventLoopWindowTarget};

use crate::config::{AssetsConfig, ConfigSource, LoggingConfig, SceneConfig};
use crate::platform::{translate_window_event, WinitWindow};
use crate::render::{RenderSize, SceneTexture, WgpuRenderer};
use crate::resources::{
    import_model_nodes, AssetEvent, AssetServer, ColorSpace, GltfScene, Handle, LoadedTexture,
};
use crate::scene::SceneContext;

use super::error::{EngineError, EngineResult, RenderError, RenderResult};

/// 场景启动时排队加载的三个资源
struct SceneAssets {
    model: Handle<GltfScene>,
    baked: Handle<LoadedTexture>,
    particle: Handle<LoadedTexture>,
}

impl SceneAssets {
    fn queue(server: &AssetServer, config: &AssetsConfig) -> Self {
        Self {
            model: server.load_gltf(&config.model_path()),
            baked: server.load_texture(&config.baked_texture_path(), ColorSpace::Srgb),
            particle: server.load_texture(&config.particle_texture_path(), ColorSpace::Linear),
        }
    }

    fn texture_slot(&self, handle: &Handle<LoadedTexture>) -> Option<SceneTexture> {
        if handle.same_asset(&self.baked) {
            Some(SceneTexture::Baked)
        } else if handle.same_asset(&self.particle) {
            Some(SceneTexture::Particle)
        } else {
            None
        }
    }
}

/// 引擎主结构
///
/// 负责：
/// - 加载配置、初始化日志
/// - 创建窗口、渲染器和后台资源加载器
/// - 驱动显示刷新回调：取回资源 → 推进场景 → 上传粒子 → 提交帧
///
/// # 示例
///
/// ```no_run
/// use bathroom_scene::core::Engine;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     Engine::run()?;
///     Ok(())
/// }
/// ```
pub struct Engine;

impl Engine {
    /// 运行引擎主循环，关闭窗口后返回
    pub fn run() -> EngineResult<()> {
        let (config, source) = Self::load_config()?;
        Self::initialize_logging(&config.logging);
        tracing::info!(target: "engine", "Configuration loaded from {}", source);

        let event_loop = EventLoop::new()
            .map_err(|e| EngineError::EventLoop(format!("Failed to create event loop: {}", e)))?;
        let window = WinitWindow::try_new(&event_loop, &config.window)
            .ok_or_else(|| EngineError::Window("Failed to create window".to_string()))?;

        let mut scene = SceneContext::new(&config, None);
        let (width, height) = window.logical_size();
        scene.resize(width, height);

        let size = Self::render_size(&window, &config);
        let renderer = pollster::block_on(WgpuRenderer::new(
            window.shared(),
            &config,
            size,
            &scene.render_scene(),
        ))?;

        let asset_server = AssetServer::new()?;
        let assets = SceneAssets::queue(&asset_server, &config.assets);

        Self::run_event_loop(event_loop, window, config, scene, renderer, asset_server, assets)
    }

    /// 配置文件 → 环境变量覆盖 → 校验
    ///
    /// 此时日志尚未初始化，来源交给调用方在初始化后记录。
    fn load_config() -> EngineResult<(SceneConfig, ConfigSource)> {
        let (mut config, source) = SceneConfig::load_from_dir(".");
        config.apply_env_overrides();
        config.validate()?;
        Ok((config, source))
    }

    /// 初始化日志系统，`RUST_LOG`优先于配置中的级别
    fn initialize_logging(logging: &LoggingConfig) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(logging.level.as_directive()));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        tracing::info!(target: "engine", "Engine starting");
    }

    fn render_size(window: &WinitWindow, config: &SceneConfig) -> RenderSize {
        let (width, height) = window.logical_size();
        RenderSize::from_window(
            width as f64,
            height as f64,
            window.scale_factor(),
            config.renderer.max_pixel_ratio as f64,
        )
    }

    fn run_event_loop(
        event_loop: EventLoop<()>,
        window: WinitWindow,
        config: SceneConfig,
        mut scene: SceneContext,
        mut renderer: WgpuRenderer,
        mut asset_server: AssetServer,
        assets: SceneAssets,
    ) -> EngineResult<()> {
        let start = Instant::now();
        let mut fatal: Option<RenderError> = None;

        let result = event_loop.run(|event, elwt| match event {
            Event::WindowEvent { event, window_id } if window_id == window.id() => {
                Self::handle_window_event(
                    &event,
                    &window,
                    &config,
                    &mut scene,
                    &mut renderer,
                    &mut asset_server,
                    &assets,
                    start,
                    &mut fatal,
                    elwt,
                );
            }
            Event::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        });

        tracing::info!(target: "engine", "Event loop finished");
        if let Some(e) = fatal {
            return Err(e.into());
        }
        result.map_err(|e| EngineError::EventLoop(format!("Event loop error: {}", e)))?;

        Ok(())
    }

    /// 处理窗口事件
    #[allow(clippy::too_many_arguments)]
    fn handle_window_event(
        event: &WindowEvent,
        window: &WinitWindow,
        config: &SceneConfig,
        scene: &mut SceneContext,
        renderer: &mut WgpuRenderer,
        asset_server: &mut AssetServer,
        assets: &SceneAssets,
        start: Instant,
        fatal: &mut Option<RenderError>,
        elwt: &EventLoopWindowTarget<()>,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!(target: "engine", "Close requested");
                elwt.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                let (width, height) = window.logical_size();
                if scene.resize(width, height) {
                    renderer.resize(Self::render_size(window, config));
                }
            }
            WindowEvent::RedrawRequested => {
                Self::process_asset_events(asset_server, assets, scene, renderer);
                scene.tick(start.elapsed().as_secs_f64() * 1000.0);
                if let Err(e) = Self::render_frame(scene, renderer) {
                    tracing::error!(target: "render", "Fatal render error: {}", e);
                    *fatal = Some(e);
                    elwt.exit();
                }
            }
            other => {
                if let Some(input) = translate_window_event(other, window.scale_factor()) {
                    scene.handle_input(&input);
                }
            }
        }
    }

    /// 取回后台加载结果；失败只记录日志，对应资源不会出现
    fn process_asset_events(
        asset_server: &mut AssetServer,
        assets: &SceneAssets,
        scene: &mut SceneContext,
        renderer: &mut WgpuRenderer,
    ) {
        for event in asset_server.update() {
            match event {
                AssetEvent::GltfLoaded(handle, ms) => {
                    if !handle.same_asset(&assets.model) {
                        continue;
                    }
                    let Some(gltf) = handle.get() else {
                        continue;
                    };
                    let nodes = import_model_nodes(gltf.document(), gltf.buffers());
                    tracing::info!(target: "assets", "Model loaded in {:.1}ms with {} root nodes", ms, nodes.len());
                    scene.attach_model(&nodes);
                    renderer.upload_model(scene.model_nodes());
                }
                AssetEvent::TextureLoaded(handle, ms) => {
                    let (Some(slot), Some(texture)) = (assets.texture_slot(&handle), handle.get()) else {
                        continue;
                    };
                    tracing::info!(target: "assets", "{:?} texture loaded in {:.1}ms", slot, ms);
                    renderer.set_texture(slot, &texture);
                }
                AssetEvent::TextureFailed(_, e) | AssetEvent::GltfFailed(_, e) => {
                    tracing::warn!(target: "assets", "Asset failed to load: {}", e);
                }
            }
        }
    }

    fn render_frame(scene: &mut SceneContext, renderer: &mut WgpuRenderer) -> RenderResult<()> {
        renderer.upload_water(&mut scene.water_mut());
        renderer.write_droplet_uniforms(scene.droplets());
        renderer.render(&scene.render_scene())
    }
}
