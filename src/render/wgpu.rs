use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::PerspectiveCamera;
use crate::config::SceneConfig;
use crate::core::error::{RenderError, RenderResult};
use crate::render::mesh::{GpuMesh, MeshVertex};
use crate::render::particles::{DropletParticles, WaterParticles};
use crate::render::points::{
    modifier_instance_desc, position_instance_desc, CameraUniform, DropletUniform, QuadVertex,
    SconceUniform, WaterUniform, QUAD_INDICES, QUAD_VERTICES,
};
use crate::render::size::{srgb_hex_to_linear, RenderSize};
use crate::render::texture::{
    create_depth_view, create_msaa_view, texture_bind_group_layout, GpuTexture, DEPTH_FORMAT,
};
use crate::resources::{ColorSpace, LoadedTexture, MaterialKind, MeshData};

/// 一帧绘制需要读取的场景状态
pub struct RenderScene<'a> {
    pub camera: &'a PerspectiveCamera,
    pub water: &'a WaterParticles,
    pub droplets: &'a DropletParticles,
}

impl RenderScene<'_> {
    pub fn camera_uniform(&self) -> CameraUniform {
        CameraUniform::from_camera(self.camera)
    }
}

/// 运行时替换的场景贴图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTexture {
    Baked,
    Particle,
}

struct PipelineSpec<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    vertex_module: &'a wgpu::ShaderModule,
    fragment_module: &'a wgpu::ShaderModule,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    blend: wgpu::BlendState,
    depth_write: bool,
    cull_mode: Option<wgpu::Face>,
}

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    clear_color: wgpu::Color,

    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,

    // Model
    baked_pipeline: wgpu::RenderPipeline,
    baked_texture: GpuTexture,
    sconce_pipeline: wgpu::RenderPipeline,
    sconce_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,

    // Points
    quad_vertex_buffer: wgpu::Buffer,
    quad_index_buffer: wgpu::Buffer,

    water_pipeline: wgpu::RenderPipeline,
    water_uniform_buffer: wgpu::Buffer,
    water_bind_group: wgpu::BindGroup,
    water_positions: wgpu::Buffer,
    water_count: u32,
    water_color: [f32; 3],
    water_size: f32,
    particle_texture: GpuTexture,

    droplet_pipeline: wgpu::RenderPipeline,
    droplet_uniform_buffer: wgpu::Buffer,
    droplet_bind_group: wgpu::BindGroup,
    droplet_positions: wgpu::Buffer,
    droplet_modifiers: wgpu::Buffer,
    droplet_count: u32,
}

impl WgpuRenderer {
    pub async fn new(
        window: Arc<Window>,
        scene_config: &SceneConfig,
        size: RenderSize,
        scene: &RenderScene<'_>,
    ) -> RenderResult<Self> {
        let (water, droplets) = (scene.water, scene.droplets);
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|e| RenderError::SurfaceCreation(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;
        tracing::info!(target: "render", "Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    label: Some("Scene Device"),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::DeviceRequest(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| RenderError::SurfaceCreation("surface reports no formats".to_string()))?;
        let present_mode = if scene_config.renderer.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let mut sample_count = scene_config.renderer.sample_count();
        if sample_count > 1
            && !adapter
                .get_texture_format_features(format)
                .flags
                .sample_count_supported(sample_count)
        {
            tracing::warn!(target: "render", "{}x MSAA unsupported for {:?}, falling back to 1x", sample_count, format);
            sample_count = 1;
        }
        tracing::info!(
            target: "render",
            width = config.width,
            height = config.height,
            ?format,
            sample_count,
            "Surface configured"
        );

        let depth_view = create_depth_view(&device, config.width, config.height, sample_count);
        let msaa_view = create_msaa_view(&device, format, config.width, config.height, sample_count);

        // --- Shared bindings ---
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::bytes_of(&scene.camera_uniform()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let uniform_layout = |label: &str, visibility: wgpu::ShaderStages| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            })
        };
        let camera_layout = uniform_layout("Camera Bind Group Layout", wgpu::ShaderStages::VERTEX);
        let camera_bind_group = uniform_bind_group(&device, "Camera Bind Group", &camera_layout, &camera_buffer);
        let texture_layout = texture_bind_group_layout(&device, "Texture Bind Group Layout");

        // --- Model pipelines ---
        let baked_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Baked Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/baked.wgsl").into()),
        });
        let baked_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Baked Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let mesh_buffers = [MeshVertex::desc()];
        let baked_pipeline = create_pipeline(
            &device,
            format,
            sample_count,
            PipelineSpec {
                label: "Baked Pipeline",
                layout: &baked_layout,
                vertex_module: &baked_shader,
                fragment_module: &baked_shader,
                buffers: &mesh_buffers,
                blend: wgpu::BlendState::REPLACE,
                depth_write: true,
                cull_mode: Some(wgpu::Face::Back),
            },
        );
        let baked_texture = GpuTexture::placeholder(
            &device,
            &queue,
            &texture_layout,
            "Baked Placeholder",
            [0, 0, 0, 255],
            ColorSpace::Srgb,
        );

        let sconce_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sconce Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sconce.wgsl").into()),
        });
        let sconce_layout_bg = uniform_layout("Sconce Bind Group Layout", wgpu::ShaderStages::FRAGMENT);
        let sconce_color = srgb_hex_to_linear(scene_config.materials.sconce_light_color);
        let sconce_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sconce Uniform Buffer"),
            contents: bytemuck::bytes_of(&SconceUniform {
                color: [sconce_color[0], sconce_color[1], sconce_color[2], 1.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let sconce_bind_group = uniform_bind_group(&device, "Sconce Bind Group", &sconce_layout_bg, &sconce_buffer);
        let sconce_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sconce Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &sconce_layout_bg],
            push_constant_ranges: &[],
        });
        let sconce_pipeline = create_pipeline(
            &device,
            format,
            sample_count,
            PipelineSpec {
                label: "Sconce Pipeline",
                layout: &sconce_layout,
                vertex_module: &sconce_shader,
                fragment_module: &sconce_shader,
                buffers: &mesh_buffers,
                blend: wgpu::BlendState::REPLACE,
                depth_write: true,
                cull_mode: Some(wgpu::Face::Back),
            },
        );

        // --- Point clouds ---
        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Quad Index Buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let water_config = &scene_config.water;
        let water_color = srgb_hex_to_linear(water_config.color);
        let water_size = water_config.size;
        let water_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Water Points Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/water_points.wgsl").into()),
        });
        let water_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Uniform Buffer"),
            contents: bytemuck::bytes_of(&WaterUniform::new(water_color, water_size, size.aspect())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let water_layout_bg = uniform_layout(
            "Water Bind Group Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let water_bind_group = uniform_bind_group(&device, "Water Bind Group", &water_layout_bg, &water_uniform_buffer);
        let water_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Water Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &water_layout_bg, &texture_layout],
            push_constant_ranges: &[],
        });
        let water_buffers = [QuadVertex::desc(), position_instance_desc()];
        let water_pipeline = create_pipeline(
            &device,
            format,
            sample_count,
            PipelineSpec {
                label: "Water Points Pipeline",
                layout: &water_layout,
                vertex_module: &water_shader,
                fragment_module: &water_shader,
                buffers: &water_buffers,
                blend: ADDITIVE,
                depth_write: false,
                cull_mode: None,
            },
        );
        let water_positions = point_buffer(
            &device,
            "Water Position Buffer",
            water.cloud().positions(),
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );
        let particle_texture = GpuTexture::placeholder(
            &device,
            &queue,
            &texture_layout,
            "Particle Placeholder",
            [0, 0, 0, 255],
            ColorSpace::Linear,
        );

        let droplet_vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Droplet Vertex Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/droplet/vertex.wgsl").into()),
        });
        let droplet_fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Droplet Fragment Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/droplet/fragment.wgsl").into()),
        });
        let droplet_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Droplet Uniform Buffer"),
            contents: bytemuck::bytes_of(&DropletUniform::new(
                droplets.uniforms(),
                droplets.size(),
                size.aspect(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let droplet_layout_bg = uniform_layout("Droplet Bind Group Layout", wgpu::ShaderStages::VERTEX);
        let droplet_bind_group =
            uniform_bind_group(&device, "Droplet Bind Group", &droplet_layout_bg, &droplet_uniform_buffer);
        let droplet_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Droplet Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &droplet_layout_bg],
            push_constant_ranges: &[],
        });
        let droplet_buffers = [
            QuadVertex::desc(),
            position_instance_desc(),
            modifier_instance_desc(),
        ];
        let droplet_pipeline = create_pipeline(
            &device,
            format,
            sample_count,
            PipelineSpec {
                label: "Droplet Pipeline",
                layout: &droplet_layout,
                vertex_module: &droplet_vertex,
                fragment_module: &droplet_fragment,
                buffers: &droplet_buffers,
                blend: ADDITIVE,
                depth_write: false,
                cull_mode: None,
            },
        );
        let droplet_positions = point_buffer(
            &device,
            "Droplet Position Buffer",
            droplets.cloud().positions(),
            wgpu::BufferUsages::VERTEX,
        );
        let droplet_modifiers = point_buffer(
            &device,
            "Droplet Modifier Buffer",
            droplets.modifiers(),
            wgpu::BufferUsages::VERTEX,
        );

        let [r, g, b] = scene_config.renderer.clear_color;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            sample_count,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
            depth_view,
            msaa_view,
            camera_buffer,
            camera_bind_group,
            texture_layout,
            baked_pipeline,
            baked_texture,
            sconce_pipeline,
            sconce_bind_group,
            meshes: Vec::new(),
            quad_vertex_buffer,
            quad_index_buffer,
            water_pipeline,
            water_uniform_buffer,
            water_bind_group,
            water_positions,
            water_count: water.count() as u32,
            water_color,
            water_size,
            particle_texture,
            droplet_pipeline,
            droplet_uniform_buffer,
            droplet_bind_group,
            droplet_positions,
            droplet_modifiers,
            droplet_count: droplets.count() as u32,
        })
    }

    /// 重新配置表面与深度/多重采样目标，零尺寸直接忽略
    pub fn resize(&mut self, size: RenderSize) {
        if size.is_empty() {
            return;
        }
        if size.width == self.config.width && size.height == self.config.height {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.reconfigure();
        tracing::debug!(target: "render", width = size.width, height = size.height, "Surface resized");
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(
            &self.device,
            self.config.width,
            self.config.height,
            self.sample_count,
        );
        self.msaa_view = create_msaa_view(
            &self.device,
            self.config.format,
            self.config.width,
            self.config.height,
            self.sample_count,
        );
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// 用已解码的图片替换占位贴图
    pub fn set_texture(&mut self, slot: SceneTexture, texture: &LoadedTexture) {
        let label = match slot {
            SceneTexture::Baked => "Baked Texture",
            SceneTexture::Particle => "Particle Alpha Texture",
        };
        let gpu = GpuTexture::from_rgba(
            &self.device,
            &self.queue,
            &self.texture_layout,
            label,
            &texture.image,
            texture.color_space,
        );
        tracing::debug!(target: "render", "{} uploaded ({}x{})", label, gpu.size[0], gpu.size[1]);
        match slot {
            SceneTexture::Baked => self.baked_texture = gpu,
            SceneTexture::Particle => self.particle_texture = gpu,
        }
    }

    /// 上传模型网格，空网格跳过
    pub fn upload_model<'m, I>(&mut self, meshes: I)
    where
        I: IntoIterator<Item = (&'m str, MaterialKind, &'m MeshData)>,
    {
        for (name, material, mesh) in meshes {
            if mesh.is_empty() {
                tracing::debug!(target: "render", "Skipping empty mesh for node '{}'", name);
                continue;
            }
            self.meshes.push(GpuMesh::new(&self.device, name, mesh, material));
        }
        tracing::info!(target: "render", "{} model meshes on GPU", self.meshes.len());
    }

    /// 位置缓冲只在脏标记置位时写入，写入后清除标记
    pub fn upload_water(&mut self, water: &mut WaterParticles) {
        if !water.needs_update() {
            return;
        }
        let positions = water.cloud().positions();
        if !positions.is_empty() {
            self.queue
                .write_buffer(&self.water_positions, 0, bytemuck::cast_slice(positions));
        }
        water.mark_uploaded();
    }

    pub fn write_droplet_uniforms(&mut self, droplets: &DropletParticles) {
        let uniform = DropletUniform::new(droplets.uniforms(), droplets.size(), self.aspect());
        self.queue
            .write_buffer(&self.droplet_uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// 提交一帧
    ///
    /// 表面丢失或过期时重新配置并跳过该帧；内存耗尽作为错误返回。
    pub fn render(&mut self, scene: &RenderScene) -> RenderResult<()> {
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&scene.camera_uniform()),
        );
        self.queue.write_buffer(
            &self.water_uniform_buffer,
            0,
            bytemuck::bytes_of(&WaterUniform::new(self.water_color, self.water_size, self.aspect())),
        );

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!(target: "render", "Surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!(target: "render", "Surface acquire timed out, skipping frame");
                return Ok(());
            }
            Err(e) => {
                return Err(RenderError::Surface(e.to_string()));
            }
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let (color_view, resolve_target) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(&view)),
            None => (&view, None),
        };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            rpass.set_bind_group(0, &self.camera_bind_group, &[]);

            // Opaque model
            for mesh in &self.meshes {
                match mesh.material {
                    MaterialKind::Baked => {
                        rpass.set_pipeline(&self.baked_pipeline);
                        rpass.set_bind_group(1, &self.baked_texture.bind_group, &[]);
                    }
                    MaterialKind::SconceLight => {
                        rpass.set_pipeline(&self.sconce_pipeline);
                        rpass.set_bind_group(1, &self.sconce_bind_group, &[]);
                    }
                }
                rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            // Additive points
            let quad_index_count = QUAD_INDICES.len() as u32;
            let water_count = (scene.water.count() as u32).min(self.water_count);
            let droplet_count = (scene.droplets.count() as u32).min(self.droplet_count);
            if water_count > 0 {
                rpass.set_pipeline(&self.water_pipeline);
                rpass.set_bind_group(1, &self.water_bind_group, &[]);
                rpass.set_bind_group(2, &self.particle_texture.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
                rpass.set_vertex_buffer(1, self.water_positions.slice(..));
                rpass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..quad_index_count, 0, 0..water_count);
            }
            if droplet_count > 0 {
                rpass.set_pipeline(&self.droplet_pipeline);
                rpass.set_bind_group(1, &self.droplet_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
                rpass.set_vertex_buffer(1, self.droplet_positions.slice(..));
                rpass.set_vertex_buffer(2, self.droplet_modifiers.slice(..));
                rpass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..quad_index_count, 0, 0..droplet_count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn uniform_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

/// 点属性缓冲；空点云也分配一个元素，避免零长度缓冲
fn point_buffer(device: &wgpu::Device, label: &str, data: &[f32], usage: wgpu::BufferUsages) -> wgpu::Buffer {
    if data.is_empty() {
        return device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: 16,
            usage,
            mapped_at_creation: false,
        });
    }
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage,
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    sample_count: u32,
    spec: PipelineSpec,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(spec.layout),
        vertex: wgpu::VertexState {
            module: spec.vertex_module,
            entry_point: "vs_main",
            buffers: spec.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: spec.fragment_module,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(spec.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: spec.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: spec.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
