//! 点云绘制用的GPU数据布局
//!
//! 每个点展开为一个面向相机的四边形（实例化绘制），
//! 单位四边形顶点在`[-0.5, 0.5]`内，实例属性为点的位置。

use crate::camera::PerspectiveCamera;
use crate::render::particles::DropletUniforms;
use crate::render::size::point_scale;

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub corner: [f32; 2],
}

pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { corner: [-0.5, -0.5] },
    QuadVertex { corner: [0.5, -0.5] },
    QuadVertex { corner: [0.5, 0.5] },
    QuadVertex { corner: [-0.5, 0.5] },
];

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

impl QuadVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// 每点位置（`[x, y, z]`紧密排列，与点云缓冲一致）
pub fn position_instance_desc<'a>() -> wgpu::VertexBufferLayout<'a> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ATTRIBUTES,
    }
}

/// 每点`aMod`修正值
pub fn modifier_instance_desc<'a>() -> wgpu::VertexBufferLayout<'a> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32];
    wgpu::VertexBufferLayout {
        array_stride: 4,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ATTRIBUTES,
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: camera.position.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SconceUniform {
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WaterUniform {
    pub color: [f32; 4],
    /// 裁剪空间半宽高系数，见[`point_scale`]
    pub scale: [f32; 2],
    pub _pad: [f32; 2],
}

impl WaterUniform {
    pub fn new(color: [f32; 3], size: f32, aspect: f32) -> Self {
        Self {
            color: [color[0], color[1], color[2], 1.0],
            scale: point_scale(size, aspect),
            _pad: [0.0; 2],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DropletUniform {
    pub time: f32,
    pub _pad: f32,
    pub scale: [f32; 2],
}

impl DropletUniform {
    pub fn new(uniforms: DropletUniforms, size: f32, aspect: f32) -> Self {
        Self {
            time: uniforms.time,
            _pad: 0.0,
            scale: point_scale(size, aspect),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
        assert_eq!(std::mem::size_of::<SconceUniform>(), 16);
        assert_eq!(std::mem::size_of::<WaterUniform>(), 32);
        assert_eq!(std::mem::size_of::<DropletUniform>(), 16);
    }

    #[test]
    fn test_droplet_uniform_starts_with_time() {
        let uniform = DropletUniform::new(DropletUniforms { time: 5.0 }, 0.1, 1.0);
        let bytes = bytemuck::bytes_of(&uniform);
        assert_eq!(&bytes[0..4], &5.0f32.to_ne_bytes());
    }

    #[test]
    fn test_quad_covers_unit_square() {
        for v in QUAD_VERTICES {
            assert!(v.corner.iter().all(|c| c.abs() == 0.5));
        }
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }
}
