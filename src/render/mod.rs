//! 渲染模块
//!
//! - `wgpu` - 表面、管线与逐帧提交
//! - `particles` - 水流与水滴两组点云（CPU端状态）
//! - `points` / `mesh` / `texture` - GPU数据布局与资源
//! - `size` - 像素比与颜色换算

pub mod mesh;
pub mod particles;
pub mod points;
pub mod size;
pub mod texture;
pub mod wgpu;

pub use self::wgpu::{RenderScene, SceneTexture, WgpuRenderer};
pub use size::{point_scale, srgb_hex_to_linear, RenderSize};
