//! 相机与轨道控制
//!
//! - [`PerspectiveCamera`]：透视相机状态（位置、朝向、宽高比）
//! - [`OrbitControls`]：围绕目标点旋转/缩放/平移的输入驱动操纵器，支持阻尼插值

pub mod orbit;
pub mod perspective;

use bevy_ecs::prelude::*;

pub use orbit::OrbitControls;
pub use perspective::PerspectiveCamera;

/// 每帧应用一次轨道控制（阻尼插值朝向最近一次输入）
pub fn orbit_controls_system(
    mut controls: ResMut<OrbitControls>,
    mut camera: ResMut<PerspectiveCamera>,
) {
    controls.update(&mut camera);
}
