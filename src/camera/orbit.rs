use std::f32::consts::PI;

use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};

use super::PerspectiveCamera;
use crate::config::CameraConfig;
use crate::platform::{InputEvent, MouseButton};

const EPS: f32 = 0.000_001;
/// 极角与两极保持的最小距离（弧度），要经得起f32的位置往返
const POLAR_EPS: f32 = 0.001;

/// 球坐标（y轴向上）：`theta`绕y轴，`phi`为与+y的夹角
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_vec3(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            // 靠近两极时acos精度不足
            phi: Vec2::new(v.x, v.z).length().atan2(v.y),
        }
    }

    pub fn to_vec3(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// 把`phi`限制在(0, PI)开区间内，避免视线与up轴重合
    pub fn make_safe(&mut self) {
        self.phi = self.phi.max(POLAR_EPS).min(PI - POLAR_EPS);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    button: MouseButton,
    last: Vec2,
}

/// 轨道控制器
///
/// 左键拖动旋转，右键拖动平移，中键拖动或滚轮缩放。
/// 输入只累积增量；真正修改相机发生在[`OrbitControls::update`]。
#[derive(Resource, Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    spherical_delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
    cursor: Option<Vec2>,
    drag: Option<Drag>,
}

impl OrbitControls {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            target: Vec3::from(config.target),
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: 1.0,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            cursor: None,
            drag: None,
        }
    }

    /// 是否还有未消化的运动（阻尼尾巴或尚未应用的输入）
    pub fn is_settling(&self) -> bool {
        self.spherical_delta.theta.abs() > EPS
            || self.spherical_delta.phi.abs() > EPS
            || (self.scale - 1.0).abs() > EPS
            || self.pan_offset.length_squared() > EPS * EPS
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// 拉近（`dolly_scale` < 1 时半径缩小）
    pub fn dolly_in(&mut self, dolly_scale: f32) {
        self.scale *= dolly_scale;
    }

    pub fn dolly_out(&mut self, dolly_scale: f32) {
        self.scale /= dolly_scale;
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    /// 在屏幕平面内平移目标点，`dx`/`dy`为逻辑像素
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: f32, camera: &PerspectiveCamera) {
        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        let distance = (camera.position - self.target).length();
        let target_distance = distance * (camera.fov.to_radians() * 0.5).tan();
        let height = viewport_height.max(1.0);

        self.pan_offset -= right * (2.0 * dx * target_distance / height) * self.pan_speed;
        self.pan_offset += up * (2.0 * dy * target_distance / height) * self.pan_speed;
    }

    /// 累积一条输入事件
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        viewport_height: f32,
        camera: &PerspectiveCamera,
    ) {
        match *event {
            InputEvent::MouseButtonPressed { button } => {
                if let Some(cursor) = self.cursor {
                    self.drag = Some(Drag {
                        button,
                        last: cursor,
                    });
                }
            }
            InputEvent::MouseButtonReleased { button } => {
                if self.drag.map(|d| d.button) == Some(button) {
                    self.drag = None;
                }
            }
            InputEvent::MouseMoved { x, y } => {
                let position = Vec2::new(x, y);
                self.cursor = Some(position);
                let Some(drag) = self.drag.as_mut() else {
                    return;
                };
                let delta = position - drag.last;
                drag.last = position;
                let button = drag.button;
                self.apply_drag(button, delta, viewport_height, camera);
            }
            InputEvent::MouseWheel { delta_y, .. } => {
                if delta_y > 0.0 {
                    self.dolly_in(self.zoom_scale());
                } else if delta_y < 0.0 {
                    self.dolly_out(self.zoom_scale());
                }
            }
            InputEvent::WindowResized { .. } => {}
        }
    }

    fn apply_drag(
        &mut self,
        button: MouseButton,
        delta: Vec2,
        viewport_height: f32,
        camera: &PerspectiveCamera,
    ) {
        let height = viewport_height.max(1.0);
        match button {
            MouseButton::Left => {
                let rotate = delta * self.rotate_speed;
                self.rotate_left(2.0 * PI * rotate.x / height);
                self.rotate_up(2.0 * PI * rotate.y / height);
            }
            MouseButton::Right => self.pan(delta.x, delta.y, height, camera),
            MouseButton::Middle => {
                if delta.y > 0.0 {
                    self.dolly_out(self.zoom_scale());
                } else if delta.y < 0.0 {
                    self.dolly_in(self.zoom_scale());
                }
            }
            MouseButton::Other(_) => {}
        }
    }

    /// 应用累积的增量并让相机看向目标，返回相机是否移动
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let previous_position = camera.position;
        let previous_target = camera.target;

        let offset = camera.position - self.target;
        let mut spherical = Spherical::from_vec3(offset);

        if self.enable_damping {
            spherical.theta += self.spherical_delta.theta * self.damping_factor;
            spherical.phi += self.spherical_delta.phi * self.damping_factor;
        } else {
            spherical.theta += self.spherical_delta.theta;
            spherical.phi += self.spherical_delta.phi;
        }

        // 限制值可能不一致或为NaN，不用clamp
        spherical.phi = spherical
            .phi
            .max(self.min_polar_angle)
            .min(self.max_polar_angle);
        spherical.make_safe();

        spherical.radius = (spherical.radius * self.scale)
            .max(self.min_distance)
            .min(self.max_distance);

        if self.enable_damping {
            self.target += self.pan_offset * self.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        camera.position = self.target + spherical.to_vec3();
        camera.look_at(self.target);

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.spherical_delta.theta *= decay;
            self.spherical_delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(previous_position) > EPS
            || camera.target.distance_squared(previous_target) > EPS
    }
}
