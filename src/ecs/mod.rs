//! 场景共享的ECS资源
//!
//! 每帧逻辑以bevy_ecs系统的形式运行，这里定义它们共用的时间与视口资源。

use bevy_ecs::prelude::*;

/// 帧时间
///
/// `elapsed_seconds` 是显示刷新回调传入的单调时间戳（秒）。
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    pub delta_seconds: f32,
    pub elapsed_seconds: f64,
}

impl Time {
    /// 推进到新的时间戳（秒），返回与上一帧的差值
    pub fn advance_to(&mut self, seconds: f64) -> f32 {
        self.delta_seconds = (seconds - self.elapsed_seconds).max(0.0) as f32;
        self.elapsed_seconds = seconds;
        self.delta_seconds
    }
}

/// 客户区逻辑尺寸
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_advance_reports_delta() {
        let mut time = Time::default();
        assert_eq!(time.advance_to(1.5), 1.5);
        assert_eq!(time.advance_to(2.0), 0.5);
        assert_eq!(time.elapsed_seconds, 2.0);
    }

    #[test]
    fn test_time_never_reports_negative_delta() {
        let mut time = Time::default();
        time.advance_to(3.0);
        assert_eq!(time.advance_to(2.0), 0.0);
    }
}
