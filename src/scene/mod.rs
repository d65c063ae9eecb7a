//! 场景
//!
//! [`SceneContext`] 持有ECS世界和每帧调度，按固定顺序推进：
//! 时间 → 水粒子 → 水滴时间 → 轨道控制。渲染在调度之外由引擎提交。

pub mod context;

pub use context::SceneContext;
