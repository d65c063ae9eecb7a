use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;
use winit::window::{Window as WinitWindowRaw, WindowBuilder};

use crate::config::WindowConfig;

/// 共享的winit窗口句柄
///
/// 渲染表面持有同一个`Arc`，因此表面可以是`'static`。
#[derive(Clone)]
pub struct WinitWindow {
    window: Arc<WinitWindowRaw>,
}

impl WinitWindow {
    pub fn try_new(event_loop: &EventLoop<()>, config: &WindowConfig) -> Option<Self> {
        let window = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .build(event_loop)
            .map_err(|e| tracing::error!(target: "engine", "Failed to create window: {}", e))
            .ok()?;
        Some(Self {
            window: Arc::new(window),
        })
    }

    pub fn shared(&self) -> Arc<WinitWindowRaw> {
        self.window.clone()
    }

    pub fn id(&self) -> winit::window::WindowId {
        self.window.id()
    }

    /// 客户区逻辑尺寸（对应画布的CSS尺寸）
    pub fn logical_size(&self) -> (u32, u32) {
        let logical = self
            .window
            .inner_size()
            .to_logical::<f64>(self.window.scale_factor());
        (logical.width.round() as u32, logical.height.round() as u32)
    }

    /// 设备像素比
    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
