pub mod winit;

pub use self::winit::WinitWindow;

use ::winit::event::{ElementState, MouseScrollDelta, WindowEvent};

// ============================================================================
// Input Abstraction
// ============================================================================

/// 场景关心的输入事件，坐标为逻辑像素
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    // Mouse
    MouseMoved { x: f32, y: f32 },
    MouseButtonPressed { button: MouseButton },
    MouseButtonReleased { button: MouseButton },
    MouseWheel { delta_x: f32, delta_y: f32 },

    // Window
    WindowResized { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl From<::winit::event::MouseButton> for MouseButton {
    fn from(button: ::winit::event::MouseButton) -> Self {
        match button {
            ::winit::event::MouseButton::Left => MouseButton::Left,
            ::winit::event::MouseButton::Right => MouseButton::Right,
            ::winit::event::MouseButton::Middle => MouseButton::Middle,
            ::winit::event::MouseButton::Back => MouseButton::Other(8),
            ::winit::event::MouseButton::Forward => MouseButton::Other(9),
            ::winit::event::MouseButton::Other(b) => MouseButton::Other(b),
        }
    }
}

/// 像素滚动量换算为行数时使用的行高
const PIXELS_PER_LINE: f32 = 100.0;

/// 把winit窗口事件转换为场景输入事件
///
/// 物理像素按`scale_factor`换算为逻辑像素；不关心的事件返回`None`。
pub fn translate_window_event(event: &WindowEvent, scale_factor: f64) -> Option<InputEvent> {
    match event {
        WindowEvent::Resized(size) => {
            let logical = size.to_logical::<f64>(scale_factor);
            Some(InputEvent::WindowResized {
                width: logical.width.round() as u32,
                height: logical.height.round() as u32,
            })
        }
        WindowEvent::CursorMoved { position, .. } => {
            let logical = position.to_logical::<f64>(scale_factor);
            Some(InputEvent::MouseMoved {
                x: logical.x as f32,
                y: logical.y as f32,
            })
        }
        WindowEvent::MouseInput { state, button, .. } => {
            let button = MouseButton::from(*button);
            Some(match state {
                ElementState::Pressed => InputEvent::MouseButtonPressed { button },
                ElementState::Released => InputEvent::MouseButtonReleased { button },
            })
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let (delta_x, delta_y) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                MouseScrollDelta::PixelDelta(p) => {
                    (p.x as f32 / PIXELS_PER_LINE, p.y as f32 / PIXELS_PER_LINE)
                }
            };
            Some(InputEvent::MouseWheel { delta_x, delta_y })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::winit::dpi::PhysicalSize;

    #[test]
    fn test_resize_is_reported_in_logical_pixels() {
        let event = WindowEvent::Resized(PhysicalSize::new(2560, 1440));
        assert_eq!(
            translate_window_event(&event, 2.0),
            Some(InputEvent::WindowResized {
                width: 1280,
                height: 720
            })
        );
    }

    #[test]
    fn test_unrelated_events_are_ignored() {
        assert_eq!(
            translate_window_event(&WindowEvent::CloseRequested, 1.0),
            None
        );
    }

    #[test]
    fn test_mouse_button_mapping() {
        assert_eq!(
            MouseButton::from(::winit::event::MouseButton::Left),
            MouseButton::Left
        );
        assert_eq!(
            MouseButton::from(::winit::event::MouseButton::Other(5)),
            MouseButton::Other(5)
        );
    }
}
