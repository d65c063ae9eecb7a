//! 与GPU无关的尺寸和颜色换算

/// 渲染目标尺寸（物理像素）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSize {
    pub width: u32,
    pub height: u32,
    /// 实际采用的像素比，已按上限截断
    pub pixel_ratio: f64,
}

impl RenderSize {
    /// 逻辑尺寸乘以`min(device_pixel_ratio, max_pixel_ratio)`
    pub fn from_window(
        logical_width: f64,
        logical_height: f64,
        device_pixel_ratio: f64,
        max_pixel_ratio: f64,
    ) -> Self {
        let pixel_ratio = device_pixel_ratio.min(max_pixel_ratio).max(0.0);
        Self {
            width: (logical_width * pixel_ratio).round().max(0.0) as u32,
            height: (logical_height * pixel_ratio).round().max(0.0) as u32,
            pixel_ratio,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

fn srgb_channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// `0xRRGGBB`形式的sRGB颜色转换为线性RGB
pub fn srgb_hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_channel_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

/// 点精灵在裁剪空间的半宽高系数（乘以w之前）
///
/// 与透视深度成反比的点大小：屏幕高度方向上`size`个世界单位对应裁剪空间的`size`，
/// 水平方向再除以宽高比。
pub fn point_scale(size: f32, aspect: f32) -> [f32; 2] {
    let aspect = if aspect > 0.0 { aspect } else { 1.0 };
    [size / aspect, size]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_is_capped() {
        let size = RenderSize::from_window(800.0, 600.0, 3.0, 2.0);
        assert_eq!((size.width, size.height), (1600, 1200));
        assert_eq!(size.pixel_ratio, 2.0);

        let size = RenderSize::from_window(800.0, 600.0, 1.5, 2.0);
        assert_eq!((size.width, size.height), (1200, 900));
    }

    #[test]
    fn test_zero_size_is_empty() {
        assert!(RenderSize::from_window(0.0, 600.0, 1.0, 2.0).is_empty());
        assert!(!RenderSize::from_window(1.0, 1.0, 1.0, 2.0).is_empty());
    }

    #[test]
    fn test_srgb_hex_to_linear() {
        assert_eq!(srgb_hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        assert_eq!(srgb_hex_to_linear(0xffffff), [1.0, 1.0, 1.0]);

        let [r, g, b] = srgb_hex_to_linear(0xE9F1FF);
        assert!((r - 0.814_847).abs() < 1e-4);
        assert!((g - 0.879_622).abs() < 1e-4);
        assert_eq!(b, 1.0);
        assert!(r < g && g < b);
    }

    #[test]
    fn test_point_scale_divides_by_aspect() {
        assert_eq!(point_scale(0.1, 2.0), [0.05, 0.1]);
        assert_eq!(point_scale(0.1, 0.0), [0.1, 0.1]);
    }
}
