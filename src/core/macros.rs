//! 核心宏定义

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use bathroom_scene::impl_default;
///
/// struct Emitter {
///     count: usize,
///     size: f32,
/// }
///
/// impl_default!(Emitter {
///     count: 250,
///     size: 0.1,
/// });
///
/// assert_eq!(Emitter::default().count, 250);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
