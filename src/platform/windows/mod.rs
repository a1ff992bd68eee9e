//! Windows 平台特定实现
//!
//! - `resources`: GDI 句柄的 RAII 封装
//! - `system`: 虚拟屏幕信息查询

pub mod resources;
pub mod system;

pub use resources::{ManagedBitmap, ManagedDC, ScreenDc, SelectedObject};
pub use system::{VirtualScreen, get_virtual_screen};
