//! 平台抽象层
//!
//! Only the capture path touches the OS directly; everything else is portable.

#[cfg(target_os = "windows")]
pub mod windows;
