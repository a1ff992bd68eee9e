// 模块声明
pub mod app;
pub mod constants;
pub mod error;
pub mod ocr;
pub mod platform;
pub mod screenshot;
pub mod settings;
pub mod translation;
pub mod types;

// 重新导出主要类型
pub use app::{ActiveCapture, AppEvent, CaptureController, ResultInbox, SessionId, Snip};
pub use error::{AppError, AppResult};
pub use types::*;
