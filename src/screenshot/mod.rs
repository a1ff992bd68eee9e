// 截图模块
//
// 负责屏幕捕获、选择区域、裁剪、保存和剪贴板

pub mod capture;
pub mod clipboard;
pub mod extract;
pub mod save;
pub mod selection;

pub use capture::{FrameGrabber, UnsupportedFrameGrabber, default_grabber};
#[cfg(target_os = "windows")]
pub use capture::GdiFrameGrabber;
pub use clipboard::{ClipboardSink, SystemClipboard, copy_snip};
pub use extract::{RegionExtractor, clamp_to_frame};
pub use save::{SaveFormat, resolve_save_target, save_image};
pub use selection::{
    Action, CaptureCompleted, CompletionReceiver, Effect, InverseMask, Phase, SelectionChanged,
    SelectionSession,
};
