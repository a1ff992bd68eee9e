//! OCR 模块
//!
//! - `engine` - 识别引擎边界与模型发现
//! - `layout` - 阅读顺序与段落拼接
//! - `pipeline` - 后台识别流程
//! - `types` - OCR 相关类型定义

pub mod engine;
pub mod layout;
pub mod pipeline;
pub mod types;

#[cfg(feature = "ocr-engine")]
pub use engine::PaddleRecognizer;
pub use engine::{
    OcrConfig, OcrLanguageInfo, TextRecognizer, get_available_languages, models_exist,
};
pub use pipeline::RecognitionPipeline;
pub use types::{OcrOutcome, RecognizedRegion};
