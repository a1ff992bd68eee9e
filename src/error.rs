// Unified Error Handling Module
//
// One error type per failure kind, aggregated into `AppError` for the binary.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Selection aborted")]
    Aborted(#[from] SelectionAborted),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("OCR error: {0}")]
    Recognition(#[from] RecognitionError),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the error should be shown to the user. Aborted selections are silent.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, AppError::Aborted(_))
    }
}

/// Screen capture errors. No partial frame is kept when one of these is returned.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to acquire screen device context")]
    DeviceContext,

    #[error("failed to create compatible {0}")]
    CompatibleResource(&'static str),

    #[error("block transfer failed: {0}")]
    BlockTransfer(String),

    #[error("failed to read back pixel data")]
    PixelReadback,

    #[error("invalid screen dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("screen capture is not supported on this platform")]
    Unsupported,
}

/// The selection ended without a usable rectangle (Escape, or too small).
///
/// Never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionAborted {
    #[error("selection cancelled")]
    Cancelled,

    #[error("selection {width}x{height} is below the minimum size")]
    TooSmall { width: i32, height: i32 },
}

/// Cropping produced an empty area. Reported the same way as a capture failure.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(
        "clamped crop area is empty (requested {x},{y} {width}x{height} \
         in {frame_width}x{frame_height})"
    )]
    EmptyArea {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        frame_width: u32,
        frame_height: u32,
    },
}

/// Recognition errors carry the engine's original cause.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("text recognition failed: {0}")]
    Engine(#[source] anyhow::Error),

    #[error("recognition engine not available: {0}")]
    EngineUnavailable(String),

    #[error("recognition worker failed: {0}")]
    Worker(String),

    #[error("recognition cancelled")]
    Cancelled,
}

/// Translation model failures. Handled inside the translation service; callers of
/// `translate_async` never see these.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation model file not found: {0}")]
    ModelMissing(PathBuf),

    #[error("failed to read vocabulary {path}: {source}")]
    Vocabulary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("translation model is not available in this build")]
    BackendUnavailable,

    #[error("inference failed: {0}")]
    Inference(#[source] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("image encoding failed: {0}")]
    Encoding(#[from] image::ImageError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write failed: {0}")]
    Write(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write settings: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
