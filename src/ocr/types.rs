//! OCR 相关类型定义

use crate::constants::OCR_NO_TEXT_PLACEHOLDER;

/// One text region reported by the recognition engine.
///
/// Geometry is in pixels of the recognized buffer; the center is the box center.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedRegion {
    pub text: String,
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    /// Rotation in degrees.
    pub angle: f32,
    pub score: f32,
}

impl RecognizedRegion {
    /// Axis-aligned region from its top-left corner and size.
    pub fn from_box(
        text: impl Into<String>,
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        score: f32,
    ) -> Self {
        Self {
            text: text.into(),
            center_x: left + width / 2.0,
            center_y: top + height / 2.0,
            width,
            height,
            angle: 0.0,
            score,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Result of a recognition call: ordered regions with their joined text, or an
/// explicit "no text" marker.
#[derive(Debug, Clone, PartialEq)]
pub enum OcrOutcome {
    Text {
        /// Regions in reading order.
        regions: Vec<RecognizedRegion>,
        /// Lines joined with `\n`, paragraphs separated by an empty line.
        text: String,
    },
    NoText,
}

impl OcrOutcome {
    pub fn has_text(&self) -> bool {
        matches!(self, OcrOutcome::Text { .. })
    }

    /// Joined text, empty for `NoText`.
    pub fn text(&self) -> &str {
        match self {
            OcrOutcome::Text { text, .. } => text,
            OcrOutcome::NoText => "",
        }
    }

    /// Text to show the user; `NoText` becomes the placeholder message.
    pub fn display_text(&self) -> &str {
        match self {
            OcrOutcome::Text { text, .. } => text,
            OcrOutcome::NoText => OCR_NO_TEXT_PLACEHOLDER,
        }
    }

    pub fn regions(&self) -> &[RecognizedRegion] {
        match self {
            OcrOutcome::Text { regions, .. } => regions,
            OcrOutcome::NoText => &[],
        }
    }
}
