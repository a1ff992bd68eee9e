//! System clipboard collaborator.

use std::borrow::Cow;

use image::RgbaImage;

use crate::error::ClipboardError;

/// Destination for copied snips and recognized text.
pub trait ClipboardSink {
    fn set_image(&mut self, image: &RgbaImage) -> Result<(), ClipboardError>;
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn open() -> Result<Self, ClipboardError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_image(&mut self, image: &RgbaImage) -> Result<(), ClipboardError> {
        let data = arboard::ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.as_raw()),
        };
        self.inner
            .set_image(data)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text.to_owned())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// Copy a finished snip: its text when there is any, the image otherwise.
pub fn copy_snip(
    sink: &mut dyn ClipboardSink,
    image: &RgbaImage,
    text: Option<&str>,
) -> Result<(), ClipboardError> {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => {
            log::debug!("copying {} chars of text", text.chars().count());
            sink.set_text(text)
        }
        None => {
            log::debug!("copying {}x{} image", image.width(), image.height());
            sink.set_image(image)
        }
    }
}
