// 保存和导出功能
//
// Encode a cropped region and write it to a user-chosen path.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::SaveError;

/// Formats offered by the save dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl SaveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Png => "png",
            SaveFormat::Jpeg => "jpg",
            SaveFormat::Bmp => "bmp",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(SaveFormat::Png),
            "jpg" | "jpeg" => Some(SaveFormat::Jpeg),
            "bmp" => Some(SaveFormat::Bmp),
            _ => None,
        }
    }

    /// Infer the format from a file name's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            SaveFormat::Png => ImageFormat::Png,
            SaveFormat::Jpeg => ImageFormat::Jpeg,
            SaveFormat::Bmp => ImageFormat::Bmp,
        }
    }
}

impl std::str::FromStr for SaveFormat {
    type Err = SaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| SaveError::UnsupportedFormat(s.to_string()))
    }
}

/// Encode `image` in memory.
pub fn encode_image(image: &RgbaImage, format: SaveFormat) -> Result<Vec<u8>, SaveError> {
    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);
    match format {
        // JPEG 不支持 alpha 通道
        SaveFormat::Jpeg => DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .write_to(&mut cursor, format.image_format())?,
        _ => image.write_to(&mut cursor, format.image_format())?,
    }
    Ok(bytes)
}

/// Encode and write `image` to `path`. Failures are reported, never retried.
pub fn save_image(image: &RgbaImage, path: &Path, format: SaveFormat) -> Result<(), SaveError> {
    let bytes = encode_image(image, format)?;
    std::fs::write(path, bytes).map_err(|source| SaveError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("saved {}x{} snip to {}", image.width(), image.height(), path.display());
    Ok(())
}

/// `snip_<unix-millis>.<ext>`
pub fn default_file_name(format: SaveFormat) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("snip_{millis}.{}", format.extension())
}

/// Where a save request lands and in which format.
///
/// No target means the configured output directory. A directory target gets a generated
/// file name; a file target keeps its name and picks the format from its extension.
pub fn resolve_save_target(
    target: Option<&Path>,
    output_dir: &Path,
    configured: SaveFormat,
) -> (PathBuf, SaveFormat) {
    let target = target.unwrap_or(output_dir);
    if target == output_dir || target.is_dir() {
        return (target.join(default_file_name(configured)), configured);
    }
    let format = SaveFormat::from_path(target).unwrap_or(configured);
    (target.to_path_buf(), format)
}
