//! Recognition engine boundary.
//!
//! The engine is a black box: pixels in, unordered text regions out. Model
//! discovery follows the PP-OCRv5 file layout.

use std::path::{Path, PathBuf};

use anyhow::Result;
use image::RgbaImage;

use super::types::RecognizedRegion;

/// Text detection + recognition engine.
pub trait TextRecognizer: Send + Sync {
    /// Detect and read every text region in `image`. Order is unspecified.
    fn detect(&self, image: &RgbaImage) -> Result<Vec<RecognizedRegion>>;
}

/// OCR language information.
#[derive(Debug, Clone)]
pub struct OcrLanguageInfo {
    /// Language identifier (e.g. "chinese", "english").
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Recognition model filename.
    pub rec_model: String,
    /// Charset filename.
    pub charset_file: String,
}

/// Where the engine models live and which language to load.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub models_dir: PathBuf,
    pub language: String,
}

impl OcrConfig {
    pub fn new(models_dir: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            models_dir: models_dir.into(),
            language: language.into(),
        }
    }
}

/// Detection model shared by all languages.
pub const DETECTION_MODEL: &str = "PP-OCRv5_mobile_det.mnn";

// (id, display_name, rec_model, charset)
const LANGUAGE_TABLE: [(&str, &str, &str, &str); 6] = [
    (
        "chinese",
        "简体中文",
        "PP-OCRv5_mobile_rec.mnn",
        "ppocr_keys_v5.txt",
    ),
    (
        "english",
        "English",
        "en_PP-OCRv5_mobile_rec_infer.mnn",
        "ppocr_keys_en.txt",
    ),
    (
        "korean",
        "한국어",
        "korean_PP-OCRv5_mobile_rec_infer.mnn",
        "ppocr_keys_korean.txt",
    ),
    (
        "cyrillic",
        "Кириллица",
        "cyrillic_PP-OCRv5_mobile_rec_infer.mnn",
        "ppocr_keys_cyrillic.txt",
    ),
    (
        "latin",
        "Latin",
        "latin_PP-OCRv5_mobile_rec_infer.mnn",
        "ppocr_keys_latin.txt",
    ),
    (
        "greek",
        "Ελληνικά",
        "el_PP-OCRv5_mobile_rec_infer.mnn",
        "ppocr_keys_el.txt",
    ),
];

/// Languages whose recognition model and charset are both present in `models_dir`.
pub fn get_available_languages(models_dir: &Path) -> Vec<OcrLanguageInfo> {
    LANGUAGE_TABLE
        .iter()
        .filter(|(_, _, rec_model, charset)| {
            models_dir.join(rec_model).exists() && models_dir.join(charset).exists()
        })
        .map(|(id, display_name, rec_model, charset)| OcrLanguageInfo {
            id: id.to_string(),
            display_name: display_name.to_string(),
            rec_model: rec_model.to_string(),
            charset_file: charset.to_string(),
        })
        .collect()
}

/// Detection, recognition and charset paths for `config`.
///
/// Falls back to the first available language when the configured one is missing.
pub fn get_model_paths(config: &OcrConfig) -> Result<(PathBuf, PathBuf, PathBuf)> {
    let det_path = config.models_dir.join(DETECTION_MODEL);

    let available = get_available_languages(&config.models_dir);
    let lang_info = available
        .iter()
        .find(|l| l.id == config.language)
        .or_else(|| available.first())
        .ok_or_else(|| anyhow::anyhow!("没有可用的 OCR 语言模型"))?;

    if !det_path.exists() {
        return Err(anyhow::anyhow!("检测模型不存在: {}", det_path.display()));
    }

    Ok((
        det_path,
        config.models_dir.join(&lang_info.rec_model),
        config.models_dir.join(&lang_info.charset_file),
    ))
}

/// Check whether model files exist for the given config.
pub fn models_exist(config: &OcrConfig) -> bool {
    get_model_paths(config).is_ok()
}

#[cfg(feature = "ocr-engine")]
pub use paddle::PaddleRecognizer;

#[cfg(feature = "ocr-engine")]
mod paddle {
    use anyhow::Result;
    use image::{DynamicImage, RgbaImage};
    use ocr_rs::OcrEngine;
    use parking_lot::Mutex;

    use super::{OcrConfig, TextRecognizer, get_model_paths};
    use crate::ocr::types::RecognizedRegion;

    /// PP-OCRv5 engine via `ocr-rs`.
    pub struct PaddleRecognizer {
        engine: Mutex<OcrEngine>,
    }

    impl PaddleRecognizer {
        pub fn new(config: &OcrConfig) -> Result<Self> {
            let (det_path, rec_path, charset_path) = get_model_paths(config)?;
            let engine = OcrEngine::new(&det_path, &rec_path, &charset_path, None)
                .map_err(|e| anyhow::anyhow!("创建 OCR 引擎失败: {}", e))?;
            log::info!("OCR engine loaded ({})", rec_path.display());
            Ok(Self {
                engine: Mutex::new(engine),
            })
        }
    }

    impl TextRecognizer for PaddleRecognizer {
        fn detect(&self, image: &RgbaImage) -> Result<Vec<RecognizedRegion>> {
            let img = DynamicImage::ImageRgba8(image.clone());
            let raw = self
                .engine
                .lock()
                .recognize(&img)
                .map_err(|e| anyhow::anyhow!("OCR 识别失败: {}", e))?;

            Ok(raw
                .into_iter()
                .map(|r| {
                    let rect = r.bbox.rect;
                    RecognizedRegion::from_box(
                        r.text,
                        rect.left() as f32,
                        rect.top() as f32,
                        rect.width() as f32,
                        rect.height() as f32,
                        r.confidence,
                    )
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_models_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("sc_snip_models_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn only_complete_languages_are_listed() {
        let dir = temp_models_dir("langs");
        std::fs::write(dir.join("en_PP-OCRv5_mobile_rec_infer.mnn"), b"").unwrap();
        std::fs::write(dir.join("ppocr_keys_en.txt"), b"").unwrap();
        // recognition model without its charset
        std::fs::write(dir.join("PP-OCRv5_mobile_rec.mnn"), b"").unwrap();

        let langs = get_available_languages(&dir);
        let ids: Vec<_> = langs.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["english"]);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn model_paths_fall_back_to_first_available_language() {
        let dir = temp_models_dir("paths");
        std::fs::write(dir.join(DETECTION_MODEL), b"").unwrap();
        std::fs::write(dir.join("en_PP-OCRv5_mobile_rec_infer.mnn"), b"").unwrap();
        std::fs::write(dir.join("ppocr_keys_en.txt"), b"").unwrap();

        let (_, rec, charset) = get_model_paths(&OcrConfig::new(&dir, "chinese")).unwrap();
        assert!(rec.ends_with("en_PP-OCRv5_mobile_rec_infer.mnn"));
        assert!(charset.ends_with("ppocr_keys_en.txt"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_models_are_reported() {
        let dir = temp_models_dir("missing");
        assert!(!models_exist(&OcrConfig::new(&dir, "english")));
        let _ = std::fs::remove_dir_all(dir);
    }
}
