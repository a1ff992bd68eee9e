use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::defaults::*;
use crate::error::SettingsError;
use crate::ocr::OcrConfig;
use crate::screenshot::SaveFormat;
use crate::translation::{Dictionary, FileModelLoader};

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // OCR
    #[serde(default = "default_ocr_models_dir")]
    pub ocr_models_dir: PathBuf,
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,

    // Translation
    /// Holds `translator.onnx`, `src_vocabulary.txt` and `tgt_vocabulary.txt`.
    #[serde(default = "default_translation_models_dir")]
    pub translation_models_dir: PathBuf,
    /// Extra `source<TAB>target` dictionary entries.
    #[serde(default = "default_dictionary_path")]
    pub dictionary_path: Option<PathBuf>,

    // Output
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_save_format")]
    pub save_format: SaveFormat,
    #[serde(default = "default_auto_copy")]
    pub auto_copy: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ocr_models_dir: default_ocr_models_dir(),
            ocr_language: default_ocr_language(),
            translation_models_dir: default_translation_models_dir(),
            dictionary_path: default_dictionary_path(),
            output_dir: default_output_dir(),
            save_format: default_save_format(),
            auto_copy: default_auto_copy(),
        }
    }
}

impl Settings {
    fn settings_dir() -> PathBuf {
        default_home_dir().join(".sc_snip")
    }

    pub fn default_path() -> PathBuf {
        Self::settings_dir().join("settings.json")
    }

    /// Load settings from `path`.
    ///
    /// A missing or unreadable file falls back to defaults, which are then persisted.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match serde_json::from_str::<Settings>(&content) {
                Ok(settings) => return settings,
                Err(e) => log::warn!("ignoring corrupt settings {}: {e}", path.display()),
            }
        }

        let default_settings = Self::default();
        if let Err(e) = default_settings.save_to(path) {
            log::warn!("failed to persist default settings: {e}");
        }
        default_settings
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn ocr_config(&self) -> OcrConfig {
        OcrConfig::new(&self.ocr_models_dir, &self.ocr_language)
    }

    pub fn model_loader(&self) -> FileModelLoader {
        FileModelLoader::new(&self.translation_models_dir)
    }

    /// Built-in table plus the configured dictionary file, if it can be read.
    pub fn dictionary(&self) -> Dictionary {
        let mut dictionary = Dictionary::builtin();
        if let Some(path) = &self.dictionary_path {
            match dictionary.extend_from_file(path) {
                Ok(added) => {
                    log::debug!("loaded {added} dictionary entries from {}", path.display())
                }
                Err(e) => log::warn!("failed to read dictionary {}: {e}", path.display()),
            }
        }
        dictionary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("sc_snip_settings_{name}_{}", std::process::id()))
            .join("settings.json")
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"ocr_language":"english","save_format":"jpeg"}"#).unwrap();
        assert_eq!(settings.ocr_language, "english");
        assert_eq!(settings.save_format, SaveFormat::Jpeg);
        assert!(!settings.auto_copy);
        assert_eq!(settings.dictionary_path, None);
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);

        let settings = Settings::load_from(&path);
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn saved_settings_load_back() {
        let path = temp_path("save");
        let settings = Settings {
            auto_copy: true,
            save_format: SaveFormat::Bmp,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn dictionary_file_extends_builtin_table() {
        let dir = std::env::temp_dir().join(format!("sc_snip_dict_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let dict_path = dir.join("extra.tsv");
        fs::write(&dict_path, "截图\tscreenshot\n").unwrap();

        let settings = Settings {
            dictionary_path: Some(dict_path),
            ..Settings::default()
        };
        let dictionary = settings.dictionary();
        assert_eq!(dictionary.entries().len(), Dictionary::builtin().entries().len() + 1);
        let _ = fs::remove_dir_all(dir);
    }
}
