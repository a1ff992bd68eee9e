use std::path::PathBuf;

use crate::screenshot::SaveFormat;

// Home directory default
pub fn default_home_dir() -> PathBuf {
    // Prefer a user home directory.
    if let Ok(home_dir) = std::env::var("USERPROFILE") {
        return PathBuf::from(home_dir);
    }
    if let Ok(home_dir) = std::env::var("HOME") {
        return PathBuf::from(home_dir);
    }

    // Fallback: program directory.
    program_dir()
}

fn program_dir() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.to_path_buf();
    }

    // Last resort: cwd.
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// Model directories live next to the executable
pub fn default_ocr_models_dir() -> PathBuf {
    program_dir().join("models")
}

pub fn default_translation_models_dir() -> PathBuf {
    program_dir().join("models").join("translation")
}

// OCR language default
pub fn default_ocr_language() -> String {
    "chinese".to_string()
}

pub fn default_dictionary_path() -> Option<PathBuf> {
    None
}

// Output defaults
pub fn default_output_dir() -> PathBuf {
    default_home_dir()
}

pub fn default_save_format() -> SaveFormat {
    SaveFormat::Png
}

pub fn default_auto_copy() -> bool {
    false
}
