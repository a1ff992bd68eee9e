use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use super::Settings;
use crate::error::SettingsError;
use crate::ocr::OcrConfig;
use crate::screenshot::SaveFormat;

/// Unified config manager.
pub struct ConfigManager {
    path: PathBuf,
    settings: Arc<RwLock<Settings>>,
}

impl ConfigManager {
    /// Create a new config manager (loads settings once and caches them).
    pub fn new() -> Self {
        Self::with_path(Settings::default_path())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = Settings::load_from(&path);
        Self {
            path,
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Get a snapshot copy of current settings.
    pub fn get(&self) -> Settings {
        self.settings.read().clone()
    }

    /// Reload settings from disk.
    pub fn reload(&self) {
        let new_settings = Settings::load_from(&self.path);
        *self.settings.write() = new_settings;
    }

    /// Apply `f` to the cached settings and persist the result.
    pub fn update<F>(&self, f: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.settings.write();
        f(&mut *guard);
        guard.save_to(&self.path)
    }

    // Convenience accessors.

    #[inline]
    pub fn ocr_config(&self) -> OcrConfig {
        self.settings.read().ocr_config()
    }

    #[inline]
    pub fn output_dir(&self) -> PathBuf {
        self.settings.read().output_dir.clone()
    }

    #[inline]
    pub fn save_format(&self) -> SaveFormat {
        self.settings.read().save_format
    }

    #[inline]
    pub fn auto_copy(&self) -> bool {
        self.settings.read().auto_copy
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_persists_and_reload_reads_back() {
        let dir = std::env::temp_dir().join(format!("sc_snip_manager_{}", std::process::id()));
        let path = dir.join("settings.json");
        let manager = ConfigManager::with_path(&path);
        assert!(!manager.auto_copy());

        manager
            .update(|s| {
                s.auto_copy = true;
                s.ocr_language = "english".to_string();
            })
            .unwrap();

        let other = ConfigManager::with_path(&path);
        assert!(other.auto_copy());
        assert_eq!(other.ocr_config().language, "english");

        std::fs::write(&path, r#"{"save_format":"bmp"}"#).unwrap();
        other.reload();
        assert_eq!(other.save_format(), SaveFormat::Bmp);
        assert!(!other.auto_copy());
        let _ = std::fs::remove_dir_all(dir);
    }
}
