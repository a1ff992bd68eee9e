//! Settings module
//!
//! This module provides application settings management including:
//! - Core settings data structure and persistence
//! - Default value functions for serde
//! - A cached config manager

mod defaults;
mod manager;
#[allow(clippy::module_inception)]
mod settings;

pub use manager::ConfigManager;
pub use settings::Settings;
