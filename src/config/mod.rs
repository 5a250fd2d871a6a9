//! Configuration module for mdxkit.
//!
//! Handles the config file, its search locations, and decoder defaults.

mod settings;

pub use settings::{DecodeSettings, OutputSettings, Settings, SettingsError, CONFIG_ENV_VAR};
