//! TOML-based configuration for mdxkit.
//!
//! Supports a config file (mdxkit.toml) holding decoder and output defaults.
//!
//! Example configuration:
//! ```toml
//! [decode]
//! elements_unique_names = false   # keys from bare element names
//! skip_cell_properties = true
//! top = 1000
//! coordinate_policy = "strict"    # or "lenient"
//!
//! [output]
//! pretty = true
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cellset::{CoordinatePolicy, DecodeOptions};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "MDXKIT_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Cellset decoding defaults.
    pub decode: DecodeSettings,

    /// Output formatting.
    pub output: OutputSettings,
}

/// Cellset decoding defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeSettings {
    /// Key cells by unique names (`[Dim].[Elem]`) instead of element names.
    pub elements_unique_names: bool,

    /// Store only cell values, not the full cell objects.
    pub skip_cell_properties: bool,

    /// Maximum number of cells to decode.
    pub top: Option<usize>,

    /// Handling of coordinates that match no cube dimension.
    pub coordinate_policy: CoordinatePolicy,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            elements_unique_names: true,
            skip_cell_properties: true,
            top: None,
            coordinate_policy: CoordinatePolicy::Lenient,
        }
    }
}

impl DecodeSettings {
    /// Decoder options seeded from these settings.
    pub fn to_options(&self) -> DecodeOptions {
        DecodeOptions {
            top: self.top,
            elements_unique_names: self.elements_unique_names,
            skip_cell_properties: self.skip_cell_properties,
            coordinate_policy: self.coordinate_policy,
            dimension_order: None,
        }
    }
}

/// Output formatting.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `MDXKIT_CONFIG`
    /// 2. `./mdxkit.toml`
    /// 3. `<config dir>/mdxkit/config.toml`
    ///
    /// Falls back to defaults when none exists.
    pub fn load() -> Result<Self, SettingsError> {
        match Self::locate() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading settings");
                Self::from_file(&path)
            }
            None => Ok(Settings::default()),
        }
    }

    /// The config file [`Settings::load`] would read, if any.
    ///
    /// A path in `MDXKIT_CONFIG` is returned even when it does not exist,
    /// so that loading reports it as missing.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }

        let local_config = PathBuf::from("mdxkit.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("mdxkit").join("config.toml"))
            .filter(|path| path.exists())
    }
}
