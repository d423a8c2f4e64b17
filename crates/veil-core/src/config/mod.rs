//! Configuration management for veil.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. The default values reproduce the tuned perturbation intensities
//! the pipeline ships with; a config file only needs to list the values it
//! overrides.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for veil.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Processing settings
    pub processing: ProcessingConfig,

    /// Crop-shift stage settings
    pub crop: CropConfig,

    /// Gradient overlay stage settings
    pub gradient: GradientConfig,

    /// Gaussian noise stage settings
    pub noise: NoiseConfig,

    /// Color jitter stage settings
    pub jitter: JitterConfig,

    /// Skew stage settings
    pub skew: SkewConfig,

    /// Lossy re-encode stage settings
    pub recompress: RecompressConfig,

    /// Element library and insertion settings
    pub elements: ElementsConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.veil.veil/config.toml
    /// - Linux: ~/.config/veil/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\veil\config\config.toml
    ///
    /// Falls back to ~/.veil/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "veil", "veil")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".veil").join("config.toml")
            })
    }

    /// Get a resolved asset directory path (with ~ expansion).
    pub fn resolve_dir(dir: &Path) -> PathBuf {
        let path_str = dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
