//! Sub-configuration structs, one per stage, with tuned defaults.
//!
//! Every numeric range is a closed interval: `min_*` and `max_*` fields pair
//! up, and `validate()` rejects any pair where min > max.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Supported input formats
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "gif".to_string(),
                "bmp".to_string(),
            ],
        }
    }
}

/// Inward crop-shift settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Minimum margin removed from each side, in pixels
    pub min_pixels: u32,

    /// Maximum margin removed from each side, in pixels
    pub max_pixels: u32,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            min_pixels: 5,
            max_pixels: 15,
        }
    }
}

/// Gradient overlay settings.
///
/// Opacity is re-drawn independently for every scan line along the gradient
/// axis, giving the overlay a banded texture rather than a smooth ramp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    /// Minimum per-line opacity (0.0 - 1.0)
    pub min_opacity: f32,

    /// Maximum per-line opacity (0.0 - 1.0)
    pub max_opacity: f32,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            min_opacity: 0.10,
            max_opacity: 0.25,
        }
    }
}

/// Gaussian noise settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Minimum noise strength (standard deviation = strength * 255)
    pub min_strength: f32,

    /// Maximum noise strength
    pub max_strength: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            min_strength: 0.01,
            max_strength: 0.04,
        }
    }
}

/// Color/brightness/contrast/sharpness jitter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    /// Probability that the jitter stage fires at all
    pub chance: f32,

    /// Maximum deviation from 1.0 for the color, brightness, and contrast
    /// factors
    pub max_color_delta: f32,

    /// Maximum deviation from 1.0 for the sharpness factor
    pub max_sharpness_delta: f32,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            chance: 0.6,
            max_color_delta: 0.05,
            max_sharpness_delta: 0.05,
        }
    }
}

/// Shear skew settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkewConfig {
    /// Probability that the skew stage fires
    pub chance: f32,

    /// Maximum absolute shear coefficient (axis-aligned offset per pixel)
    pub max_shear: f32,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            chance: 0.4,
            max_shear: 0.02,
        }
    }
}

/// Lossy re-encode settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecompressConfig {
    /// Probability that the re-encode stage fires
    pub chance: f32,

    /// Minimum JPEG quality for the round trip
    pub min_quality: u8,

    /// Maximum JPEG quality for the round trip
    pub max_quality: u8,
}

impl Default for RecompressConfig {
    fn default() -> Self {
        Self {
            chance: 0.7,
            min_quality: 75,
            max_quality: 85,
        }
    }
}

/// Per-category element insertion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Minimum scale factor relative to canvas width
    pub min_scale: f32,

    /// Maximum scale factor relative to canvas width
    pub max_scale: f32,

    /// Minimum opacity multiplier applied to the element's alpha channel
    pub min_opacity: f32,

    /// Maximum opacity multiplier
    pub max_opacity: f32,

    /// Probability that each drawn insertion slot is actually used
    pub insert_chance: f32,

    /// Upper bound for the per-image insertion count draw
    pub max_per_image: u32,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self::anomaly()
    }
}

impl CategoryConfig {
    /// Defaults for the anomaly pool.
    pub fn anomaly() -> Self {
        Self {
            min_scale: 0.10,
            max_scale: 0.30,
            min_opacity: 0.20,
            max_opacity: 0.40,
            insert_chance: 0.8,
            max_per_image: 3,
        }
    }

    /// Defaults for the emoji pool.
    pub fn emoji() -> Self {
        Self {
            min_scale: 0.03,
            max_scale: 0.15,
            min_opacity: 0.50,
            max_opacity: 0.90,
            insert_chance: 1.0,
            max_per_image: 3,
        }
    }

    /// Defaults for the decorative-image pool.
    pub fn decorative() -> Self {
        Self {
            min_scale: 0.15,
            max_scale: 0.70,
            min_opacity: 0.05,
            max_opacity: 0.20,
            insert_chance: 1.0,
            max_per_image: 1,
        }
    }
}

/// Element library settings: asset directories and placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementsConfig {
    /// Directory of anomaly PNG assets
    pub anomaly_dir: PathBuf,

    /// Directory of emoji PNG assets
    pub emoji_dir: PathBuf,

    /// Directory of decorative-image PNG assets
    pub decorative_dir: PathBuf,

    /// Fraction of each canvas edge excluded from element placement.
    /// 0.15 confines paste origins to the central 70% of the image.
    pub placement_margin: f32,

    /// Anomaly insertion settings
    pub anomaly: CategoryConfig,

    /// Emoji insertion settings
    pub emoji: CategoryConfig,

    /// Decorative-image insertion settings
    pub decorative: CategoryConfig,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        Self {
            anomaly_dir: PathBuf::from("anomaly_elements"),
            emoji_dir: PathBuf::from("emoji_elements"),
            decorative_dir: PathBuf::from("decorative_elements"),
            placement_margin: 0.15,
            anomaly: CategoryConfig::anomaly(),
            emoji: CategoryConfig::emoji(),
            decorative: CategoryConfig::decorative(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix added to every output file's stem
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: "obfuscated_".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
