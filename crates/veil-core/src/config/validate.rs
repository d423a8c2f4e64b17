//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::{CategoryConfig, Config};

fn check_range(name: &str, lo: f32, hi: f32) -> Result<(), ConfigError> {
    if lo > hi {
        return Err(ConfigError::ValidationError(format!(
            "{name}: min {lo} must not exceed max {hi}"
        )));
    }
    Ok(())
}

fn check_fraction(name: &str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be between 0.0 and 1.0 (got {value})"
        )));
    }
    Ok(())
}

fn check_category(name: &str, category: &CategoryConfig) -> Result<(), ConfigError> {
    check_range(&format!("{name}.scale"), category.min_scale, category.max_scale)?;
    check_range(
        &format!("{name}.opacity"),
        category.min_opacity,
        category.max_opacity,
    )?;
    check_fraction(&format!("{name}.min_scale"), category.min_scale)?;
    check_fraction(&format!("{name}.max_scale"), category.max_scale)?;
    check_fraction(&format!("{name}.min_opacity"), category.min_opacity)?;
    check_fraction(&format!("{name}.max_opacity"), category.max_opacity)?;
    check_fraction(&format!("{name}.insert_chance"), category.insert_chance)?;
    Ok(())
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.crop.min_pixels > self.crop.max_pixels {
            return Err(ConfigError::ValidationError(
                "crop.min_pixels must not exceed crop.max_pixels".into(),
            ));
        }
        check_range(
            "gradient.opacity",
            self.gradient.min_opacity,
            self.gradient.max_opacity,
        )?;
        check_fraction("gradient.min_opacity", self.gradient.min_opacity)?;
        check_fraction("gradient.max_opacity", self.gradient.max_opacity)?;

        check_range(
            "noise.strength",
            self.noise.min_strength,
            self.noise.max_strength,
        )?;
        if self.noise.min_strength < 0.0 {
            return Err(ConfigError::ValidationError(
                "noise.min_strength must not be negative".into(),
            ));
        }

        check_fraction("jitter.chance", self.jitter.chance)?;
        check_fraction("skew.chance", self.skew.chance)?;
        check_fraction("recompress.chance", self.recompress.chance)?;

        if self.recompress.min_quality == 0 || self.recompress.max_quality > 100 {
            return Err(ConfigError::ValidationError(
                "recompress quality must be between 1 and 100".into(),
            ));
        }
        if self.recompress.min_quality > self.recompress.max_quality {
            return Err(ConfigError::ValidationError(
                "recompress.min_quality must not exceed recompress.max_quality".into(),
            ));
        }

        if !(0.0..0.5).contains(&self.elements.placement_margin) {
            return Err(ConfigError::ValidationError(
                "elements.placement_margin must be in [0.0, 0.5)".into(),
            ));
        }
        check_category("elements.anomaly", &self.elements.anomaly)?;
        check_category("elements.emoji", &self.elements.emoji)?;
        check_category("elements.decorative", &self.elements.decorative)?;

        if self.output.prefix.is_empty() {
            return Err(ConfigError::ValidationError(
                "output.prefix must not be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_crop_range() {
        let mut config = Config::default();
        config.crop.min_pixels = 20;
        config.crop.max_pixels = 5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("crop.min_pixels"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_chance() {
        let mut config = Config::default();
        config.skew.chance = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("skew.chance"));
    }

    #[test]
    fn test_validate_rejects_bad_quality() {
        let mut config = Config::default();
        config.recompress.min_quality = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("quality"));

        let mut config = Config::default();
        config.recompress.min_quality = 90;
        config.recompress.max_quality = 80;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_quality"));
    }

    #[test]
    fn test_validate_rejects_wide_margin() {
        let mut config = Config::default();
        config.elements.placement_margin = 0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("placement_margin"));
    }

    #[test]
    fn test_validate_rejects_inverted_category_opacity() {
        let mut config = Config::default();
        config.elements.emoji.min_opacity = 0.9;
        config.elements.emoji.max_opacity = 0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("elements.emoji.opacity"));
    }
}
