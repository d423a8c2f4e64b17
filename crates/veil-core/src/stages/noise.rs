//! Additive Gaussian noise.
//!
//! Always applied. A single strength scalar is drawn per image; every channel
//! of every pixel then gets an independent zero-mean Gaussian offset with
//! standard deviation `strength * 255`. The grain is invisible at the default
//! strengths but decorrelates the pixel statistics block hashes key on.

use image::DynamicImage;

use crate::config::NoiseConfig;
use crate::sampler::Sampler;

use super::StageOutcome;

/// Adds per-pixel Gaussian grain.
pub struct GaussianNoise {
    config: NoiseConfig,
}

impl GaussianNoise {
    /// Create the stage with the given settings.
    pub fn new(config: NoiseConfig) -> Self {
        Self { config }
    }

    /// Convert to an opaque 3-channel buffer and add grain to every sample.
    pub fn apply(&self, image: DynamicImage, sampler: &mut dyn Sampler) -> StageOutcome {
        let mut rgb = image.into_rgb8();
        let strength = sampler.uniform(self.config.min_strength, self.config.max_strength);
        let sigma = strength * 255.0;

        for pixel in rgb.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                let noisy = *channel as f32 + sampler.gauss(sigma);
                *channel = noisy.round().clamp(0.0, 255.0) as u8;
            }
        }

        StageOutcome::Applied(DynamicImage::ImageRgb8(rgb))
    }
}
