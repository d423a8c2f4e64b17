//! Subtle axis-aligned shear.
//!
//! With a configured probability, shears the image along one randomly chosen
//! axis by a coefficient drawn from a symmetric range. The canvas keeps its
//! dimensions; content sliding past the edge is lost and the vacated sliver
//! fills with black (or transparency for alpha-capable buffers).

use image::DynamicImage;

use crate::config::SkewConfig;
use crate::resample::{self, ShearAxis};
use crate::sampler::Sampler;

use super::{SkipReason, StageOutcome};

/// Applies a random shear transform.
pub struct Skew {
    config: SkewConfig,
}

impl Skew {
    /// Create the stage with the given settings.
    pub fn new(config: SkewConfig) -> Self {
        Self { config }
    }

    /// Shear along a random axis, preserving the image's color mode.
    pub fn apply(&self, image: DynamicImage, sampler: &mut dyn Sampler) -> StageOutcome {
        if !sampler.chance(self.config.chance) {
            return StageOutcome::Skipped(image, SkipReason::ChanceNotMet);
        }

        let axis = if sampler.pick_index(2) == 0 {
            ShearAxis::Horizontal
        } else {
            ShearAxis::Vertical
        };
        let coefficient = sampler.uniform(-self.config.max_shear, self.config.max_shear);

        let had_alpha = image.color().has_alpha();
        let sheared = DynamicImage::ImageRgba8(resample::shear(&image.into_rgba8(), axis, coefficient));

        if had_alpha {
            StageOutcome::Applied(sheared)
        } else {
            StageOutcome::Applied(DynamicImage::ImageRgb8(sheared.into_rgb8()))
        }
    }
}
