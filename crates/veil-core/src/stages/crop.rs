//! Symmetric inward crop-shift.
//!
//! Removing a few pixels from every side shifts the whole frame relative to
//! the original, which is enough to break crop-aligned perceptual hashes.

use image::{DynamicImage, GenericImageView};

use crate::config::CropConfig;
use crate::sampler::Sampler;

use super::{SkipReason, StageOutcome};

/// Crops a randomly drawn margin from all four sides.
pub struct CropShift {
    config: CropConfig,
}

impl CropShift {
    /// Create the stage with the given settings.
    pub fn new(config: CropConfig) -> Self {
        Self { config }
    }

    /// Draw a margin and crop it from every side.
    ///
    /// If the margin would leave a non-positive width or height the image is
    /// passed through untouched.
    pub fn apply(&self, image: DynamicImage, sampler: &mut dyn Sampler) -> StageOutcome {
        let (width, height) = image.dimensions();
        let margin = sampler.uniform_u32(self.config.min_pixels, self.config.max_pixels);

        if width <= 2 * margin || height <= 2 * margin {
            return StageOutcome::Skipped(
                image,
                SkipReason::TooSmall {
                    width,
                    height,
                    margin,
                },
            );
        }

        let cropped = image.crop_imm(margin, margin, width - 2 * margin, height - 2 * margin);
        StageOutcome::Applied(cropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_margin_config(pixels: u32) -> CropConfig {
        CropConfig {
            min_pixels: pixels,
            max_pixels: pixels,
        }
    }

    #[test]
    fn test_crop_removes_margin_from_both_sides() {
        let stage = CropShift::new(fixed_margin_config(10));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = stage.apply(DynamicImage::new_rgb8(200, 160), &mut rng);
        assert!(outcome.is_applied());
        let out = outcome.into_image();
        assert_eq!(out.dimensions(), (180, 140));
    }

    #[test]
    fn test_crop_skips_when_margin_consumes_image() {
        let stage = CropShift::new(fixed_margin_config(10));
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = stage.apply(DynamicImage::new_rgb8(20, 100), &mut rng);
        match outcome {
            StageOutcome::Skipped(image, SkipReason::TooSmall { margin, .. }) => {
                assert_eq!(margin, 10);
                assert_eq!(image.dimensions(), (20, 100));
            }
            other => panic!("expected TooSmall skip, got {other:?}"),
        }
    }

    #[test]
    fn test_crop_margin_within_configured_range() {
        let stage = CropShift::new(CropConfig {
            min_pixels: 5,
            max_pixels: 15,
        });
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..50 {
            let out = stage
                .apply(DynamicImage::new_rgb8(400, 400), &mut rng)
                .into_image();
            let removed = 400 - out.width();
            assert_eq!(removed % 2, 0);
            assert!((10..=30).contains(&removed), "removed {removed} pixels");
            assert_eq!(400 - out.height(), removed);
        }
    }
}
