//! Color, brightness, contrast, and sharpness jitter.
//!
//! With a configured probability, applies four multiplicative enhancement
//! factors in a fixed order, each drawn as 1 +/- a small delta. Enhancement
//! follows the classic interpolation formulation: the output is a lerp
//! between a fully degenerate rendition (grayscale, black, flat gray, or
//! smoothed) and the original, with factor 1.0 as the identity. Order
//! matters: each enhancement operates on the previous one's output.

use image::{imageops, DynamicImage, Rgb, RgbImage};

use crate::config::JitterConfig;
use crate::sampler::Sampler;

use super::{SkipReason, StageOutcome};

/// Smoothing kernel used as the sharpness degenerate (center-weighted box).
const SMOOTH_KERNEL: [f32; 9] = [
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    5.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
];

/// Applies small random enhancement factors to the image.
pub struct ColorJitter {
    config: JitterConfig,
}

impl ColorJitter {
    /// Create the stage with the given settings.
    pub fn new(config: JitterConfig) -> Self {
        Self { config }
    }

    /// Jitter color, brightness, contrast, and sharpness in sequence.
    pub fn apply(&self, image: DynamicImage, sampler: &mut dyn Sampler) -> StageOutcome {
        if !sampler.chance(self.config.chance) {
            return StageOutcome::Skipped(image, SkipReason::ChanceNotMet);
        }

        let d = self.config.max_color_delta;
        let color_factor = 1.0 + sampler.uniform(-d, d);
        let brightness_factor = 1.0 + sampler.uniform(-d, d);
        let contrast_factor = 1.0 + sampler.uniform(-d, d);
        let ds = self.config.max_sharpness_delta;
        let sharpness_factor = 1.0 + sampler.uniform(-ds, ds);

        let mut rgb = image.into_rgb8();
        rgb = enhance(&desaturated(&rgb), &rgb, color_factor);
        rgb = enhance(&black_like(&rgb), &rgb, brightness_factor);
        rgb = enhance(&flat_mean_gray(&rgb), &rgb, contrast_factor);
        rgb = enhance(&imageops::filter3x3(&rgb, &SMOOTH_KERNEL), &rgb, sharpness_factor);

        StageOutcome::Applied(DynamicImage::ImageRgb8(rgb))
    }
}

/// Interpolate from `degenerate` toward (and past) `original` by `factor`.
///
/// factor 0.0 yields the degenerate image, 1.0 the original; values beyond
/// 1.0 extrapolate, clamped per sample.
fn enhance(degenerate: &RgbImage, original: &RgbImage, factor: f32) -> RgbImage {
    let (width, height) = original.dimensions();
    let mut out = RgbImage::new(width, height);
    for ((o, d), r) in original
        .as_raw()
        .iter()
        .zip(degenerate.as_raw().iter())
        .zip(out.iter_mut())
    {
        let blended = *d as f32 + (*o as f32 - *d as f32) * factor;
        *r = blended.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// ITU-R 601-2 luma of one pixel.
fn luma(pixel: &Rgb<u8>) -> f32 {
    0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32
}

/// Grayscale rendition (degenerate for the color enhancement).
fn desaturated(image: &RgbImage) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let l = luma(pixel).round().clamp(0.0, 255.0) as u8;
        *pixel = Rgb([l, l, l]);
    }
    out
}

/// All-black rendition (degenerate for the brightness enhancement).
fn black_like(image: &RgbImage) -> RgbImage {
    RgbImage::new(image.width(), image.height())
}

/// Flat image at the mean luma (degenerate for the contrast enhancement).
fn flat_mean_gray(image: &RgbImage) -> RgbImage {
    let count = (image.width() as u64 * image.height() as u64).max(1);
    let sum: f64 = image.pixels().map(|p| luma(p) as f64).sum();
    let mean = (sum / count as f64).round().clamp(0.0, 255.0) as u8;
    RgbImage::from_pixel(image.width(), image.height(), Rgb([mean, mean, mean]))
}
