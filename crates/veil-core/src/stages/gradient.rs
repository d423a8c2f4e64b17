//! Banded near-gray gradient overlay.
//!
//! Always applied. The overlay interpolates between two randomly drawn
//! near-gray colors along a random axis, but the opacity of every scan line
//! is an independent draw from the configured band instead of a smooth ramp.
//! The resulting faint banding perturbs row/column statistics far more than
//! a linear ramp would, and is kept deliberately.

use image::{imageops, DynamicImage, Rgba, RgbaImage};

use crate::config::GradientConfig;
use crate::sampler::Sampler;

use super::StageOutcome;

/// Direction of the gradient axis.
#[derive(Debug, Clone, Copy)]
enum Direction {
    Horizontal,
    Vertical,
    DiagonalDown,
    DiagonalUp,
}

const DIRECTIONS: [Direction; 4] = [
    Direction::Horizontal,
    Direction::Vertical,
    Direction::DiagonalDown,
    Direction::DiagonalUp,
];

/// Composites a randomized translucent gradient layer over the image.
pub struct GradientOverlay {
    config: GradientConfig,
}

impl GradientOverlay {
    /// Create the stage with the given settings.
    pub fn new(config: GradientConfig) -> Self {
        Self { config }
    }

    /// Build the gradient layer and alpha-composite it over the image.
    ///
    /// The result is always an alpha-capable buffer.
    pub fn apply(&self, image: DynamicImage, sampler: &mut dyn Sampler) -> StageOutcome {
        let mut canvas = image.into_rgba8();
        let (width, height) = canvas.dimensions();
        let span = width.max(height);

        let base = sampler.uniform_u32(180, 240) as i64;
        let color1 = [base, base, base];
        let lo = base.saturating_sub(30).max(0) as u32;
        let hi = (base + 30).min(255) as u32;
        let color2 = [
            sampler.uniform_u32(lo, hi) as i64,
            sampler.uniform_u32(lo, hi) as i64,
            sampler.uniform_u32(lo, hi) as i64,
        ];

        let direction = DIRECTIONS[sampler.pick_index(DIRECTIONS.len())];

        let mut layer = RgbaImage::new(width, height);
        for i in 0..span as i64 {
            // One opacity draw per scan line: this is the banding.
            let alpha =
                (sampler.uniform(self.config.min_opacity, self.config.max_opacity) * 255.0) as u8;
            let t = i as f32 / span as f32;
            let mut fill = Rgba([0, 0, 0, alpha]);
            for c in 0..3 {
                fill[c] = (color1[c] as f32 + (color2[c] - color1[c]) as f32 * t)
                    .clamp(0.0, 255.0) as u8;
            }

            let w = width as i64;
            let h = height as i64;
            match direction {
                Direction::Horizontal => {
                    if i < w {
                        draw_line(&mut layer, (i, 0), (i, h), fill);
                    }
                }
                Direction::Vertical => {
                    if i < h {
                        draw_line(&mut layer, (0, i), (w, i), fill);
                    }
                }
                Direction::DiagonalDown => {
                    if i < w {
                        draw_line(&mut layer, (i, 0), (0, i), fill);
                    }
                    if i < h {
                        draw_line(&mut layer, (w, i), (i, h), fill);
                    }
                }
                Direction::DiagonalUp => {
                    if i < w {
                        draw_line(&mut layer, (i, h), (0, h - i), fill);
                    }
                    if i < h {
                        draw_line(&mut layer, (w, h - i), (i, 0), fill);
                    }
                }
            }
        }

        imageops::overlay(&mut canvas, &layer, 0, 0);
        StageOutcome::Applied(DynamicImage::ImageRgba8(canvas))
    }
}

/// Plot a straight line segment, clipping every point to the layer bounds.
fn draw_line(layer: &mut RgbaImage, from: (i64, i64), to: (i64, i64), color: Rgba<u8>) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs());
    let (w, h) = (layer.width() as i64, layer.height() as i64);

    for s in 0..=steps {
        let t = if steps == 0 { 0.0 } else { s as f32 / steps as f32 };
        let x = (from.0 as f32 + dx as f32 * t).round() as i64;
        let y = (from.1 as f32 + dy as f32 * t).round() as i64;
        if (0..w).contains(&x) && (0..h).contains(&y) {
            layer.put_pixel(x as u32, y as u32, color);
        }
    }
}
