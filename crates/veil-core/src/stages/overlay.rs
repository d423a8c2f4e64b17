//! Foreign element insertion.
//!
//! Composites a handful of small scaled/rotated/faded PNG elements from one
//! category pool onto the canvas. Every failure path for a single element
//! degrades to "skip this element, keep processing" — an unreadable asset or
//! a degenerate size never takes the whole image down.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::config::CategoryConfig;
use crate::elements::{ElementCategory, ElementPool};
use crate::resample;
use crate::sampler::Sampler;

use super::{SkipReason, StageOutcome};

/// Inserts a random number of elements from one category pool.
pub struct ElementOverlay {
    category: ElementCategory,
    config: CategoryConfig,
    placement_margin: f32,
}

impl ElementOverlay {
    /// Create the stage for one category.
    pub fn new(category: ElementCategory, config: CategoryConfig, placement_margin: f32) -> Self {
        Self {
            category,
            config,
            placement_margin,
        }
    }

    /// The category this stage inserts from.
    pub fn category(&self) -> ElementCategory {
        self.category
    }

    /// Draw an insertion count and composite that many elements.
    pub fn apply(
        &self,
        image: DynamicImage,
        pool: &ElementPool,
        sampler: &mut dyn Sampler,
    ) -> StageOutcome {
        if pool.is_empty() {
            return StageOutcome::Skipped(image, SkipReason::NoAssets);
        }

        let mut canvas = image.into_rgba8();
        let slots = sampler.uniform_u32(0, self.config.max_per_image);
        let mut inserted = 0u32;

        for _ in 0..slots {
            if !sampler.chance(self.config.insert_chance) {
                continue;
            }
            let path = &pool.paths()[sampler.pick_index(pool.len())];
            if self.insert(&mut canvas, path, sampler) {
                inserted += 1;
            }
        }

        tracing::debug!(
            "Inserted {} {} element(s) of {} slot(s)",
            inserted,
            self.category.label(),
            slots
        );
        StageOutcome::Applied(DynamicImage::ImageRgba8(canvas))
    }

    /// Composite one element; returns whether it landed on the canvas.
    fn insert(&self, canvas: &mut RgbaImage, path: &Path, sampler: &mut dyn Sampler) -> bool {
        let element = match image::open(path) {
            Ok(img) => img.into_rgba8(),
            Err(e) => {
                tracing::warn!("Element {:?} could not be read: {e}; skipping insertion", path);
                return false;
            }
        };

        let (orig_w, orig_h) = element.dimensions();
        if orig_w == 0 {
            tracing::warn!("Element {:?} has zero width; skipping insertion", path);
            return false;
        }

        let (canvas_w, canvas_h) = canvas.dimensions();
        let factor = sampler.uniform(self.config.min_scale, self.config.max_scale);
        let new_w = (canvas_w as f32 * factor) as u32;
        let new_h = (orig_h as f32 * (new_w as f32 / orig_w as f32)) as u32;
        if new_w == 0 || new_h == 0 {
            tracing::warn!(
                "Element {:?} became too small after scaling; skipping insertion",
                path
            );
            return false;
        }

        let resized = imageops::resize(&element, new_w, new_h, FilterType::Lanczos3);
        let angle = sampler.uniform(-180.0, 180.0);
        let mut rotated = resample::rotate_expand(&resized, angle);

        // Uniform attenuation of the element's own alpha channel
        let opacity = sampler.uniform(self.config.min_opacity, self.config.max_opacity);
        for pixel in rotated.pixels_mut() {
            pixel[3] = (pixel[3] as f32 * opacity) as u8;
        }

        let (x, y) = self.draw_origin(canvas_w, canvas_h, rotated.dimensions(), sampler);
        imageops::overlay(canvas, &rotated, x as i64, y as i64);
        true
    }

    /// Draw a paste origin confined to the central placement region.
    ///
    /// An element larger than the region on an axis collapses that axis's
    /// valid range to the region's minimum corner.
    fn draw_origin(
        &self,
        canvas_w: u32,
        canvas_h: u32,
        (elem_w, elem_h): (u32, u32),
        sampler: &mut dyn Sampler,
    ) -> (u32, u32) {
        let min_x = (canvas_w as f32 * self.placement_margin) as i64;
        let mut max_x = (canvas_w as f32 * (1.0 - self.placement_margin)) as i64 - elem_w as i64;
        if max_x < min_x {
            max_x = min_x;
        }

        let min_y = (canvas_h as f32 * self.placement_margin) as i64;
        let mut max_y = (canvas_h as f32 * (1.0 - self.placement_margin)) as i64 - elem_h as i64;
        if max_y < min_y {
            max_y = min_y;
        }

        (
            sampler.uniform_u32(min_x as u32, max_x as u32),
            sampler.uniform_u32(min_y as u32, max_y as u32),
        )
    }
}
