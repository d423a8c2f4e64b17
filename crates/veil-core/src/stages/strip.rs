//! Metadata strip.
//!
//! Rebuilds the image by copying pixel data alone into a freshly allocated
//! buffer of the same mode and dimensions. Anything that isn't a pixel —
//! EXIF blocks, ICC profiles, text chunks — does not survive into the
//! rebuilt buffer, so the final encode writes a clean file.

use image::{DynamicImage, ImageBuffer, Pixel};

use super::StageOutcome;

/// Rebuilds the buffer from pixel data only.
pub struct MetadataStrip;

impl MetadataStrip {
    /// Create the stage.
    pub fn new() -> Self {
        Self
    }

    /// Copy pixels into a fresh buffer of the same mode.
    ///
    /// Opaque and alpha-capable 8-bit modes are preserved; anything else is
    /// normalized to an alpha-capable buffer first.
    pub fn apply(&self, image: DynamicImage) -> StageOutcome {
        let rebuilt = match image {
            DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(rebuild(&buf)),
            DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(rebuild(&buf)),
            other => DynamicImage::ImageRgba8(rebuild(&other.into_rgba8())),
        };
        StageOutcome::Applied(rebuilt)
    }
}

impl Default for MetadataStrip {
    fn default() -> Self {
        Self::new()
    }
}

/// Pixel-by-pixel copy into a new buffer.
fn rebuild<P>(src: &ImageBuffer<P, Vec<u8>>) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let (width, height) = src.dimensions();
    let mut fresh = ImageBuffer::new(width, height);
    for (x, y, pixel) in src.enumerate_pixels() {
        fresh.put_pixel(x, y, *pixel);
    }
    fresh
}
