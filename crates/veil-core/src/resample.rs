//! Inverse-mapped bilinear resampling for arbitrary-angle rotation and shear.
//!
//! The `image` crate only ships quarter-turn rotations, so the two warps the
//! pipeline needs are implemented here directly: each destination pixel is
//! mapped back into source space and sampled bilinearly. Coordinates outside
//! the source are transparent black, which composites as a no-op.

use image::{Rgba, RgbaImage};

/// Axis for a shear transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShearAxis {
    /// Rows shift horizontally proportional to their y coordinate.
    Horizontal,
    /// Columns shift vertically proportional to their x coordinate.
    Vertical,
}

/// Rotate `src` by `degrees` around its center, expanding the output canvas
/// to hold the rotated bounds.
pub fn rotate_expand(src: &RgbaImage, degrees: f32) -> RgbaImage {
    let (w, h) = src.dimensions();
    let theta = degrees.to_radians();
    let (sin, cos) = theta.sin_cos();

    let fw = w as f32;
    let fh = h as f32;
    let out_w = (fw * cos.abs() + fh * sin.abs()).ceil().max(1.0) as u32;
    let out_h = (fw * sin.abs() + fh * cos.abs()).ceil().max(1.0) as u32;

    let src_cx = fw / 2.0;
    let src_cy = fh / 2.0;
    let dst_cx = out_w as f32 / 2.0;
    let dst_cy = out_h as f32 / 2.0;

    let mut out = RgbaImage::new(out_w, out_h);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - dst_cx;
        let dy = y as f32 + 0.5 - dst_cy;
        // Inverse rotation carries destination coordinates back to source space.
        let sx = dx * cos + dy * sin + src_cx - 0.5;
        let sy = -dx * sin + dy * cos + src_cy - 0.5;
        *pixel = sample_bilinear(src, sx, sy);
    }
    out
}

/// Shear `src` along `axis` by `coefficient`, preserving canvas dimensions.
///
/// Matches affine semantics where the source coordinate is offset linearly
/// by the orthogonal coordinate: `src_x = x + k*y` for horizontal shear,
/// `src_y = y + k*x` for vertical.
pub fn shear(src: &RgbaImage, axis: ShearAxis, coefficient: f32) -> RgbaImage {
    let (w, h) = src.dimensions();
    let mut out = RgbaImage::new(w, h);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let (sx, sy) = match axis {
            ShearAxis::Horizontal => (x as f32 + coefficient * y as f32, y as f32),
            ShearAxis::Vertical => (x as f32, y as f32 + coefficient * x as f32),
        };
        *pixel = sample_bilinear(src, sx, sy);
    }
    out
}

/// Bilinear sample at fractional coordinates; out-of-bounds texels are
/// transparent black.
fn sample_bilinear(src: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let texel = |tx: i64, ty: i64| -> [f32; 4] {
        if tx < 0 || ty < 0 || tx >= src.width() as i64 || ty >= src.height() as i64 {
            [0.0; 4]
        } else {
            let p = src.get_pixel(tx as u32, ty as u32);
            [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
        }
    };

    let tl = texel(x0, y0);
    let tr = texel(x0 + 1, y0);
    let bl = texel(x0, y0 + 1);
    let br = texel(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = tl[c] + (tr[c] - tl[c]) * fx;
        let bottom = bl[c] + (br[c] - bl[c]) * fx;
        out[c] = (top + (bottom - top) * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    #[test]
    fn test_rotate_zero_is_identity_sized() {
        let src = solid(10, 6, [200, 10, 10, 255]);
        let out = rotate_expand(&src, 0.0);
        assert_eq!(out.dimensions(), (10, 6));
        assert_eq!(out.get_pixel(5, 3), &Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn test_rotate_90_swaps_dimensions() {
        let src = solid(10, 6, [0, 255, 0, 255]);
        let out = rotate_expand(&src, 90.0);
        let (w, h) = out.dimensions();
        // Allow a one-pixel slack from the ceil of the rotated bounds
        assert!((w as i64 - 6).abs() <= 1, "width {w}");
        assert!((h as i64 - 10).abs() <= 1, "height {h}");
    }

    #[test]
    fn test_rotate_45_expands_and_fills_corners_transparent() {
        let src = solid(10, 10, [255, 255, 255, 255]);
        let out = rotate_expand(&src, 45.0);
        assert!(out.width() > 10 && out.height() > 10);
        // Corners of the expanded canvas lie outside the rotated square
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        // Center is still opaque
        let (w, h) = out.dimensions();
        assert_eq!(out.get_pixel(w / 2, h / 2)[3], 255);
    }

    #[test]
    fn test_shear_zero_is_identity() {
        let mut src = solid(8, 8, [1, 2, 3, 255]);
        src.put_pixel(3, 4, Rgba([9, 9, 9, 255]));
        let out = shear(&src, ShearAxis::Horizontal, 0.0);
        assert_eq!(out, src);
    }

    #[test]
    fn test_shear_preserves_dimensions() {
        let src = solid(20, 12, [50, 60, 70, 255]);
        let out = shear(&src, ShearAxis::Vertical, 0.05);
        assert_eq!(out.dimensions(), (20, 12));
    }

    #[test]
    fn test_shear_shifts_rows() {
        // A vertical white stripe at x=10 shears left at the bottom rows
        // (src_x = x + k*y picks source pixels to the right).
        let mut src = solid(21, 21, [0, 0, 0, 255]);
        for y in 0..21 {
            src.put_pixel(10, y, Rgba([255, 255, 255, 255]));
        }
        let out = shear(&src, ShearAxis::Horizontal, 0.5);
        // Row 20 reads source at x + 10, so the stripe lands at x = 0
        assert_eq!(out.get_pixel(0, 20)[0], 255);
        assert_eq!(out.get_pixel(10, 20)[0], 0);
        // Row 0 is untouched
        assert_eq!(out.get_pixel(10, 0)[0], 255);
    }
}
