//! Lossy JPEG round trip.
//!
//! With a configured probability, writes the image as a reduced-quality JPEG
//! to a transient file and reads it back, picking up the block-compression
//! artifacts a real share/re-upload pipeline would add. The transient file is
//! owned by a [`tempfile::NamedTempFile`] guard, so it is removed on every
//! exit path including encode and decode failures.

use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use crate::config::RecompressConfig;
use crate::sampler::Sampler;

use super::{SkipReason, StageOutcome};

/// Re-encodes the image at a randomly drawn JPEG quality.
pub struct Recompress {
    config: RecompressConfig,
}

impl Recompress {
    /// Create the stage with the given settings.
    pub fn new(config: RecompressConfig) -> Self {
        Self { config }
    }

    /// Run the round trip, or pass through on a missed gate or failure.
    ///
    /// A failed round trip keeps the pre-stage buffer; it never aborts the
    /// image.
    pub fn apply(&self, image: DynamicImage, sampler: &mut dyn Sampler) -> StageOutcome {
        if !sampler.chance(self.config.chance) {
            return StageOutcome::Skipped(image, SkipReason::ChanceNotMet);
        }

        let quality = sampler.uniform_u32(
            self.config.min_quality as u32,
            self.config.max_quality as u32,
        ) as u8;

        match Self::round_trip_in(&std::env::temp_dir(), &image, quality) {
            Ok(reencoded) => StageOutcome::Applied(reencoded),
            Err(e) => StageOutcome::Skipped(image, SkipReason::ReencodeFailed(e.to_string())),
        }
    }

    /// JPEG round trip through a transient file in `dir`.
    fn round_trip_in(
        dir: &Path,
        image: &DynamicImage,
        quality: u8,
    ) -> Result<DynamicImage, image::ImageError> {
        let rgb = image.to_rgb8();

        // The guard deletes the file when it drops, on success or error.
        let temp = tempfile::Builder::new()
            .prefix("veil-reencode-")
            .suffix(".jpg")
            .tempfile_in(dir)?;

        let mut writer = BufWriter::new(temp.reopen()?);
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))?;
        writer.flush()?;

        let reloaded = image::open(temp.path())?;
        Ok(DynamicImage::ImageRgb8(reloaded.into_rgb8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// A detailed pattern so lossy encoding actually changes samples.
    fn textured(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
            image::Rgb([
                ((x * 7 + y * 13) % 256) as u8,
                ((x * 31 + y * 3) % 256) as u8,
                ((x * 5 + y * 17) % 256) as u8,
            ])
        }))
    }

    fn forced(quality: u8) -> Recompress {
        Recompress::new(RecompressConfig {
            chance: 1.0,
            min_quality: quality,
            max_quality: quality,
        })
    }

    #[test]
    fn test_zero_chance_passes_through() {
        let stage = Recompress::new(RecompressConfig {
            chance: 0.0,
            ..RecompressConfig::default()
        });
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = stage.apply(textured(32, 32), &mut rng);
        assert!(matches!(
            outcome,
            StageOutcome::Skipped(_, SkipReason::ChanceNotMet)
        ));
    }

    #[test]
    fn test_round_trip_introduces_artifacts() {
        let src = textured(64, 64);
        let mut rng = StdRng::seed_from_u64(2);
        let out = forced(75).apply(src.clone(), &mut rng).into_image();

        assert_eq!(out.width(), 64);
        assert!(matches!(out, DynamicImage::ImageRgb8(_)));
        assert_ne!(
            src.into_rgb8().into_raw(),
            out.into_rgb8().into_raw(),
            "quality-75 round trip left every sample untouched"
        );
    }

    #[test]
    fn test_transient_file_removed_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let out = Recompress::round_trip_in(dir.path(), &textured(16, 16), 80).unwrap();
        assert_eq!(out.width(), 16);
        assert_eq!(
            std::fs::read_dir(dir.path()).unwrap().count(),
            0,
            "transient file leaked"
        );
    }

    #[test]
    fn test_transient_file_removed_on_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        // Zero-dimension buffers cannot be JPEG-encoded
        let degenerate = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        let result = Recompress::round_trip_in(dir.path(), &degenerate, 80);
        assert!(result.is_err());
        assert_eq!(
            std::fs::read_dir(dir.path()).unwrap().count(),
            0,
            "transient file leaked after failure"
        );
    }

    #[test]
    fn test_failure_keeps_original_buffer() {
        let degenerate = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = forced(80).apply(degenerate, &mut rng);
        match outcome {
            StageOutcome::Skipped(image, SkipReason::ReencodeFailed(_)) => {
                assert_eq!(image.width(), 0);
            }
            other => panic!("expected ReencodeFailed skip, got {other:?}"),
        }
    }
}
