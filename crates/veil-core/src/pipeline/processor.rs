//! Pipeline orchestration - fixed stage order with per-image isolation.
//!
//! The stage order is part of the contract and is not reorderable:
//! crop-shift → gradient → anomaly → emoji → decorative → noise → jitter →
//! skew → re-encode → metadata strip. Each stage hands the driver a
//! [`StageOutcome`]; skips are logged and the last good buffer flows on, so
//! only decode failures (or a bug) can abandon an image.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::config::Config;
use crate::elements::{CategoryToggles, ElementCategory, ElementLibrary, ElementPool};
use crate::error::PipelineResult;
use crate::sampler::Sampler;
use crate::stages::{
    ColorJitter, CropShift, ElementOverlay, GaussianNoise, GradientOverlay, MetadataStrip,
    Recompress, Skew, StageOutcome,
};
use crate::types::PerturbedImage;

use super::decode::ImageDecoder;
use super::discovery::FileDiscovery;

/// The main driver that runs every stage over one image at a time.
pub struct Obfuscator {
    crop: CropShift,
    gradient: GradientOverlay,
    anomaly: ElementOverlay,
    emoji: ElementOverlay,
    decorative: ElementOverlay,
    noise: GaussianNoise,
    jitter: ColorJitter,
    skew: Skew,
    recompress: Recompress,
    strip: MetadataStrip,
    discovery: FileDiscovery,
    library: ElementLibrary,
}

impl Obfuscator {
    /// Create a driver from configuration and a pre-scanned element library.
    pub fn new(config: &Config, library: ElementLibrary) -> Self {
        let margin = config.elements.placement_margin;
        Self {
            crop: CropShift::new(config.crop.clone()),
            gradient: GradientOverlay::new(config.gradient.clone()),
            anomaly: ElementOverlay::new(
                ElementCategory::Anomaly,
                config.elements.anomaly.clone(),
                margin,
            ),
            emoji: ElementOverlay::new(
                ElementCategory::Emoji,
                config.elements.emoji.clone(),
                margin,
            ),
            decorative: ElementOverlay::new(
                ElementCategory::Decorative,
                config.elements.decorative.clone(),
                margin,
            ),
            noise: GaussianNoise::new(config.noise.clone()),
            jitter: ColorJitter::new(config.jitter.clone()),
            skew: Skew::new(config.skew.clone()),
            recompress: Recompress::new(config.recompress.clone()),
            strip: MetadataStrip::new(),
            discovery: FileDiscovery::new(config.processing.clone()),
            library,
        }
    }

    /// Create a driver, scanning the element directories named in `config`.
    pub fn from_config(config: &Config, toggles: &CategoryToggles) -> Self {
        let library = ElementLibrary::scan(&config.elements, toggles);
        Self::new(config, library)
    }

    /// Run one image through the full stage order.
    pub fn process(
        &self,
        path: &Path,
        sampler: &mut dyn Sampler,
    ) -> PipelineResult<PerturbedImage> {
        tracing::debug!("Processing {:?}", path);
        let decoded = ImageDecoder::decode(path)?;
        tracing::trace!("  decoded {}x{}", decoded.width, decoded.height);
        let mut image = decoded.image;

        image = log_outcome("crop-shift", self.crop.apply(image, sampler));
        image = log_outcome("gradient", self.gradient.apply(image, sampler));
        image = self.insert_category(image, &self.anomaly, &self.library.anomaly, sampler);
        image = self.insert_category(image, &self.emoji, &self.library.emoji, sampler);
        image = self.insert_category(image, &self.decorative, &self.library.decorative, sampler);
        image = log_outcome("noise", self.noise.apply(image, sampler));
        image = log_outcome("jitter", self.jitter.apply(image, sampler));
        image = log_outcome("skew", self.skew.apply(image, sampler));
        image = log_outcome("re-encode", self.recompress.apply(image, sampler));
        let image = self.strip.apply(image).into_image();

        Ok(PerturbedImage::new(path, image))
    }

    /// Run one overlay stage, bypassing categories with nothing to insert.
    ///
    /// Empty pools were already reported once at scan time; re-warning per
    /// image would drown the log.
    fn insert_category(
        &self,
        image: DynamicImage,
        stage: &ElementOverlay,
        pool: &ElementPool,
        sampler: &mut dyn Sampler,
    ) -> DynamicImage {
        if pool.is_empty() {
            return image;
        }
        log_outcome(stage.category().label(), stage.apply(image, pool, sampler))
    }

    /// Discover all processable image files at a path.
    pub fn discover(&self, path: &Path) -> Vec<PathBuf> {
        self.discovery.discover(path)
    }

    /// The element library the driver inserts from.
    pub fn library(&self) -> &ElementLibrary {
        &self.library
    }
}

/// Log a stage outcome and hand back the surviving image.
fn log_outcome(stage: &str, outcome: StageOutcome) -> DynamicImage {
    match outcome {
        StageOutcome::Applied(image) => {
            tracing::trace!("  {stage}: applied");
            image
        }
        StageOutcome::Skipped(image, reason) => {
            if reason.is_warning() {
                tracing::warn!("  {stage} skipped: {reason}");
            } else {
                tracing::debug!("  {stage} skipped: {reason}");
            }
            image
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    /// Config with every optional stage forced on and no element assets.
    fn forced_config() -> Config {
        let mut config = Config::default();
        config.jitter.chance = 1.0;
        config.skew.chance = 1.0;
        config.recompress.chance = 1.0;
        config.elements.anomaly_dir = PathBuf::from("/nonexistent/anomaly");
        config.elements.emoji_dir = PathBuf::from("/nonexistent/emoji");
        config.elements.decorative_dir = PathBuf::from("/nonexistent/decorative");
        config
    }

    fn write_input(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
        .save(&path)
        .unwrap();
        path
    }

    #[test]
    fn test_process_crops_within_configured_range() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "in.png", 200, 200);

        let config = forced_config();
        let driver = Obfuscator::from_config(&config, &CategoryToggles::default());
        let mut rng = StdRng::seed_from_u64(1);

        let result = driver.process(&input, &mut rng).unwrap();
        let removed = 200 - result.image.width();
        assert!(
            (10..=30).contains(&removed),
            "crop removed {removed} pixels total"
        );
        assert_eq!(200 - result.image.height(), removed);
    }

    #[test]
    fn test_process_missing_element_dirs_still_completes() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "in.png", 120, 90);

        let driver = Obfuscator::from_config(
            &forced_config(),
            &CategoryToggles {
                emoji: true,
                decorative: true,
            },
        );
        let mut rng = StdRng::seed_from_u64(2);

        let result = driver.process(&input, &mut rng).unwrap();
        // All pools empty: pipeline still runs every remaining stage
        assert!(result.image.width() < 120);
    }

    #[test]
    fn test_process_is_deterministic_per_seed() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "in.png", 100, 100);

        let driver = Obfuscator::from_config(&forced_config(), &CategoryToggles::default());

        let a = driver
            .process(&input, &mut StdRng::seed_from_u64(33))
            .unwrap();
        let b = driver
            .process(&input, &mut StdRng::seed_from_u64(33))
            .unwrap();
        assert_eq!(
            a.image.clone().into_rgb8().into_raw(),
            b.image.clone().into_rgb8().into_raw()
        );

        let c = driver
            .process(&input, &mut StdRng::seed_from_u64(34))
            .unwrap();
        assert_ne!(
            a.image.into_rgb8().into_raw(),
            c.image.into_rgb8().into_raw(),
            "different seeds produced identical output"
        );
    }

    #[test]
    fn test_process_diverges_perceptual_hash() {
        use image_hasher::{HashAlg, HasherConfig};
        use rand::RngCore;

        // Dense random texture: block averages sit so close together that a
        // 5-15px crop-shift re-randomizes the hash's comparison grid.
        let mut texture_rng = StdRng::seed_from_u64(99);
        let mut raw = vec![0u8; 256 * 256 * 3];
        texture_rng.fill_bytes(&mut raw);
        let textured = RgbImage::from_raw(256, 256, raw).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        textured.save(&input).unwrap();

        let driver = Obfuscator::from_config(&forced_config(), &CategoryToggles::default());
        let mut rng = StdRng::seed_from_u64(7);
        let result = driver.process(&input, &mut rng).unwrap();

        let hasher = HasherConfig::new()
            .hash_alg(HashAlg::Gradient)
            .hash_size(16, 16)
            .to_hasher();
        let original = image::open(&input).unwrap();
        let before = hasher.hash_image(&original);
        let after = hasher.hash_image(&result.image);
        assert!(
            before.dist(&after) > 0,
            "pipeline output hashed identically to the input"
        );
    }

    #[test]
    fn test_process_unreadable_input_fails_that_image_only() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("broken.png");
        std::fs::write(&bogus, b"nope").unwrap();

        let driver = Obfuscator::from_config(&forced_config(), &CategoryToggles::default());
        let mut rng = StdRng::seed_from_u64(4);
        assert!(driver.process(&bogus, &mut rng).is_err());

        // The driver is still usable for the next image
        let good = write_input(dir.path(), "good.png", 80, 80);
        assert!(driver.process(&good, &mut rng).is_ok());
    }

    #[test]
    fn test_end_to_end_forced_crop_writes_prefixed_output() {
        use crate::output::OutputWriter;

        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "holiday.png", 200, 200);

        let mut config = forced_config();
        config.crop.min_pixels = 10;
        config.crop.max_pixels = 10;
        config.jitter.chance = 0.0;
        config.skew.chance = 0.0;
        config.recompress.chance = 0.0;

        let driver = Obfuscator::from_config(&config, &CategoryToggles::default());
        let mut rng = StdRng::seed_from_u64(12);
        let result = driver.process(&input, &mut rng).unwrap();

        // 200x200 minus a 10px margin on every side
        assert_eq!(result.image.width(), 180);
        assert_eq!(result.image.height(), 180);
        // Noise leaves an opaque 3-channel buffer
        assert!(!result.has_alpha());

        let out_dir = dir.path().join("out");
        let writer = OutputWriter::new(&out_dir, &config.output.prefix);
        writer.prepare().unwrap();
        let written = writer.write(&result).unwrap();
        assert_eq!(written, out_dir.join("obfuscated_holiday.png"));

        let reread = image::open(&written).unwrap();
        assert_eq!(reread.width(), 180);

        // The rebuilt buffer encodes with no auxiliary metadata block
        let file = std::fs::File::open(&written).unwrap();
        let mut reader = std::io::BufReader::new(file);
        assert!(exif::Reader::new().read_from_container(&mut reader).is_err());
    }

    #[test]
    fn test_tiny_image_survives_with_crop_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "tiny.png", 8, 8);

        let mut config = forced_config();
        // Margin can only exceed what an 8x8 image can give up
        config.crop.min_pixels = 10;
        config.crop.max_pixels = 10;
        config.skew.chance = 0.0;
        config.recompress.chance = 0.0;

        let driver = Obfuscator::from_config(&config, &CategoryToggles::default());
        let mut rng = StdRng::seed_from_u64(5);
        let result = driver.process(&input, &mut rng).unwrap();
        assert_eq!(result.image.width(), 8);
        assert_eq!(result.image.height(), 8);
    }
}
