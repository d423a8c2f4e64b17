//! Veil Core - batch image perturbation library.
//!
//! Veil takes raster images and rewrites them so each output looks
//! near-identical to its input while diverging in pixel statistics, geometry,
//! and metadata — enough to break reverse-image-search and perceptual-hash
//! matching. It deliberately does not target learned embedding models.
//!
//! # Architecture
//!
//! A single synchronous pipeline of independent stages in a fixed order:
//!
//! ```text
//! Decode → Crop-shift → Gradient → Elements (anomaly/emoji/decorative)
//!        → Noise → Jitter → Skew → Lossy re-encode → Metadata strip → Save
//! ```
//!
//! Every stochastic decision draws from a caller-supplied
//! [`Sampler`](sampler::Sampler), so a seeded run is fully reproducible.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rand::SeedableRng;
//! use veil_core::{CategoryToggles, Config, Obfuscator, OutputWriter};
//!
//! fn run() -> veil_core::Result<()> {
//!     let config = Config::load()?;
//!     let driver = Obfuscator::from_config(&config, &CategoryToggles::default());
//!     let writer = OutputWriter::new("modified_images", &config.output.prefix);
//!     writer.prepare()?;
//!
//!     let mut rng = rand::thread_rng();
//!     for path in driver.discover("original_images".as_ref()) {
//!         let result = driver.process(&path, &mut rng)?;
//!         writer.write(&result)?;
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod elements;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod resample;
pub mod sampler;
pub mod stages;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use elements::{CategoryToggles, ElementCategory, ElementLibrary, ElementPool};
pub use error::{ConfigError, PipelineError, PipelineResult, Result, VeilError};
pub use output::OutputWriter;
pub use pipeline::{DecodedImage, FileDiscovery, ImageDecoder, Obfuscator};
pub use sampler::Sampler;
pub use stages::{SkipReason, StageOutcome};
pub use types::PerturbedImage;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
