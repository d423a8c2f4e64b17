//! Perturbation stages and the contract they share.
//!
//! Every stage consumes one image, draws its parameters from a
//! [`Sampler`](crate::sampler::Sampler), and hands back a [`StageOutcome`].
//! The image always survives: a stage that cannot or chooses not to act
//! returns it untouched inside [`StageOutcome::Skipped`] together with the
//! reason, so the driver never loses the last good buffer and no stage uses
//! errors for control flow.
//!
//! Stages:
//! - **crop**: symmetric inward crop-shift
//! - **gradient**: banded near-gray gradient overlay
//! - **overlay**: foreign element insertion (anomaly/emoji/decorative pools)
//! - **noise**: additive Gaussian noise
//! - **jitter**: color/brightness/contrast/sharpness enhancement jitter
//! - **skew**: subtle axis-aligned shear
//! - **recompress**: lossy JPEG round trip through a transient file
//! - **strip**: pixel-only buffer rebuild discarding metadata

pub mod crop;
pub mod gradient;
pub mod jitter;
pub mod noise;
pub mod overlay;
pub mod recompress;
pub mod skew;
pub mod strip;

// Re-exports for convenient access
pub use crop::CropShift;
pub use gradient::GradientOverlay;
pub use jitter::ColorJitter;
pub use noise::GaussianNoise;
pub use overlay::ElementOverlay;
pub use recompress::Recompress;
pub use skew::Skew;
pub use strip::MetadataStrip;

use image::DynamicImage;

/// Why a stage left its input untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The stage's probability gate did not fire.
    ChanceNotMet,

    /// The drawn crop margin would produce a non-positive dimension.
    TooSmall {
        width: u32,
        height: u32,
        margin: u32,
    },

    /// The category's asset pool is empty or disabled.
    NoAssets,

    /// The lossy round trip failed; the pre-stage buffer is kept.
    ReencodeFailed(String),
}

impl SkipReason {
    /// Whether the driver should surface this skip as a warning.
    ///
    /// A missed probability gate is normal operation; everything else means
    /// the stage wanted to act and couldn't.
    pub fn is_warning(&self) -> bool {
        !matches!(self, SkipReason::ChanceNotMet)
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ChanceNotMet => write!(f, "probability gate did not fire"),
            SkipReason::TooSmall {
                width,
                height,
                margin,
            } => write!(
                f,
                "image {width}x{height} too small for a {margin}px margin"
            ),
            SkipReason::NoAssets => write!(f, "no assets available for this category"),
            SkipReason::ReencodeFailed(message) => write!(f, "re-encode round trip failed: {message}"),
        }
    }
}

/// Result of running one stage.
#[derive(Debug)]
pub enum StageOutcome {
    /// The stage transformed the image.
    Applied(DynamicImage),

    /// The stage passed the image through untouched.
    Skipped(DynamicImage, SkipReason),
}

impl StageOutcome {
    /// Unwrap the surviving image regardless of outcome.
    pub fn into_image(self) -> DynamicImage {
        match self {
            StageOutcome::Applied(image) => image,
            StageOutcome::Skipped(image, _) => image,
        }
    }

    /// Whether the stage actually transformed the image.
    pub fn is_applied(&self) -> bool {
        matches!(self, StageOutcome::Applied(_))
    }
}
