//! Core data types for the veil pipeline.

use image::DynamicImage;
use std::path::{Path, PathBuf};

/// The in-memory result of pushing one input through the full stage order.
///
/// Carries the naming information the output writer needs: the original stem
/// and extension plus the final buffer, whose color mode decides the output
/// format.
#[derive(Debug)]
pub struct PerturbedImage {
    /// Source path the image was decoded from
    pub source_path: PathBuf,

    /// Original file stem
    pub file_stem: String,

    /// Original extension, lowercased; used when the result stays opaque
    pub source_extension: String,

    /// Final pixel buffer
    pub image: DynamicImage,
}

impl PerturbedImage {
    /// Build the result record for an image decoded from `path`.
    pub fn new(path: &Path, image: DynamicImage) -> Self {
        let file_stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image")
            .to_string();
        let source_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| "png".to_string());

        Self {
            source_path: path.to_path_buf(),
            file_stem,
            source_extension,
            image,
        }
    }

    /// Whether the final buffer carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_splits_stem_and_extension() {
        let result = PerturbedImage::new(
            Path::new("/photos/Vacation.JPG"),
            DynamicImage::new_rgb8(2, 2),
        );
        assert_eq!(result.file_stem, "Vacation");
        assert_eq!(result.source_extension, "jpg");
        assert!(!result.has_alpha());
    }

    #[test]
    fn test_alpha_detection() {
        let result = PerturbedImage::new(Path::new("a.png"), DynamicImage::new_rgba8(2, 2));
        assert!(result.has_alpha());
    }
}
