//! Output writing: extension selection, mode downgrade, and save.
//!
//! One output file per successfully processed input, named by prefixing the
//! original stem. Alpha-capable results go to PNG; opaque results keep the
//! original extension.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::{PipelineError, PipelineResult};
use crate::types::PerturbedImage;

/// Extensions whose encoder can carry an alpha channel.
const ALPHA_CAPABLE_EXTENSIONS: [&str; 3] = ["png", "gif", "bmp"];

/// Writes perturbed images into the output directory.
pub struct OutputWriter {
    dir: PathBuf,
    prefix: String,
}

impl OutputWriter {
    /// Create a writer targeting `dir`, prefixing every stem with `prefix`.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Ensure the output directory exists.
    pub fn prepare(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// The path a result will be written to.
    ///
    /// Alpha-capable buffers are written as PNG; opaque buffers keep the
    /// source extension.
    pub fn target_path(&self, result: &PerturbedImage) -> PathBuf {
        let extension = if result.has_alpha() {
            "png"
        } else {
            &result.source_extension
        };
        self.dir
            .join(format!("{}{}.{extension}", self.prefix, result.file_stem))
    }

    /// Encode and write one result; returns the written path.
    pub fn write(&self, result: &PerturbedImage) -> PipelineResult<PathBuf> {
        let path = self.target_path(result);

        let chosen_supports_alpha = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| ALPHA_CAPABLE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);

        let save_result = if result.has_alpha() && !chosen_supports_alpha {
            // The chosen format cannot hold alpha: flatten to opaque color
            DynamicImage::ImageRgb8(result.image.to_rgb8()).save(&path)
        } else {
            result.image.save(&path)
        };

        save_result.map_err(|e| PipelineError::Encode {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!("Saved {:?}", path);
        Ok(path)
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    fn result_with(image: DynamicImage, name: &str) -> PerturbedImage {
        PerturbedImage::new(Path::new(name), image)
    }

    #[test]
    fn test_alpha_result_targets_png() {
        let writer = OutputWriter::new("/out", "obfuscated_");
        let result = result_with(DynamicImage::new_rgba8(4, 4), "photo.jpg");
        assert_eq!(
            writer.target_path(&result),
            PathBuf::from("/out/obfuscated_photo.png")
        );
    }

    #[test]
    fn test_opaque_result_keeps_source_extension() {
        let writer = OutputWriter::new("/out", "obfuscated_");
        let result = result_with(DynamicImage::new_rgb8(4, 4), "photo.JPEG");
        assert_eq!(
            writer.target_path(&result),
            PathBuf::from("/out/obfuscated_photo.jpeg")
        );
    }

    #[test]
    fn test_write_creates_file_in_prepared_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("modified");
        let writer = OutputWriter::new(&out_dir, "obfuscated_");
        writer.prepare().unwrap();

        let result = result_with(DynamicImage::new_rgb8(10, 10), "a.png");
        let written = writer.write(&result).unwrap();
        assert!(written.exists());
        assert_eq!(written, out_dir.join("obfuscated_a.png"));

        let reread = image::open(&written).unwrap();
        assert_eq!(reread.width(), 10);
    }

    #[test]
    fn test_written_jpeg_carries_no_exif() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path(), "obfuscated_");

        let result = result_with(DynamicImage::new_rgb8(16, 16), "shot.jpg");
        let written = writer.write(&result).unwrap();

        let file = std::fs::File::open(&written).unwrap();
        let mut reader = std::io::BufReader::new(file);
        assert!(
            exif::Reader::new().read_from_container(&mut reader).is_err(),
            "output unexpectedly contains an EXIF block"
        );
    }

    #[test]
    fn test_write_fails_cleanly_without_directory() {
        let writer = OutputWriter::new("/nonexistent/dir", "obfuscated_");
        let result = result_with(DynamicImage::new_rgb8(4, 4), "a.png");
        let err = writer.write(&result).unwrap_err();
        assert!(matches!(err, PipelineError::Encode { .. }));
    }
}
