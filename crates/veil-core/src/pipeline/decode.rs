//! Image decoding with content-based format detection.
//!
//! Decoding happens once, at ingestion, and returns a tagged result: the
//! caller gets either a decoded buffer or a structured error naming the file
//! and what went wrong. Format is detected from content first, falling back
//! to the extension only when the bytes are inconclusive.

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::path::Path;

use crate::error::PipelineError;

/// Result of decoding an input image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded pixel buffer
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// Decodes input files into in-memory buffers.
pub struct ImageDecoder;

impl ImageDecoder {
    /// Decode an image file, detecting the format from its content.
    pub fn decode(path: &Path) -> Result<DecodedImage, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let reader = ImageReader::open(path)
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot open file: {e}"),
            })?
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {e}"),
            })?;

        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(path).map_err(|_| PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            })?,
        };

        let image = reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image,
            format,
            width,
            height,
        })
    }
}
