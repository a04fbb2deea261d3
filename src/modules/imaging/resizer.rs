use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ResizeError {
    /// The bytes do not start with a signature of any known image format
    #[error("unrecognized image format")]
    UnknownFormat,

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Downscales encoded images so that neither side exceeds a bound
pub trait ImageResizer: Send + Sync {
    /// Returns the re-encoded image, in its original format, with the larger
    /// dimension capped at `max_dimension` and the aspect ratio preserved.
    fn resize(&self, data: &[u8], max_dimension: u32) -> Result<Vec<u8>, ResizeError>;
}

/// [`ImageResizer`] backed by the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct ThumbnailResizer;

impl ThumbnailResizer {
    fn fit_within(img: DynamicImage, max_dimension: u32) -> DynamicImage {
        if img.width().max(img.height()) <= max_dimension {
            return img;
        }
        img.resize(max_dimension, max_dimension, FilterType::Lanczos3)
    }
}

impl ImageResizer for ThumbnailResizer {
    fn resize(&self, data: &[u8], max_dimension: u32) -> Result<Vec<u8>, ResizeError> {
        let format = image::guess_format(data).map_err(|_| ResizeError::UnknownFormat)?;
        let img =
            image::load_from_memory_with_format(data, format).map_err(ResizeError::Decode)?;

        let (width, height) = (img.width(), img.height());
        let resized = Self::fit_within(img, max_dimension);
        debug!(
            "Resized {:?} image from {}x{} to {}x{}",
            format,
            width,
            height,
            resized.width(),
            resized.height()
        );

        let mut buffer = Cursor::new(Vec::new());
        resized
            .write_to(&mut buffer, format)
            .map_err(ResizeError::Encode)?;
        Ok(buffer.into_inner())
    }
}

/// Detects the encoded format of `data` from its signature
pub fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    image::guess_format(data).ok()
}
