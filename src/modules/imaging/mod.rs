//! Image downscaling for uploaded category images
//!
//! The service depends on the [`ImageResizer`] trait so the codec can be
//! swapped in tests or replaced with an external processor.

mod resizer;

pub use resizer::{detect_format, ImageResizer, ResizeError, ThumbnailResizer};

#[cfg(test)]
pub(crate) use resizer::tests::png_bytes;
