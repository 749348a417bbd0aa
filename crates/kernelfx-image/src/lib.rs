#![deny(missing_docs)]
//! Pixel buffer types shared by the kernelfx filters.

/// strided, interleaved BGR pixel buffers.
pub mod buffer;

/// Error types for the image module.
pub mod error;

pub use crate::buffer::{Channel, ImageSize, PixelBuffer, CHANNELS};
pub use crate::error::ImageError;
