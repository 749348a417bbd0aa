/// An error type for the pixel buffer module.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    /// Error when the image has zero width or height.
    #[error("Image must have a non-zero width and height")]
    EmptyImage,

    /// Error when the row stride cannot hold a full row of pixels.
    #[error("Row stride ({0}) is smaller than width * channels ({1})")]
    InvalidStride(usize, usize),

    /// Error when the byte size of the image does not fit in memory.
    #[error("Image of {0}x{1} pixels with stride {2} exceeds the addressable size")]
    SizeOverflow(usize, usize, usize),

    /// Error when the buffer length does not match stride * height.
    #[error("Data length ({0}) does not match stride * height ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when a pixel coordinate is outside the image.
    #[error("Pixel ({0}, {1}) is out of bounds for an image of {2}x{3}")]
    PixelOutOfBounds(usize, usize, usize, usize),

    /// Error when two buffers are expected to share width, height and stride.
    #[error("Buffer shape mismatch: {0}x{1} (stride {2}) vs {3}x{4} (stride {5})")]
    ShapeMismatch(usize, usize, usize, usize, usize, usize),
}
