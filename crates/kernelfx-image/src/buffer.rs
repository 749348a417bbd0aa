use crate::error::ImageError;

/// Number of interleaved 8-bit channels per pixel.
pub const CHANNELS: usize = 3;

/// Image size in pixels
///
/// # Examples
///
/// ```
/// use kernelfx_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Channel position inside an interleaved pixel.
///
/// The layout follows the byte order of 24-bit BGR bitmaps: blue first, red last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Channel 0.
    Blue = 0,
    /// Channel 1.
    Green = 1,
    /// Channel 2.
    Red = 2,
}

impl Channel {
    /// All channels in memory order.
    pub const ALL: [Channel; CHANNELS] = [Channel::Blue, Channel::Green, Channel::Red];

    /// Byte offset of the channel inside a pixel.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A row-major buffer of 3-channel, 8-bit BGR pixels.
///
/// Each row occupies `stride` bytes; only the first `width * 3` of them hold
/// pixels, the rest is alignment padding. The buffer always holds exactly
/// `stride * height` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    size: ImageSize,
    stride: usize,
    data: Vec<u8>,
}

/// Validate a buffer layout and return its length in bytes.
fn checked_len(size: ImageSize, stride: usize) -> Result<usize, ImageError> {
    if size.width == 0 || size.height == 0 {
        return Err(ImageError::EmptyImage);
    }

    let min_stride = size
        .width
        .checked_mul(CHANNELS)
        .ok_or(ImageError::SizeOverflow(size.width, size.height, stride))?;
    if stride < min_stride {
        return Err(ImageError::InvalidStride(stride, min_stride));
    }

    match stride.checked_mul(size.height) {
        Some(len) if len <= isize::MAX as usize => Ok(len),
        _ => Err(ImageError::SizeOverflow(size.width, size.height, stride)),
    }
}

/// Stride of a tightly packed row.
fn packed_stride(size: ImageSize) -> Result<usize, ImageError> {
    size.width
        .checked_mul(CHANNELS)
        .ok_or(ImageError::SizeOverflow(size.width, size.height, usize::MAX))
}

impl PixelBuffer {
    /// Create a new pixel buffer from raw bytes.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `stride` - Bytes per row, at least `size.width * 3`.
    /// * `data` - The raw bytes, `stride * size.height` long.
    ///
    /// # Errors
    ///
    /// Fails if the image is empty, the stride is too small, the byte size
    /// overflows or the data length does not match.
    ///
    /// # Examples
    ///
    /// ```
    /// use kernelfx_image::{ImageSize, PixelBuffer};
    ///
    /// let buffer = PixelBuffer::new(
    ///     ImageSize { width: 2, height: 2 },
    ///     8,
    ///     vec![0u8; 16],
    /// ).unwrap();
    ///
    /// assert_eq!(buffer.stride(), 8);
    /// assert_eq!(buffer.width(), 2);
    /// ```
    pub fn new(size: ImageSize, stride: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        let len = checked_len(size, stride)?;
        if data.len() != len {
            return Err(ImageError::InvalidDataLength(data.len(), len));
        }

        Ok(Self { size, stride, data })
    }

    /// Create a tightly packed buffer filled with one color.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `bgr` - The fill color in channel order.
    pub fn from_size_val(size: ImageSize, bgr: [u8; CHANNELS]) -> Result<Self, ImageError> {
        let stride = packed_stride(size)?;
        Self::from_size_val_with_stride(size, stride, bgr)
    }

    /// Create a buffer with an explicit stride filled with one color.
    ///
    /// Padding bytes are zeroed.
    pub fn from_size_val_with_stride(
        size: ImageSize,
        stride: usize,
        bgr: [u8; CHANNELS],
    ) -> Result<Self, ImageError> {
        let mut data = vec![0u8; checked_len(size, stride)?];
        let row_len = size.width * CHANNELS;
        for row in data.chunks_exact_mut(stride) {
            for pixel in row[..row_len].chunks_exact_mut(CHANNELS) {
                pixel.copy_from_slice(&bgr);
            }
        }
        Self::new(size, stride, data)
    }

    /// Create a packed buffer from RGB-ordered pixels, swapping to BGR.
    ///
    /// Used by adapters around RGB-native decoders.
    pub fn from_rgb_packed(size: ImageSize, rgb: &[u8]) -> Result<Self, ImageError> {
        let stride = packed_stride(size)?;
        let expected = checked_len(size, stride)?;
        if rgb.len() != expected {
            return Err(ImageError::InvalidDataLength(rgb.len(), expected));
        }

        let mut data = rgb.to_vec();
        data.chunks_exact_mut(CHANNELS).for_each(|px| px.swap(0, 2));

        Self::new(size, stride, data)
    }

    /// Copy the pixels out as tightly packed RGB, dropping row padding.
    pub fn to_rgb_packed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size.width * self.size.height * CHANNELS);
        for y in 0..self.size.height {
            for px in self.row(y).chunks_exact(CHANNELS) {
                out.extend_from_slice(&[px[2], px[1], px[0]]);
            }
        }
        out
    }

    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Bytes per row, including padding.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes per row holding pixel data.
    pub fn row_len(&self) -> usize {
        self.size.width * CHANNELS
    }

    /// The whole buffer, padding included.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The whole buffer, padding included.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return the raw bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// The pixel bytes of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.row_len()]
    }

    /// The pixel bytes of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let row_len = self.row_len();
        &mut self.data[start..start + row_len]
    }

    /// Byte offset of the first channel of pixel `(x, y)`.
    #[inline]
    pub fn offset_of(&self, x: usize, y: usize) -> usize {
        y * self.stride + x * CHANNELS
    }

    /// Get the pixel at `(x, y)` in channel order.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; CHANNELS]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = self.offset_of(x, y);
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Get a single channel value of the pixel at `(x, y)`.
    pub fn get(&self, x: usize, y: usize, channel: Channel) -> Option<u8> {
        self.pixel(x, y).map(|px| px[channel.index()])
    }

    /// Overwrite the pixel at `(x, y)`.
    pub fn set_pixel(&mut self, x: usize, y: usize, bgr: [u8; CHANNELS]) -> Result<(), ImageError> {
        if x >= self.size.width || y >= self.size.height {
            return Err(ImageError::PixelOutOfBounds(
                x,
                y,
                self.size.width,
                self.size.height,
            ));
        }
        let idx = self.offset_of(x, y);
        self.data[idx..idx + CHANNELS].copy_from_slice(&bgr);
        Ok(())
    }

    /// Whether both buffers share width, height and stride.
    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.size == other.size && self.stride == other.stride
    }

    /// Return an error unless both buffers share width, height and stride.
    pub fn check_same_shape(&self, other: &PixelBuffer) -> Result<(), ImageError> {
        if self.same_shape(other) {
            return Ok(());
        }
        Err(ImageError::ShapeMismatch(
            self.size.width,
            self.size.height,
            self.stride,
            other.size.width,
            other.size.height,
            other.stride,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{Channel, ImageSize, PixelBuffer};
    use crate::error::ImageError;

    #[test]
    fn image_size() {
        let image_size: ImageSize = [10, 20].into();
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert_eq!(
            image_size.to_string(),
            "ImageSize { width: 10, height: 20 }"
        );
    }

    #[test]
    fn buffer_smoke() -> Result<(), ImageError> {
        let buffer = PixelBuffer::new([4, 3].into(), 12, vec![0u8; 36])?;
        assert_eq!(buffer.width(), 4);
        assert_eq!(buffer.height(), 3);
        assert_eq!(buffer.stride(), 12);
        assert_eq!(buffer.row_len(), 12);
        Ok(())
    }

    #[test]
    fn buffer_rejects_overflowing_size() {
        let huge: ImageSize = [usize::MAX / 2, 1].into();
        assert_eq!(
            PixelBuffer::new(huge, 6, vec![0; 6]),
            Err(ImageError::SizeOverflow(usize::MAX / 2, 1, 6))
        );
        assert!(matches!(
            PixelBuffer::from_size_val(huge, [0, 0, 0]),
            Err(ImageError::SizeOverflow(..))
        ));
        assert!(matches!(
            PixelBuffer::from_rgb_packed(huge, &[0; 6]),
            Err(ImageError::SizeOverflow(..))
        ));

        let tall: ImageSize = [1, usize::MAX / 2].into();
        assert_eq!(
            PixelBuffer::from_size_val_with_stride(tall, 3, [1, 2, 3]),
            Err(ImageError::SizeOverflow(1, usize::MAX / 2, 3))
        );
    }

    #[test]
    fn buffer_rejects_small_stride_before_allocating() {
        assert_eq!(
            PixelBuffer::from_size_val_with_stride([4, 2].into(), 8, [0, 0, 0]),
            Err(ImageError::InvalidStride(8, 12))
        );
    }

    #[test]
    fn buffer_rejects_empty() {
        let res = PixelBuffer::new([0, 3].into(), 0, vec![]);
        assert_eq!(res, Err(ImageError::EmptyImage));
    }

    #[test]
    fn buffer_rejects_short_stride() {
        let res = PixelBuffer::new([4, 1].into(), 10, vec![0u8; 10]);
        assert_eq!(res, Err(ImageError::InvalidStride(10, 12)));
    }

    #[test]
    fn buffer_rejects_bad_length() {
        let res = PixelBuffer::new([2, 2].into(), 8, vec![0u8; 15]);
        assert_eq!(res, Err(ImageError::InvalidDataLength(15, 16)));
    }

    #[test]
    fn padded_rows() -> Result<(), ImageError> {
        let buffer = PixelBuffer::from_size_val_with_stride([2, 2].into(), 8, [1, 2, 3])?;
        assert_eq!(buffer.as_slice(), &[1, 2, 3, 1, 2, 3, 0, 0, 1, 2, 3, 1, 2, 3, 0, 0]);
        assert_eq!(buffer.row(1), &[1, 2, 3, 1, 2, 3]);
        Ok(())
    }

    #[test]
    fn pixel_access() -> Result<(), ImageError> {
        let mut buffer = PixelBuffer::from_size_val([3, 2].into(), [0, 0, 0])?;
        buffer.set_pixel(2, 1, [10, 20, 30])?;
        assert_eq!(buffer.pixel(2, 1), Some([10, 20, 30]));
        assert_eq!(buffer.get(2, 1, Channel::Red), Some(30));
        assert_eq!(buffer.get(2, 1, Channel::Blue), Some(10));
        assert_eq!(buffer.pixel(3, 0), None);
        assert_eq!(
            buffer.set_pixel(0, 2, [0, 0, 0]),
            Err(ImageError::PixelOutOfBounds(0, 2, 3, 2))
        );
        Ok(())
    }

    #[test]
    fn rgb_adapter_swaps_channels() -> Result<(), ImageError> {
        let rgb = vec![255, 128, 0, 1, 2, 3];
        let buffer = PixelBuffer::from_rgb_packed([2, 1].into(), &rgb)?;
        assert_eq!(buffer.get(0, 0, Channel::Red), Some(255));
        assert_eq!(buffer.get(0, 0, Channel::Blue), Some(0));
        assert_eq!(buffer.to_rgb_packed(), rgb);
        Ok(())
    }

    #[test]
    fn shape_check() -> Result<(), ImageError> {
        let a = PixelBuffer::from_size_val([2, 2].into(), [0, 0, 0])?;
        let b = PixelBuffer::from_size_val_with_stride([2, 2].into(), 8, [0, 0, 0])?;
        assert!(a.same_shape(&a.clone()));
        assert_eq!(
            a.check_same_shape(&b),
            Err(ImageError::ShapeMismatch(2, 2, 6, 2, 2, 8))
        );
        Ok(())
    }
}
