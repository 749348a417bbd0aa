use kernelfx_image::{PixelBuffer, CHANNELS};

use super::kernel::{filter_offset, validate_window_size, KernelError};
use super::window::{for_each_interior_row, prepare_output, validate_window};
use crate::error::FilterError;
use crate::options::FilterOptions;

/// Largest supported median window side, i.e. 121 samples per channel.
pub const MAX_MEDIAN_SIZE: usize = 11;

/// The middle element of `samples` once sorted, at index `len / 2`.
///
/// Reorders `samples`. Returns `None` when `samples` is empty.
///
/// # Examples
///
/// ```
/// use kernelfx_imgproc::filter::median_of;
///
/// let mut samples = [90, 10, 50, 30, 70, 20, 80, 40, 60];
/// assert_eq!(median_of(&mut samples), Some(50));
/// ```
pub fn median_of(samples: &mut [u8]) -> Option<u8> {
    if samples.is_empty() {
        return None;
    }
    let mid = samples.len() / 2;
    let (_, median, _) = samples.select_nth_unstable(mid);
    Some(*median)
}

/// Copy one channel of the `size × size` window with top-left `(x0, y0)`.
#[inline]
fn gather_window(
    data: &[u8],
    stride: usize,
    size: usize,
    x0: usize,
    y0: usize,
    channel: usize,
    window: &mut [u8],
) {
    for (dy, window_row) in window.chunks_exact_mut(size).enumerate() {
        let start = (y0 + dy) * stride + x0 * CHANNELS;
        let line = &data[start..start + size * CHANNELS];
        window_row
            .iter_mut()
            .zip(line.chunks_exact(CHANNELS))
            .for_each(|(sample, px)| *sample = px[channel]);
    }
}

/// Blur an image with a median filter.
///
/// Each interior pixel receives, per channel, the median of its
/// `size × size` neighborhood. Every worker owns a private scratch window, so
/// rows are processed without shared state. Pixels closer than
/// `(size - 1) / 2` to an edge follow `options.border()`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `size` - The window side, odd and at most [`MAX_MEDIAN_SIZE`].
/// * `options` - Execution and border options.
///
/// # Errors
///
/// * [`KernelError::EvenSize`] or [`KernelError::Empty`] for an unusable size.
/// * [`KernelError::WindowTooLarge`] above [`MAX_MEDIAN_SIZE`].
/// * [`KernelError::LargerThanImage`] if the window does not fit in the image.
pub fn median_blur(
    src: &PixelBuffer,
    size: usize,
    options: &FilterOptions,
) -> Result<PixelBuffer, FilterError> {
    validate_window_size(size)?;
    if size > MAX_MEDIAN_SIZE {
        return Err(KernelError::WindowTooLarge(size, MAX_MEDIAN_SIZE).into());
    }
    validate_window(src, size)?;

    let o = filter_offset(size);
    let width = src.width();
    let stride = src.stride();
    let data = src.as_slice();

    let mut dst = prepare_output(src, o, options.border());

    for_each_interior_row("median_blur", &mut dst, o, options, |y, row| {
        let mut scratch = [0u8; MAX_MEDIAN_SIZE * MAX_MEDIAN_SIZE];
        let window = &mut scratch[..size * size];

        for x in o..width - o {
            for c in 0..CHANNELS {
                gather_window(data, stride, size, x - o, y - o, c, window);
                if let Some(median) = median_of(window) {
                    row[x * CHANNELS + c] = median;
                }
            }
        }
    })?;

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BorderFill;

    #[test]
    fn test_median_of() {
        let mut samples = [10, 20, 30, 40, 50, 60, 70, 80, 90];
        assert_eq!(median_of(&mut samples), Some(50));

        let mut samples = [3, 1, 2];
        assert_eq!(median_of(&mut samples), Some(2));

        assert_eq!(median_of(&mut []), None);
    }

    #[test]
    fn test_median_row_major_neighborhood() -> Result<(), FilterError> {
        let mut src = PixelBuffer::from_size_val([3, 3].into(), [0, 0, 0])?;
        for (i, v) in [10u8, 20, 30, 40, 50, 60, 70, 80, 90].into_iter().enumerate() {
            src.set_pixel(i % 3, i / 3, [v, 100 - v, v / 2])?;
        }

        let dst = median_blur(&src, 3, &FilterOptions::default())?;
        assert_eq!(dst.pixel(1, 1), Some([50, 50, 25]));
        Ok(())
    }

    #[test]
    fn test_median_removes_impulse() -> Result<(), FilterError> {
        let mut src = PixelBuffer::from_size_val([5, 5].into(), [40, 40, 40])?;
        src.set_pixel(2, 2, [255, 0, 255])?;

        let dst = median_blur(&src, 3, &FilterOptions::default())?;
        assert_eq!(dst.pixel(2, 2), Some([40, 40, 40]));
        Ok(())
    }

    #[test]
    fn test_median_border_untouched() -> Result<(), FilterError> {
        let mut src = PixelBuffer::from_size_val([5, 5].into(), [40, 40, 40])?;
        src.set_pixel(0, 0, [255, 255, 255])?;

        let dst = median_blur(&src, 3, &FilterOptions::default())?;
        assert_eq!(dst.pixel(0, 0), Some([255, 255, 255]));

        let options = FilterOptions::new().with_border(BorderFill::Zero);
        let dst = median_blur(&src, 3, &options)?;
        assert_eq!(dst.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(dst.pixel(1, 1), Some([40, 40, 40]));
        Ok(())
    }

    #[test]
    fn test_median_errors() -> Result<(), FilterError> {
        let src = PixelBuffer::from_size_val([16, 16].into(), [0, 0, 0])?;
        let options = FilterOptions::default();

        assert_eq!(
            median_blur(&src, 4, &options),
            Err(FilterError::InvalidKernel(KernelError::EvenSize(4)))
        );
        assert_eq!(
            median_blur(&src, 13, &options),
            Err(FilterError::InvalidKernel(KernelError::WindowTooLarge(13, 11)))
        );
        assert_eq!(
            median_blur(&src, 0, &options),
            Err(FilterError::InvalidKernel(KernelError::Empty))
        );

        let small = PixelBuffer::from_size_val([3, 8].into(), [0, 0, 0])?;
        assert_eq!(
            median_blur(&small, 5, &options),
            Err(FilterError::InvalidKernel(KernelError::LargerThanImage(5, 3, 8)))
        );
        Ok(())
    }
}
