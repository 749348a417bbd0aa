use kernelfx_image::{PixelBuffer, CHANNELS};

use super::kernel::{Kernel, KernelError};
use super::window::{
    for_each_interior_row, prepare_output, reset_output, saturate_u8, validate_window,
};
use crate::error::FilterError;
use crate::options::FilterOptions;

/// Weighted sum of the kernel neighborhood around `(x, y)`, per channel.
///
/// The neighborhood must lie inside the image: `x` and `y` at least
/// `kernel.offset()` away from every edge.
#[inline]
pub(crate) fn accumulate(
    data: &[u8],
    stride: usize,
    kernel: &Kernel,
    x: usize,
    y: usize,
) -> [f64; CHANNELS] {
    let k = kernel.size();
    let o = kernel.offset();
    let mut sum = [0.0f64; CHANNELS];

    for j in 0..k {
        let start = (y + j - o) * stride + (x - o) * CHANNELS;
        let line = &data[start..start + k * CHANNELS];
        for (i, px) in line.chunks_exact(CHANNELS).enumerate() {
            let w = kernel.weight(i, j);
            sum.iter_mut()
                .zip(px)
                .for_each(|(s, &v)| *s += f64::from(v) * w);
        }
    }

    sum
}

fn validate_convolution(
    src: &PixelBuffer,
    kernel: &Kernel,
    normalize: bool,
) -> Result<f64, KernelError> {
    validate_window(src, kernel.size())?;

    if !normalize {
        return Ok(1.0);
    }

    if !kernel.is_normalizable() {
        return Err(KernelError::ZeroNormalization);
    }

    Ok(kernel.normalization_sum())
}

fn convolve_rows(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    kernel: &Kernel,
    divisor: f64,
    options: &FilterOptions,
) -> Result<(), FilterError> {
    let width = src.width();
    let stride = src.stride();
    let data = src.as_slice();
    let o = kernel.offset();

    for_each_interior_row("convolve", dst, o, options, |y, row| {
        for x in o..width - o {
            let sum = accumulate(data, stride, kernel, x, y);
            row[x * CHANNELS..(x + 1) * CHANNELS]
                .iter_mut()
                .zip(sum)
                .for_each(|(out, s)| *out = saturate_u8(s / divisor));
        }
    })
}

/// Convolve an image with a square kernel.
///
/// Every interior pixel receives, per channel, the kernel-weighted sum of its
/// `k×k` neighborhood, optionally divided by the kernel's weight sum, rounded
/// half away from zero and clamped to `[0, 255]`. Accumulation is done in
/// `f64`. Pixels closer than `kernel.offset()` to an edge are not computed;
/// their value follows `options.border()`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `kernel` - The convolution kernel.
/// * `normalize` - Divide by the kernel's weight sum.
/// * `options` - Execution and border options.
///
/// # Returns
///
/// A new image with the same size and stride as `src`.
///
/// # Errors
///
/// * [`KernelError::ZeroNormalization`] if `normalize` is set and the weights sum to zero.
/// * [`KernelError::LargerThanImage`] if the kernel does not fit in the image.
/// * [`crate::parallel::ParallelError::Cancelled`] if the pass was cancelled.
///
/// # Examples
///
/// ```
/// use kernelfx_image::PixelBuffer;
/// use kernelfx_imgproc::filter::{convolve, kernels::{catalog_kernel, KernelFamily}};
/// use kernelfx_imgproc::FilterOptions;
///
/// let src = PixelBuffer::from_size_val([5, 5].into(), [40, 80, 120]).unwrap();
/// let kernel = catalog_kernel(KernelFamily::Gaussian, 3).unwrap();
///
/// let dst = convolve(&src, &kernel, true, &FilterOptions::default()).unwrap();
/// assert_eq!(dst, src);
/// ```
pub fn convolve(
    src: &PixelBuffer,
    kernel: &Kernel,
    normalize: bool,
    options: &FilterOptions,
) -> Result<PixelBuffer, FilterError> {
    let divisor = validate_convolution(src, kernel, normalize)?;

    let mut dst = prepare_output(src, kernel.offset(), options.border());
    convolve_rows(src, &mut dst, kernel, divisor, options)?;

    Ok(dst)
}

/// Convolve an image with a square kernel into a caller-owned buffer.
///
/// Same as [`convolve`] but reuses `dst`, which must have the same size and
/// stride as `src`. `dst` is not touched when validation fails; after a
/// cancelled pass its content is unspecified.
pub fn convolve_into(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    kernel: &Kernel,
    normalize: bool,
    options: &FilterOptions,
) -> Result<(), FilterError> {
    src.check_same_shape(dst)?;
    let divisor = validate_convolution(src, kernel, normalize)?;

    reset_output(src, dst, kernel.offset(), options.border());
    convolve_rows(src, dst, kernel, divisor, options)
}
