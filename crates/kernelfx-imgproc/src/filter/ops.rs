use kernelfx_image::{PixelBuffer, CHANNELS};

use super::convolution::{accumulate, convolve};
use super::kernel::Kernel;
use super::kernels::{self, KernelFamily};
use super::window::{for_each_interior_row, prepare_output, saturate_u8, validate_window};
use crate::error::FilterError;
use crate::options::FilterOptions;

/// Convolve with a catalog kernel.
///
/// Smoothing and sharpening families are normalized by their weight sum;
/// Sobel families are applied raw, so negative responses clamp to 0.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `family` - The kernel family.
/// * `size` - The kernel size, 3, 5 or 7.
/// * `options` - Execution and border options.
pub fn apply_catalog_kernel(
    src: &PixelBuffer,
    family: KernelFamily,
    size: usize,
    options: &FilterOptions,
) -> Result<PixelBuffer, FilterError> {
    let kernel = kernels::catalog_kernel(family, size)?;
    convolve(src, &kernel, family.normalizes(), options)
}

/// Blur an image with a catalog Gaussian kernel.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `size` - The kernel size, 3, 5 or 7.
/// * `options` - Execution and border options.
pub fn gaussian_blur(
    src: &PixelBuffer,
    size: usize,
    options: &FilterOptions,
) -> Result<PixelBuffer, FilterError> {
    apply_catalog_kernel(src, KernelFamily::Gaussian, size, options)
}

/// Blur an image with a computed Gaussian kernel of any odd size.
///
/// Unlike [`gaussian_blur`] the weights are sampled from the continuous
/// Gaussian, so outputs differ from the catalog kernel of the same size.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `size` - The kernel size, odd.
/// * `sigma` - The standard deviation in pixels.
/// * `options` - Execution and border options.
pub fn gaussian_blur_sigma(
    src: &PixelBuffer,
    size: usize,
    sigma: f64,
    options: &FilterOptions,
) -> Result<PixelBuffer, FilterError> {
    let kernel = Kernel::gaussian(size, sigma)?;
    convolve(src, &kernel, true, options)
}

/// Blur an image with a box filter.
pub fn mean_blur(
    src: &PixelBuffer,
    size: usize,
    options: &FilterOptions,
) -> Result<PixelBuffer, FilterError> {
    apply_catalog_kernel(src, KernelFamily::Mean, size, options)
}

/// Blur an image with the center-weighted low-pass kernel.
pub fn low_pass(
    src: &PixelBuffer,
    size: usize,
    options: &FilterOptions,
) -> Result<PixelBuffer, FilterError> {
    apply_catalog_kernel(src, KernelFamily::LowPass, size, options)
}

/// Sharpen an image.
///
/// The sharpen kernels sum to one, so flat regions are preserved.
pub fn sharpen(
    src: &PixelBuffer,
    size: usize,
    options: &FilterOptions,
) -> Result<PixelBuffer, FilterError> {
    apply_catalog_kernel(src, KernelFamily::Sharpen, size, options)
}

/// Compute the Sobel gradient magnitude per channel.
///
/// Both derivative responses are accumulated unclamped for each interior
/// pixel and combined as `sqrt(gx² + gy²)`, then rounded and clamped to
/// `[0, 255]`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `size` - The Sobel kernel size, 3, 5 or 7.
/// * `options` - Execution and border options.
///
/// # Examples
///
/// ```
/// use kernelfx_image::PixelBuffer;
/// use kernelfx_imgproc::filter::sobel_magnitude;
/// use kernelfx_imgproc::FilterOptions;
///
/// let mut src = PixelBuffer::from_size_val([4, 3].into(), [0, 0, 0]).unwrap();
/// for y in 0..3 {
///     src.set_pixel(2, y, [10, 10, 10]).unwrap();
///     src.set_pixel(3, y, [10, 10, 10]).unwrap();
/// }
///
/// let edges = sobel_magnitude(&src, 3, &FilterOptions::default()).unwrap();
/// assert_eq!(edges.pixel(1, 1), Some([40, 40, 40]));
/// ```
pub fn sobel_magnitude(
    src: &PixelBuffer,
    size: usize,
    options: &FilterOptions,
) -> Result<PixelBuffer, FilterError> {
    let (kernel_x, kernel_y) = kernels::sobel_kernels(size)?;
    validate_window(src, size)?;

    let o = kernel_x.offset();
    let width = src.width();
    let stride = src.stride();
    let data = src.as_slice();

    let mut dst = prepare_output(src, o, options.border());

    for_each_interior_row("sobel_magnitude", &mut dst, o, options, |y, row| {
        for x in o..width - o {
            let gx = accumulate(data, stride, &kernel_x, x, y);
            let gy = accumulate(data, stride, &kernel_y, x, y);
            row[x * CHANNELS..(x + 1) * CHANNELS]
                .iter_mut()
                .zip(gx.iter().zip(gy.iter()))
                .for_each(|(out, (gx, gy))| *out = saturate_u8(gx.hypot(*gy)));
        }
    })?;

    Ok(dst)
}
