//! Stylization effects
//!
//! Oil paint is a windowed filter in the same family as the median filter;
//! the cartoon effect chains median smoothing, Sobel edges and posterization.

use kernelfx_image::{PixelBuffer, CHANNELS};

use crate::error::FilterError;
use crate::filter::{
    filter_offset, median_blur, sobel_magnitude,
    window::{for_each_interior_row, prepare_output, validate_window},
};
use crate::options::FilterOptions;
use crate::parallel;

/// Largest number of intensity levels accepted by [`oil_paint`] and [`posterize`].
pub const MAX_LEVELS: usize = 256;

fn check_levels(levels: usize, min: usize) -> Result<(), FilterError> {
    if !(min..=MAX_LEVELS).contains(&levels) {
        return Err(FilterError::InvalidParameter(format!(
            "levels must be in {min}..={MAX_LEVELS}, got {levels}"
        )));
    }
    Ok(())
}

/// Apply an oil paint effect.
///
/// The `size × size` neighborhood of each interior pixel is binned by
/// intensity `(b + g + r) / 3` into `levels` bins. The output is the mean
/// color of the most populated bin; ties go to the darker bin.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `size` - The window side, odd.
/// * `levels` - Number of intensity bins, `1..=256`.
/// * `options` - Execution and border options.
pub fn oil_paint(
    src: &PixelBuffer,
    size: usize,
    levels: usize,
    options: &FilterOptions,
) -> Result<PixelBuffer, FilterError> {
    check_levels(levels, 1)?;
    validate_window(src, size)?;

    let o = filter_offset(size);
    let width = src.width();
    let stride = src.stride();
    let data = src.as_slice();

    let mut dst = prepare_output(src, o, options.border());

    for_each_interior_row("oil_paint", &mut dst, o, options, |y, row| {
        let mut counts = vec![0u32; levels];
        let mut sums = vec![[0u32; CHANNELS]; levels];

        for x in o..width - o {
            counts.fill(0);
            sums.fill([0; CHANNELS]);

            for wy in y - o..=y + o {
                let start = wy * stride + (x - o) * CHANNELS;
                for px in data[start..start + size * CHANNELS].chunks_exact(CHANNELS) {
                    let intensity = px.iter().map(|&v| usize::from(v)).sum::<usize>() / CHANNELS;
                    let bin = intensity * levels / MAX_LEVELS;
                    counts[bin] += 1;
                    sums[bin]
                        .iter_mut()
                        .zip(px)
                        .for_each(|(s, &v)| *s += u32::from(v));
                }
            }

            let mut best = 0;
            for (bin, &count) in counts.iter().enumerate() {
                if count > counts[best] {
                    best = bin;
                }
            }

            let count = counts[best];
            row[x * CHANNELS..(x + 1) * CHANNELS]
                .iter_mut()
                .zip(sums[best])
                .for_each(|(out, sum)| *out = ((sum + count / 2) / count) as u8);
        }
    })?;

    Ok(dst)
}

/// Quantize every channel to `levels` evenly spaced values.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `levels` - Number of output values per channel, `2..=256`.
/// * `options` - Execution options; the whole image is processed.
pub fn posterize(
    src: &PixelBuffer,
    levels: usize,
    options: &FilterOptions,
) -> Result<PixelBuffer, FilterError> {
    check_levels(levels, 2)?;

    let steps = (levels - 1) as f64;
    let lut: [u8; 256] = std::array::from_fn(|v| {
        let level = (v as f64 * steps / 255.0).round();
        (level * 255.0 / steps).round() as u8
    });

    let mut dst = src.clone();
    let row_len = src.row_len();
    let (height, stride) = (src.height(), src.stride());

    parallel::for_each_row(
        options.strategy(),
        dst.as_slice_mut(),
        stride,
        0..height,
        options.cancel_token(),
        |_, row| {
            row[..row_len]
                .iter_mut()
                .for_each(|v| *v = lut[usize::from(*v)]);
        },
    )?;

    Ok(dst)
}

/// Parameters of the [`cartoon`] effect.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CartoonParams {
    /// Median window used to flatten the colors.
    pub smooth_size: usize,
    /// Sobel kernel size used to find outlines.
    pub edge_size: usize,
    /// Mean edge magnitude at or above which a pixel is drawn black.
    pub edge_threshold: u8,
    /// Number of color levels per channel.
    pub levels: usize,
}

impl Default for CartoonParams {
    fn default() -> Self {
        Self {
            smooth_size: 5,
            edge_size: 3,
            edge_threshold: 64,
            levels: 6,
        }
    }
}

/// Apply a cartoon effect.
///
/// The image is median-smoothed, its Sobel magnitude is computed on the
/// smoothed copy, and the smoothed colors are posterized. Pixels whose mean
/// edge magnitude reaches `params.edge_threshold` are painted black. Edge
/// darkening only applies where the Sobel kernel fits; the source is never
/// modified.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `params` - Effect parameters.
/// * `options` - Execution and border options, shared by every pass.
pub fn cartoon(
    src: &PixelBuffer,
    params: CartoonParams,
    options: &FilterOptions,
) -> Result<PixelBuffer, FilterError> {
    let smoothed = median_blur(src, params.smooth_size, options)?;
    let edges = sobel_magnitude(&smoothed, params.edge_size, options)?;
    let mut dst = posterize(&smoothed, params.levels, options)?;
    drop(smoothed);

    let o = filter_offset(params.edge_size);
    let width = edges.width();
    let threshold = usize::from(params.edge_threshold) * CHANNELS;

    for_each_interior_row("cartoon", &mut dst, o, options, |y, row| {
        let edge_row = edges.row(y);
        for x in o..width - o {
            let px = x * CHANNELS..(x + 1) * CHANNELS;
            let magnitude: usize = edge_row[px.clone()].iter().map(|&v| usize::from(v)).sum();
            if magnitude >= threshold {
                row[px].fill(0);
            }
        }
    })?;

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::KernelError;

    #[test]
    fn test_oil_paint_flat() -> Result<(), FilterError> {
        let src = PixelBuffer::from_size_val([7, 7].into(), [12, 34, 56])?;
        let dst = oil_paint(&src, 5, 20, &FilterOptions::default())?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn test_oil_paint_majority() -> Result<(), FilterError> {
        // 6 dark pixels against 3 bright ones in the center window
        let mut src = PixelBuffer::from_size_val([3, 3].into(), [10, 20, 30])?;
        src.set_pixel(2, 0, [250, 250, 250])?;
        src.set_pixel(2, 1, [250, 250, 250])?;
        src.set_pixel(2, 2, [250, 250, 250])?;
        src.set_pixel(0, 0, [12, 22, 32])?;

        let dst = oil_paint(&src, 3, 8, &FilterOptions::default())?;
        // (10 * 5 + 12) / 6 = 10.33, (20 * 5 + 22) / 6 = 20.33, (30 * 5 + 32) / 6 = 30.33
        assert_eq!(dst.pixel(1, 1), Some([10, 20, 30]));
        Ok(())
    }

    #[test]
    fn test_oil_paint_invalid() -> Result<(), FilterError> {
        let src = PixelBuffer::from_size_val([5, 5].into(), [0, 0, 0])?;
        let options = FilterOptions::default();
        assert!(matches!(
            oil_paint(&src, 3, 0, &options),
            Err(FilterError::InvalidParameter(_))
        ));
        assert_eq!(
            oil_paint(&src, 2, 8, &options),
            Err(FilterError::InvalidKernel(KernelError::EvenSize(2)))
        );
        Ok(())
    }

    #[test]
    fn test_posterize() -> Result<(), FilterError> {
        let src = PixelBuffer::new([2, 1].into(), 8, vec![0, 100, 200, 255, 130, 60, 7, 7])?;
        let dst = posterize(&src, 2, &FilterOptions::default())?;
        assert_eq!(dst.as_slice(), &[0, 0, 255, 255, 255, 0, 7, 7]);

        let identity = posterize(&src, 256, &FilterOptions::default())?;
        assert_eq!(identity, src);

        assert!(posterize(&src, 1, &FilterOptions::default()).is_err());
        Ok(())
    }

    #[test]
    fn test_cartoon_outlines_step() -> Result<(), FilterError> {
        let mut src = PixelBuffer::from_size_val([12, 12].into(), [200, 200, 200])?;
        for y in 0..12 {
            for x in 6..12 {
                src.set_pixel(x, y, [100, 100, 100])?;
            }
        }

        let dst = cartoon(&src, CartoonParams::default(), &FilterOptions::default())?;

        // far from the step the posterized colors survive
        assert_eq!(dst.pixel(2, 6), Some([204, 204, 204]));
        assert_eq!(dst.pixel(10, 6), Some([102, 102, 102]));
        // the step itself is outlined
        assert_eq!(dst.pixel(5, 6), Some([0, 0, 0]));
        assert_eq!(dst.pixel(6, 6), Some([0, 0, 0]));
        // the source is untouched
        assert_eq!(src.pixel(5, 6), Some([200, 200, 200]));
        Ok(())
    }
}
