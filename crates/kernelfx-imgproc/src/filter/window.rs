use kernelfx_image::{PixelBuffer, CHANNELS};

use super::kernel::{validate_window_size, KernelError};
use crate::error::FilterError;
use crate::options::{BorderFill, FilterOptions};
use crate::parallel::{self, ParallelError};

/// Check that a `size × size` window is odd and fits inside `src`.
pub(crate) fn validate_window(src: &PixelBuffer, size: usize) -> Result<(), KernelError> {
    validate_window_size(size)?;
    if size > src.width() || size > src.height() {
        return Err(KernelError::LargerThanImage(size, src.width(), src.height()));
    }
    Ok(())
}

/// Round half away from zero and saturate to the 8-bit range.
#[inline]
pub(crate) fn saturate_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Allocate the output of a filter pass with its border already decided.
pub(crate) fn prepare_output(src: &PixelBuffer, offset: usize, border: BorderFill) -> PixelBuffer {
    let mut dst = src.clone();
    if border == BorderFill::Zero {
        zero_border(&mut dst, offset);
    }
    dst
}

/// Reset a caller-owned output to the source with the border decided.
pub(crate) fn reset_output(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    offset: usize,
    border: BorderFill,
) {
    dst.as_slice_mut().copy_from_slice(src.as_slice());
    if border == BorderFill::Zero {
        zero_border(dst, offset);
    }
}

fn zero_border(dst: &mut PixelBuffer, offset: usize) {
    if offset == 0 {
        return;
    }

    let (width, height) = (dst.width(), dst.height());
    for y in 0..height {
        let row = dst.row_mut(y);
        if y < offset || y >= height.saturating_sub(offset) {
            row.fill(0);
        } else {
            row[..offset * CHANNELS].fill(0);
            row[(width - offset) * CHANNELS..].fill(0);
        }
    }
}

/// Run `f` on every interior row of `dst`, skipping `offset` rows at the top
/// and bottom.
///
/// The window must already be validated against the image, so the interior
/// is never empty.
pub(crate) fn for_each_interior_row<F>(
    name: &str,
    dst: &mut PixelBuffer,
    offset: usize,
    options: &FilterOptions,
    f: F,
) -> Result<(), FilterError>
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    let size = dst.size();
    let stride = dst.stride();

    log::debug!(
        "{name}: {size}, stride {stride}, border {offset}, strategy {:?}",
        options.strategy()
    );

    let rows = offset..size.height - offset;
    let res = parallel::for_each_row(
        options.strategy(),
        dst.as_slice_mut(),
        stride,
        rows,
        options.cancel_token(),
        f,
    );

    if let Err(ParallelError::Cancelled) = res {
        log::warn!("{name}: cancelled, discarding partial output");
    }

    res.map_err(FilterError::from)
}
