//! Filter operations
//!
//! Sliding-window filters over [`kernelfx_image::PixelBuffer`]: weighted
//! convolution with square kernels, the kernel catalog, Sobel magnitude and
//! the median order-statistic filter.
//!
//! Every filter leaves a border of `(k - 1) / 2` pixels unprocessed on each
//! side; what ends up there is chosen by [`crate::BorderFill`].

/// Kernel catalog
pub mod kernels;

mod kernel;
pub use kernel::*;

/// Weighted-sum convolution engine
mod convolution;
pub use convolution::*;

/// Median filter
mod median;
pub use median::*;

/// Filters built on catalog kernels
mod ops;
pub use ops::*;

pub(crate) mod window;

pub use kernels::KernelFamily;
