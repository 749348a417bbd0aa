use kernelfx_image::ImageError;

use crate::filter::{KernelError, KernelFamily};
use crate::parallel::ParallelError;

/// An error type for the filter operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel or window cannot be applied.
    #[error("Invalid kernel: {0}")]
    InvalidKernel(#[from] KernelError),

    /// The input buffer is unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ImageError),

    /// The catalog has no kernel for this family and size.
    #[error("No {family} kernel of size {size} in the catalog")]
    UnknownKernel {
        /// The requested kernel family.
        family: KernelFamily,
        /// The requested kernel size.
        size: usize,
    },

    /// A non-kernel filter parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The parallel execution failed or was cancelled.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
