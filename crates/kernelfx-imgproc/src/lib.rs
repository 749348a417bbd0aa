#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// stylization effects built on sliding-window filters.
pub mod effects;

/// error types shared by the filters.
pub mod error;

/// kernel convolution and order-statistic filters.
pub mod filter;

/// noise generators driven by a caller-supplied random source.
pub mod noise;

/// filter execution options.
pub mod options;

/// module containing parallization utilities.
pub mod parallel;

pub use crate::error::FilterError;
pub use crate::options::{BorderFill, FilterOptions};
