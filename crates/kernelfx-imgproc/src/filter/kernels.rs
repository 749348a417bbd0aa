use std::fmt;
use std::str::FromStr;

use super::Kernel;
use crate::error::FilterError;

/// Kernel sizes available in the catalog.
pub const SUPPORTED_SIZES: [usize; 3] = [3, 5, 7];

/// A named family of catalog kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum KernelFamily {
    /// Integer approximation of a Gaussian.
    Gaussian,
    /// Box filter, every weight is 1.
    Mean,
    /// Center-weighted pyramid.
    LowPass,
    /// Negative neighbors with a center weight making the sum 1.
    Sharpen,
    /// Horizontal derivative.
    SobelX,
    /// Vertical derivative.
    SobelY,
}

impl KernelFamily {
    /// Every family in the catalog.
    pub const ALL: [KernelFamily; 6] = [
        KernelFamily::Gaussian,
        KernelFamily::Mean,
        KernelFamily::LowPass,
        KernelFamily::Sharpen,
        KernelFamily::SobelX,
        KernelFamily::SobelY,
    ];

    /// Whether the filter divides by the weight sum when using this family.
    ///
    /// Derivative kernels sum to zero and are applied raw.
    pub fn normalizes(self) -> bool {
        !matches!(self, KernelFamily::SobelX | KernelFamily::SobelY)
    }

    fn name(self) -> &'static str {
        match self {
            KernelFamily::Gaussian => "gaussian",
            KernelFamily::Mean => "mean",
            KernelFamily::LowPass => "low-pass",
            KernelFamily::Sharpen => "sharpen",
            KernelFamily::SobelX => "sobel-x",
            KernelFamily::SobelY => "sobel-y",
        }
    }
}

impl fmt::Display for KernelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelFamily {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        KernelFamily::ALL
            .into_iter()
            .find(|family| family.name() == s)
            .ok_or_else(|| FilterError::InvalidParameter(format!("unknown kernel family: {s}")))
    }
}

const GAUSSIAN_3: [[f64; 3]; 3] = [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];

const GAUSSIAN_5: [[f64; 5]; 5] = [
    [1.0, 4.0, 7.0, 4.0, 1.0],
    [4.0, 16.0, 26.0, 16.0, 4.0],
    [7.0, 26.0, 41.0, 26.0, 7.0],
    [4.0, 16.0, 26.0, 16.0, 4.0],
    [1.0, 4.0, 7.0, 4.0, 1.0],
];

const LOW_PASS_3: [[f64; 3]; 3] = [[1.0, 1.0, 1.0], [1.0, 2.0, 1.0], [1.0, 1.0, 1.0]];

const LOW_PASS_5: [[f64; 5]; 5] = [
    [1.0, 1.0, 1.0, 1.0, 1.0],
    [1.0, 2.0, 2.0, 2.0, 1.0],
    [1.0, 2.0, 3.0, 2.0, 1.0],
    [1.0, 2.0, 2.0, 2.0, 1.0],
    [1.0, 1.0, 1.0, 1.0, 1.0],
];

const LOW_PASS_7: [[f64; 7]; 7] = [
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    [1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 1.0],
    [1.0, 2.0, 3.0, 3.0, 3.0, 2.0, 1.0],
    [1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0],
    [1.0, 2.0, 3.0, 3.0, 3.0, 2.0, 1.0],
    [1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 1.0],
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
];

// binomial smoothing rows, also the smoothing factor of the sobel kernels
const BINOMIAL_3: [f64; 3] = [1.0, 2.0, 1.0];
const BINOMIAL_5: [f64; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];
const BINOMIAL_7: [f64; 7] = [1.0, 6.0, 15.0, 20.0, 15.0, 6.0, 1.0];

const DERIVATIVE_3: [f64; 3] = [-1.0, 0.0, 1.0];
const DERIVATIVE_5: [f64; 5] = [-1.0, -2.0, 0.0, 2.0, 1.0];
const DERIVATIVE_7: [f64; 7] = [-1.0, -4.0, -5.0, 0.0, 5.0, 4.0, 1.0];

/// Look up a kernel in the catalog.
///
/// # Arguments
///
/// * `family` - The kernel family.
/// * `size` - The kernel size, one of [`SUPPORTED_SIZES`].
///
/// # Errors
///
/// Returns [`FilterError::UnknownKernel`] for sizes outside the catalog.
///
/// # Examples
///
/// ```
/// use kernelfx_imgproc::filter::kernels::{catalog_kernel, KernelFamily};
///
/// let kernel = catalog_kernel(KernelFamily::Gaussian, 3).unwrap();
/// assert_eq!(kernel.normalization_sum(), 16.0);
///
/// assert!(catalog_kernel(KernelFamily::Gaussian, 9).is_err());
/// ```
pub fn catalog_kernel(family: KernelFamily, size: usize) -> Result<Kernel, FilterError> {
    if !SUPPORTED_SIZES.contains(&size) {
        return Err(FilterError::UnknownKernel { family, size });
    }

    let kernel = match (family, size) {
        (KernelFamily::Gaussian, 3) => Kernel::from_matrix(&GAUSSIAN_3)?,
        (KernelFamily::Gaussian, 5) => Kernel::from_matrix(&GAUSSIAN_5)?,
        (KernelFamily::Gaussian, _) => Kernel::from_outer(&BINOMIAL_7, &BINOMIAL_7)?,
        (KernelFamily::Mean, _) => Kernel::new(size, vec![1.0; size * size])?,
        (KernelFamily::LowPass, 3) => Kernel::from_matrix(&LOW_PASS_3)?,
        (KernelFamily::LowPass, 5) => Kernel::from_matrix(&LOW_PASS_5)?,
        (KernelFamily::LowPass, _) => Kernel::from_matrix(&LOW_PASS_7)?,
        (KernelFamily::Sharpen, _) => sharpen_kernel(size)?,
        (KernelFamily::SobelX, _) => sobel_x_kernel(size)?,
        (KernelFamily::SobelY, _) => sobel_x_kernel(size)?.transposed(),
    };

    Ok(kernel)
}

/// The horizontal and vertical Sobel kernels of the given size.
pub fn sobel_kernels(size: usize) -> Result<(Kernel, Kernel), FilterError> {
    Ok((
        catalog_kernel(KernelFamily::SobelX, size)?,
        catalog_kernel(KernelFamily::SobelY, size)?,
    ))
}

fn sharpen_kernel(size: usize) -> Result<Kernel, FilterError> {
    let mut weights = vec![-1.0; size * size];
    weights[size * size / 2] = (size * size) as f64;
    Ok(Kernel::new(size, weights)?)
}

fn sobel_x_kernel(size: usize) -> Result<Kernel, FilterError> {
    let kernel = match size {
        3 => Kernel::from_outer(&DERIVATIVE_3, &BINOMIAL_3)?,
        5 => Kernel::from_outer(&DERIVATIVE_5, &BINOMIAL_5)?,
        7 => Kernel::from_outer(&DERIVATIVE_7, &BINOMIAL_7)?,
        _ => {
            return Err(FilterError::UnknownKernel {
                family: KernelFamily::SobelX,
                size,
            })
        }
    };
    Ok(kernel)
}
