use thiserror::Error;

/// Errors raised when a kernel or window cannot be built or applied.
#[derive(Error, Debug, PartialEq)]
pub enum KernelError {
    /// The kernel has no weights.
    #[error("kernel size must be > 0")]
    Empty,

    /// Windows must have an odd size so they have a center pixel.
    #[error("kernel size must be odd, got {0}")]
    EvenSize(usize),

    /// The number of weights does not match size * size.
    #[error("kernel has {0} weights, expected {1}")]
    WeightCount(usize, usize),

    /// A weight is NaN or infinite.
    #[error("kernel weights must be finite")]
    NonFinite,

    /// Normalization was requested but the weights sum to zero.
    #[error("kernel weights sum to zero and cannot normalize")]
    ZeroNormalization,

    /// The Gaussian standard deviation is not a positive number.
    #[error("gaussian sigma must be finite and > 0, got {0}")]
    InvalidSigma(f64),

    /// The window does not fit inside the image.
    #[error("kernel size {0} exceeds the image size {1}x{2}")]
    LargerThanImage(usize, usize, usize),

    /// The window exceeds the largest supported order-statistic window.
    #[error("window size {0} exceeds the maximum supported size {1}")]
    WindowTooLarge(usize, usize),
}

/// Width of the border left unprocessed by a `size × size` window.
#[inline]
pub fn filter_offset(size: usize) -> usize {
    size.saturating_sub(1) / 2
}

/// Check that `size` is a usable odd window size.
pub fn validate_window_size(size: usize) -> Result<(), KernelError> {
    if size == 0 {
        return Err(KernelError::Empty);
    }
    if size % 2 == 0 {
        return Err(KernelError::EvenSize(size));
    }
    Ok(())
}

/// A square, odd-sized matrix of convolution weights.
///
/// `weight(i, j)` multiplies the source pixel `i - offset` columns right and
/// `j - offset` rows below the output pixel, so the first index runs along x.
/// The flat weights are stored as `weights[i * size + j]`. A kernel cannot be
/// modified once built.
///
/// # Examples
///
/// ```
/// use kernelfx_imgproc::filter::Kernel;
///
/// let kernel = Kernel::from_matrix(&[[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]]).unwrap();
///
/// assert_eq!(kernel.size(), 3);
/// assert_eq!(kernel.offset(), 1);
/// assert_eq!(kernel.normalization_sum(), 16.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Box<[f64]>,
    sum: f64,
}

impl Kernel {
    /// Create a kernel from flat weights laid out as `weights[i * size + j]`.
    ///
    /// # Arguments
    ///
    /// * `size` - The side length, odd and non-zero.
    /// * `weights` - `size * size` finite weights.
    pub fn new(size: usize, weights: Vec<f64>) -> Result<Self, KernelError> {
        validate_window_size(size)?;

        if weights.len() != size * size {
            return Err(KernelError::WeightCount(weights.len(), size * size));
        }

        if weights.iter().any(|w| !w.is_finite()) {
            return Err(KernelError::NonFinite);
        }

        let sum: f64 = weights.iter().sum();

        Ok(Self {
            size,
            weights: weights.into_boxed_slice(),
            sum,
        })
    }

    /// Create a kernel from a literal square matrix indexed `matrix[i][j]`.
    pub fn from_matrix<const N: usize>(matrix: &[[f64; N]; N]) -> Result<Self, KernelError> {
        Self::new(N, matrix.iter().flatten().copied().collect())
    }

    /// Create a separable kernel with `weight(i, j) = along_x[i] * along_y[j]`.
    ///
    /// # Arguments
    ///
    /// * `along_x` - The horizontal factor, indexed by the column offset.
    /// * `along_y` - The vertical factor, indexed by the row offset.
    pub fn from_outer(along_x: &[f64], along_y: &[f64]) -> Result<Self, KernelError> {
        if along_x.len() != along_y.len() {
            return Err(KernelError::WeightCount(
                along_x.len() * along_y.len(),
                along_x.len() * along_x.len(),
            ));
        }

        let weights = along_x
            .iter()
            .flat_map(|&a| along_y.iter().map(move |&b| a * b))
            .collect();

        Self::new(along_x.len(), weights)
    }

    /// Create a normalized Gaussian kernel of arbitrary odd size.
    ///
    /// The weights are real-valued samples of the Gaussian, so results differ
    /// slightly from the integer catalog kernels of the same size.
    ///
    /// # Arguments
    ///
    /// * `size` - The side length, odd and non-zero.
    /// * `sigma` - The standard deviation in pixels, > 0.
    pub fn gaussian(size: usize, sigma: f64) -> Result<Self, KernelError> {
        validate_window_size(size)?;

        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(KernelError::InvalidSigma(sigma));
        }

        let mean = (size - 1) as f64 / 2.0;
        let sigma_sq = sigma * sigma;

        let mut kernel_1d = (0..size)
            .map(|i| {
                let x = i as f64 - mean;
                (-(x * x) / (2.0 * sigma_sq)).exp()
            })
            .collect::<Vec<_>>();

        // normalize the kernel
        let norm = kernel_1d.iter().sum::<f64>();
        kernel_1d.iter_mut().for_each(|k| *k /= norm);

        Self::from_outer(&kernel_1d, &kernel_1d)
    }

    /// The kernel with rows and columns swapped.
    pub fn transposed(&self) -> Self {
        let n = self.size;
        let weights = (0..n)
            .flat_map(|row| (0..n).map(move |col| (col, row)))
            .map(|(r, c)| self.weights[r * n + c])
            .collect::<Vec<_>>();

        Self {
            size: n,
            weights: weights.into_boxed_slice(),
            sum: self.sum,
        }
    }

    /// The side length of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Width of the border this kernel leaves unprocessed.
    pub fn offset(&self) -> usize {
        filter_offset(self.size)
    }

    /// All weights, `i * size + j` for column offset `i` and row offset `j`.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The weight applied at column offset `i` and row offset `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below `size()`.
    #[inline]
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[i * self.size + j]
    }

    /// Sum of all weights, the divisor used when normalizing.
    pub fn normalization_sum(&self) -> f64 {
        self.sum
    }

    /// Whether the weights can be normalized by their sum.
    pub fn is_normalizable(&self) -> bool {
        self.sum.abs() > f64::EPSILON
    }
}

/// A user-supplied kernel description, e.g. loaded from a config file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KernelSpec {
    /// The side length of the kernel.
    pub size: usize,
    /// Weights laid out as `weights[i * size + j]`, `i` along x.
    pub weights: Vec<f64>,
    /// Whether to divide by the weight sum. Defaults to true.
    #[cfg_attr(feature = "serde", serde(default = "default_normalize"))]
    pub normalize: bool,
}

#[cfg(feature = "serde")]
fn default_normalize() -> bool {
    true
}

impl TryFrom<KernelSpec> for Kernel {
    type Error = KernelError;

    fn try_from(spec: KernelSpec) -> Result<Self, Self::Error> {
        Kernel::new(spec.size, spec.weights)
    }
}
