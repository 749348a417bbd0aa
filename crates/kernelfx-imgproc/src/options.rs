use crate::parallel::{CancelToken, ExecutionStrategy};

/// What a filter leaves in the border it does not process.
///
/// The border is `(k - 1) / 2` pixels wide on every side for a `k×k` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderFill {
    /// Keep the source pixels untouched.
    #[default]
    Source,

    /// Fill the border with black.
    Zero,
}

/// Options shared by every sliding-window filter.
///
/// # Examples
///
/// ```
/// use kernelfx_imgproc::{BorderFill, FilterOptions};
/// use kernelfx_imgproc::parallel::ExecutionStrategy;
///
/// let options = FilterOptions::new()
///     .with_strategy(ExecutionStrategy::Serial)
///     .with_border(BorderFill::Zero);
///
/// assert_eq!(options.strategy(), ExecutionStrategy::Serial);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    strategy: ExecutionStrategy,
    border: BorderFill,
    cancel: Option<CancelToken>,
}

impl FilterOptions {
    /// Parallel rows, source border, no cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the border fill policy.
    pub fn with_border(mut self, border: BorderFill) -> Self {
        self.border = border;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The execution strategy.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// The border fill policy.
    pub fn border(&self) -> BorderFill {
        self.border
    }

    /// The cancellation token, if any.
    pub fn cancel_token(&self) -> Option<&CancelToken> {
        self.cancel.as_ref()
    }
}
