use std::ops::Range;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),

    /// The requested rows do not fit in the buffer.
    #[error("rows {0:?} exceed the {1} rows of the buffer")]
    RowsOutOfRange(Range<usize>, usize),

    /// The operation was cancelled before all rows were processed.
    #[error("operation cancelled")]
    Cancelled,
}

/// Controls how filter passes are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process output rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// A shared flag used to stop a running filter pass.
///
/// Clones share the same flag. Workers check it before each row.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Run `f` on every row of `data` in `rows` with the given strategy.
///
/// Each call to `f` receives the row index and the full `stride`-long row
/// slice, padding included. Rows are disjoint, so workers never share an
/// output byte.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `data` - The destination buffer, `stride * height` bytes.
/// * `stride` - Bytes per row.
/// * `rows` - The rows to visit.
/// * `cancel` - Optional token checked before each row.
/// * `f` - The per-row operation.
pub fn for_each_row<F>(
    strategy: ExecutionStrategy,
    data: &mut [u8],
    stride: usize,
    rows: Range<usize>,
    cancel: Option<&CancelToken>,
    f: F,
) -> Result<(), ParallelError>
where
    F: Fn(usize, &mut [u8]) + Send + Sync,
{
    if stride == 0 {
        return Err(ParallelError::InvalidRowStride(stride));
    }

    let num_rows = data.len() / stride;
    if rows.start > rows.end || rows.end > num_rows {
        return Err(ParallelError::RowsOutOfRange(rows, num_rows));
    }

    let first_row = rows.start;
    let data = &mut data[rows.start * stride..rows.end * stride];

    let run_row = |(i, row): (usize, &mut [u8])| {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return;
        }
        f(first_row + i, row);
    };

    match strategy {
        ExecutionStrategy::Serial => {
            data.chunks_mut(stride).enumerate().for_each(run_row);
        }
        ExecutionStrategy::ParallelRows => {
            data.par_chunks_mut(stride).enumerate().for_each(run_row);
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                data.par_chunks_mut(stride).enumerate().for_each(run_row);
            });
        }
    }

    if cancel.is_some_and(CancelToken::is_cancelled) {
        return Err(ParallelError::Cancelled);
    }

    Ok(())
}
