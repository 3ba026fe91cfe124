//! Error taxonomy shared by every kernel and pipeline stage.

#![forbid(unsafe_code)]

use thiserror::Error;

/// A precondition a caller broke when invoking a kernel.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// Strided scans need a stride of at least one.
    #[error("stride must be at least 1")]
    ZeroStride,
    /// Matrix operands (and the output, when supplied) differ in dimension.
    #[error("matrix dimensions differ: left {left}x{left}, right {right}x{right}, out {out}x{out}")]
    DimensionMismatch {
        /// Dimension of the left operand.
        left: usize,
        /// Dimension of the right operand.
        right: usize,
        /// Dimension of the output matrix.
        out: usize,
    },
    /// Rows handed to a square matrix constructor were ragged or not square.
    #[error("expected a square matrix, got {rows} rows with a row of length {cols}")]
    NonSquare {
        /// Number of rows supplied.
        rows: usize,
        /// Length of the first offending row.
        cols: usize,
    },
    /// A size parameter that must be positive was zero.
    #[error("{0} must be greater than zero")]
    ZeroDimension(&'static str),
}

/// Errors surfaced by kernels, buffers and the benchmark pipelines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A buffer of `requested` elements could not be obtained.
    #[error("allocation of {requested} elements failed")]
    AllocationFailure {
        /// Number of elements that were requested.
        requested: usize,
    },

    /// The caller broke a kernel precondition.
    #[error("precondition violated: {0}")]
    PreconditionViolation(Precondition),

    /// A configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl KernelError {
    /// Process exit status the driver reports for this error.
    ///
    /// 2 is left to clap for usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            KernelError::AllocationFailure { .. } => 1,
            KernelError::PreconditionViolation(_) | KernelError::Config(_) => 3,
        }
    }
}

impl From<Precondition> for KernelError {
    fn from(p: Precondition) -> Self {
        KernelError::PreconditionViolation(p)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KernelError>;
