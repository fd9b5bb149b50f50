//! Error types for matrix factorization.
//!
//! Every fallible operation in the workspace reports one of the variants of
//! [`NmfError`]. Precondition violations are detected before any iteration
//! begins; non-convergence is never an error.

use thiserror::Error;

/// Errors that can occur while building matrices or factorizing them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NmfError {
    /// Matrix shapes are incompatible.
    ///
    /// Raised when the target and the initial factors cannot be multiplied
    /// together, when a matrix is built from data of the wrong length, or
    /// when a requested rank is not usable.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// An input value is not acceptable.
    ///
    /// Raised when a matrix element is negative, NaN or infinite, or when a
    /// configuration parameter is out of range.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the offending value
        reason: String,
    },

    /// A decomposition used for initialisation failed.
    #[error("Numerical failure: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },
}

impl NmfError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an InvalidInput error with a custom reason.
    pub fn invalid_input<S: Into<String>>(reason: S) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by incompatible shapes.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }

    /// Returns true for errors caused by negative or non-finite values.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

/// Result type alias for factorization operations.
pub type Result<T> = std::result::Result<T, NmfError>;
