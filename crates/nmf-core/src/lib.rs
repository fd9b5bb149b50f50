//! Core types for non-negative matrix factorization.
//!
//! This crate provides the building blocks shared by the factorization
//! algorithms: a dense owned [`Matrix`] value type, the [`Scalar`] trait that
//! abstracts over `f32`/`f64`, the [`NmfError`] type, and precondition checks.
//!
//! # Modules
//!
//! - [`error`]: Error types
//! - [`matrix`]: Dense matrix value type and reconstruction error
//! - [`types`]: Scalar trait and numerical constants
//! - [`utils`]: Parallel thresholds and test helpers
//! - [`validation`]: Shape and value preconditions

pub mod error;
pub mod matrix;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items at the crate root
pub use error::{NmfError, Result};
pub use matrix::{reconstruction_error, Matrix};
pub use types::Scalar;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use nmf_core::prelude::*;
///
/// let v: Matrix<f64> = Matrix::zeros(2, 2);
/// assert!(v.is_non_negative());
/// ```
pub mod prelude {
    pub use crate::error::{NmfError, Result};
    pub use crate::matrix::{reconstruction_error, Matrix};
    pub use crate::types::{constants, Scalar};
    pub use crate::utils::parallel_thresholds::{
        parallel_thresholds, set_parallel_thresholds, ParallelThresholds,
        ParallelThresholdsBuilder,
    };
    pub use crate::validation::validate_problem;
}
