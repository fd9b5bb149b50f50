//! Factorizer trait and result types.
//!
//! A factorizer refines non-negative initial factors `W0 (m x k)` and
//! `H0 (k x n)` so that `W * H` approximates a non-negative target
//! `V (m x n)` in the Frobenius norm.
//!
//! # Termination
//!
//! - **Converged**: the algorithm's tolerance test passed
//! - **MaxIterations**: the iteration budget ran out
//!
//! Running out of budget is a normal outcome, not an error: the caller gets
//! the best factors found so far and can inspect [`FactorizationResult::error`].
//! Only precondition violations (shapes, negative or non-finite values,
//! invalid configuration) produce an `Err`, and they are reported before any
//! iteration starts.

use crate::initialisation::Initialisation;
use nmf_core::{error::Result, matrix::Matrix, types::Scalar};
use std::time::Duration;

/// Reason a factorization run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationReason {
    /// Tolerance test satisfied
    Converged,
    /// Iteration budget exhausted without meeting the tolerance
    MaxIterations,
}

/// Outcome of a factorization run.
#[derive(Debug, Clone)]
pub struct FactorizationResult<T>
where
    T: Scalar,
{
    /// Basis matrix W (m x k)
    pub w: Matrix<T>,

    /// Coefficient matrix H (k x n)
    pub h: Matrix<T>,

    /// Reconstruction error `||V - WH||_F` of the returned factors
    pub error: T,

    /// Reconstruction error of the initial factors
    pub initial_error: T,

    /// Number of outer iterations performed
    pub iterations: usize,

    /// Reconstruction error after each outer iteration
    pub error_history: Vec<T>,

    /// Wall-clock time spent in the run
    pub duration: Duration,

    /// Why the run stopped
    pub termination_reason: TerminationReason,

    /// True if the tolerance test passed
    pub converged: bool,
}

impl<T> FactorizationResult<T>
where
    T: Scalar,
{
    /// Creates a new result; `iterations` is taken from the error history.
    pub fn new(
        w: Matrix<T>,
        h: Matrix<T>,
        initial_error: T,
        error_history: Vec<T>,
        duration: Duration,
        termination_reason: TerminationReason,
    ) -> Self {
        let error = error_history.last().copied().unwrap_or(initial_error);

        Self {
            w,
            h,
            error,
            initial_error,
            iterations: error_history.len(),
            error_history,
            duration,
            termination_reason,
            converged: termination_reason == TerminationReason::Converged,
        }
    }

    /// Shared dimension of W and H.
    pub fn rank(&self) -> usize {
        self.w.ncols()
    }

    /// Consumes the result and returns `(W, H)`.
    pub fn into_factors(self) -> (Matrix<T>, Matrix<T>) {
        (self.w, self.h)
    }
}

/// Interface shared by the factorization algorithms.
pub trait Factorizer<T: Scalar> {
    /// Human-readable name of the algorithm.
    fn name(&self) -> &str;

    /// Refines copies of `w0` and `h0` towards `v ≈ W * H`.
    ///
    /// The caller's matrices are left untouched.
    fn factorize(
        &mut self,
        v: &Matrix<T>,
        w0: &Matrix<T>,
        h0: &Matrix<T>,
    ) -> Result<FactorizationResult<T>>;

    /// Builds initial factors of the given rank, then factorizes.
    fn factorize_from(
        &mut self,
        v: &Matrix<T>,
        rank: usize,
        initialisation: &Initialisation<T>,
    ) -> Result<FactorizationResult<T>> {
        let (w0, h0) = initialisation.initialise(v, rank)?;
        self.factorize(v, &w0, &h0)
    }
}
