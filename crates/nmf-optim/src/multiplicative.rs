//! Multiplicative-update NMF (Lee & Seung).
//!
//! Minimizes `||V - WH||_F` over non-negative `W` and `H` by alternately
//! rescaling every entry with a ratio of non-negative quantities:
//!
//! ```text
//! H ← H ∘ (WᵗV) ⊘ (WᵗWH + ε)
//! W ← W ∘ (VHᵗ) ⊘ (WHHᵗ + ε)
//! ```
//!
//! Because every factor in those ratios is non-negative, the iterates stay
//! non-negative without any clamping, and the reconstruction error does not
//! increase from one pass to the next.
//!
//! # Iteration budget
//!
//! Each outer iteration performs `max_inner_iterations` passes (an H update
//! followed by a W update), then measures the reconstruction error. The run
//! stops as soon as the error is at most `tolerance`, or after
//! `max_outer_iterations` outer iterations. The total number of passes is
//! therefore bounded by `max_outer_iterations * max_inner_iterations`.
//!
//! # Limitations
//!
//! A row of `H` or a column of `W` that reaches exactly zero stays zero for
//! the rest of the run: its numerator is zero at every later update. Such
//! collapsed components are not re-seeded. Start from strictly positive
//! factors (see [`crate::initialisation::Initialisation::Random`]) to avoid
//! them.
//!
//! # Example
//!
//! ```rust
//! use nmf_core::Matrix;
//! use nmf_optim::factorize;
//!
//! let v = Matrix::from_rows(&[[22.0, 28.0], [49.0, 64.0]]).unwrap();
//! let w0 = Matrix::from_rows(&[[1.0, 1.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
//! let h0 = Matrix::from_rows(&[[1.0, 1.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
//!
//! let (w, h) = factorize(&v, &w0, &h0, 0.001, 10, 10).unwrap();
//! assert_eq!(w.shape(), (2, 3));
//! assert_eq!(h.shape(), (3, 2));
//! ```

use crate::factorizer::{FactorizationResult, Factorizer, TerminationReason};
use log::{debug, info, trace};
use nmf_core::{
    error::Result,
    matrix::{reconstruction_error, Matrix},
    types::Scalar,
    validation::{check_positive, check_tolerance, validate_problem},
};
use std::time::Instant;

/// Configuration for the multiplicative-update factorizer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiplicativeUpdateConfig<T>
where
    T: Scalar,
{
    /// Stop once `||V - WH||_F <= tolerance` after an outer iteration
    pub tolerance: T,

    /// Maximum number of outer iterations (error checks)
    pub max_outer_iterations: usize,

    /// Update passes per outer iteration
    pub max_inner_iterations: usize,

    /// Value added to every update denominator
    pub epsilon: T,
}

impl<T> Default for MultiplicativeUpdateConfig<T>
where
    T: Scalar,
{
    fn default() -> Self {
        Self {
            tolerance: T::DEFAULT_TOLERANCE,
            max_outer_iterations: 100,
            max_inner_iterations: 1,
            epsilon: T::DIVISION_EPSILON,
        }
    }
}

impl<T> MultiplicativeUpdateConfig<T>
where
    T: Scalar,
{
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reconstruction-error tolerance.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the number of outer iterations.
    pub fn with_max_outer_iterations(mut self, iterations: usize) -> Self {
        self.max_outer_iterations = iterations;
        self
    }

    /// Sets the number of update passes per outer iteration.
    pub fn with_max_inner_iterations(mut self, iterations: usize) -> Self {
        self.max_inner_iterations = iterations;
        self
    }

    /// Sets the denominator stabilizer.
    pub fn with_epsilon(mut self, epsilon: T) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Checks that tolerance and epsilon are usable.
    pub fn validate(&self) -> Result<()> {
        check_tolerance("tolerance", self.tolerance)?;
        check_positive("epsilon", self.epsilon)
    }
}

/// Multiplicative-update factorizer.
#[derive(Debug, Clone, Default)]
pub struct MultiplicativeUpdate<T>
where
    T: Scalar,
{
    config: MultiplicativeUpdateConfig<T>,
}

impl<T> MultiplicativeUpdate<T>
where
    T: Scalar,
{
    /// Creates a factorizer with the given configuration.
    pub fn new(config: MultiplicativeUpdateConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MultiplicativeUpdateConfig<T> {
        &self.config
    }

    /// `H ∘ (WᵗV) ⊘ (WᵗWH + ε)`
    fn update_h(&self, v: &Matrix<T>, w: &Matrix<T>, h: &Matrix<T>) -> Result<Matrix<T>> {
        let wt = w.transpose();
        let numerator = wt.matmul(v)?;
        let denominator = wt.matmul(w)?.matmul(h)?;
        h.component_mul(&numerator.component_div_eps(&denominator, self.config.epsilon)?)
    }

    /// `W ∘ (VHᵗ) ⊘ (WHHᵗ + ε)`
    fn update_w(&self, v: &Matrix<T>, w: &Matrix<T>, h: &Matrix<T>) -> Result<Matrix<T>> {
        let ht = h.transpose();
        let numerator = v.matmul(&ht)?;
        let denominator = w.matmul(&h.matmul(&ht)?)?;
        w.component_mul(&numerator.component_div_eps(&denominator, self.config.epsilon)?)
    }
}

impl<T> Factorizer<T> for MultiplicativeUpdate<T>
where
    T: Scalar,
{
    fn name(&self) -> &str {
        "Multiplicative Update"
    }

    fn factorize(
        &mut self,
        v: &Matrix<T>,
        w0: &Matrix<T>,
        h0: &Matrix<T>,
    ) -> Result<FactorizationResult<T>> {
        let start = Instant::now();
        let rank = validate_problem(v, w0, h0)?;
        self.config.validate()?;

        let mut w = w0.clone();
        let mut h = h0.clone();
        let initial_error = reconstruction_error(v, &w, &h)?;
        debug!(
            "{}: {}x{} target, rank {rank}, initial error {initial_error}",
            self.name(),
            v.nrows(),
            v.ncols()
        );

        let mut error_history = Vec::with_capacity(self.config.max_outer_iterations);
        let mut termination_reason = TerminationReason::MaxIterations;

        for outer in 1..=self.config.max_outer_iterations {
            for inner in 1..=self.config.max_inner_iterations {
                h = self.update_h(v, &w, &h)?;
                w = self.update_w(v, &w, &h)?;
                trace!("outer {outer}, pass {inner} done");
            }

            let error = reconstruction_error(v, &w, &h)?;
            error_history.push(error);
            debug!("outer iteration {outer}: error {error}");

            if error <= self.config.tolerance {
                termination_reason = TerminationReason::Converged;
                break;
            }
        }

        let result = FactorizationResult::new(
            w,
            h,
            initial_error,
            error_history,
            start.elapsed(),
            termination_reason,
        );
        info!(
            "{} finished after {} outer iterations ({:?}): error {}",
            self.name(),
            result.iterations,
            result.termination_reason,
            result.error
        );
        Ok(result)
    }
}

/// Factorizes `v ≈ W * H` starting from `w0`, `h0` with multiplicative updates.
///
/// Performs up to `max_outer_iterations` outer iterations of
/// `max_inner_iterations` update passes each, stopping early once
/// `||V - WH||_F <= tolerance`. Returns the refined `(W, H)`.
///
/// Fails with `DimensionMismatch` when shapes are incompatible and with
/// `InvalidInput` when an input contains a negative or non-finite element.
pub fn factorize<T: Scalar>(
    v: &Matrix<T>,
    w0: &Matrix<T>,
    h0: &Matrix<T>,
    tolerance: T,
    max_outer_iterations: usize,
    max_inner_iterations: usize,
) -> Result<(Matrix<T>, Matrix<T>)> {
    let config = MultiplicativeUpdateConfig::new()
        .with_tolerance(tolerance)
        .with_max_outer_iterations(max_outer_iterations)
        .with_max_inner_iterations(max_inner_iterations);

    Ok(MultiplicativeUpdate::new(config)
        .factorize(v, w0, h0)?
        .into_factors())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nmf_core::utils::test_helpers::{init_logging, product_scenario};

    #[test]
    fn test_config_builder() {
        let config = MultiplicativeUpdateConfig::<f64>::new()
            .with_tolerance(1e-4)
            .with_max_outer_iterations(7)
            .with_max_inner_iterations(3)
            .with_epsilon(1e-12);

        assert_relative_eq!(config.tolerance, 1e-4);
        assert_eq!(config.max_outer_iterations, 7);
        assert_eq!(config.max_inner_iterations, 3);
        assert_relative_eq!(config.epsilon, 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(MultiplicativeUpdateConfig::<f64>::new()
            .with_tolerance(-1.0)
            .validate()
            .unwrap_err()
            .is_invalid_input());
        assert!(MultiplicativeUpdateConfig::<f64>::new()
            .with_epsilon(0.0)
            .validate()
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_single_pass_matches_hand_computation() {
        init_logging();
        // 1x1 problem: v = 6, w = 1, h = 2
        let v = Matrix::from_element(1, 1, 6.0);
        let w0 = Matrix::from_element(1, 1, 1.0);
        let h0 = Matrix::from_element(1, 1, 2.0);

        let mut mu = MultiplicativeUpdate::new(
            MultiplicativeUpdateConfig::new()
                .with_tolerance(0.0)
                .with_max_outer_iterations(1)
                .with_max_inner_iterations(1)
                .with_epsilon(1e-9),
        );
        let result = mu.factorize(&v, &w0, &h0).unwrap();

        // h = 2 * 6 / (1 * 1 * 2 + eps) ≈ 6, then w = 1 * 36 / (1 * 36 + eps) ≈ 1
        assert_relative_eq!(result.h[(0, 0)], 6.0, epsilon = 1e-7);
        assert_relative_eq!(result.w[(0, 0)], 1.0, epsilon = 1e-7);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_zero_budget_returns_copies() {
        let s = product_scenario::<f64>();
        let result = MultiplicativeUpdate::new(
            MultiplicativeUpdateConfig::new().with_max_outer_iterations(0),
        )
        .factorize(&s.v, &s.w0, &s.h0)
        .unwrap();

        assert_eq!(result.w, s.w0);
        assert_eq!(result.h, s.h0);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
        assert_relative_eq!(result.error, result.initial_error);
    }

    #[test]
    fn test_name() {
        let mu = MultiplicativeUpdate::<f32>::default();
        assert_eq!(Factorizer::name(&mu), "Multiplicative Update");
    }
}
