//! Alternating non-negative least squares with projected gradient (Lin, 2007).
//!
//! Minimizes the same objective as the multiplicative updates,
//! `½||V - WH||²_F` over `W, H ≥ 0`, but solves each half-problem
//!
//! ```text
//! min_{H ≥ 0} ½||V - WH||²_F
//! ```
//!
//! with projected gradient steps `H ← P[H - α∇]`, where `P` clamps negative
//! entries to zero and `α` is chosen by an Armijo-type search. The W
//! half-problem is the same problem on the transposed system
//! `Vᵗ ≈ Hᵗ Wᵗ`.
//!
//! # Stopping rule
//!
//! With `∇ᴾ` the projected gradient (entries where the gradient is negative or
//! the variable is positive), the outer loop stops once
//! `||[∇ᴾ_W, ∇ᴾ_H]|| <= tolerance * ||[∇_W, ∇_H]||₀`, the right-hand side
//! being measured at the initial factors. Each half-problem runs until its own
//! projected gradient drops below an adaptive tolerance that shrinks tenfold
//! whenever a half-problem is already solved on its first iteration.

use crate::factorizer::{FactorizationResult, Factorizer, TerminationReason};
use log::{debug, info, trace};
use nmf_core::{
    error::{NmfError, Result},
    matrix::{reconstruction_error, Matrix},
    types::Scalar,
    validation::{check_positive, check_tolerance, validate_problem},
};
use std::time::Instant;

/// Configuration for the projected-gradient factorizer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedGradientConfig<T>
where
    T: Scalar,
{
    /// Relative projected-gradient tolerance
    pub tolerance: T,

    /// Maximum number of outer (W then H) iterations
    pub max_iterations: usize,

    /// Maximum iterations of each half-problem
    pub max_subproblem_iterations: usize,

    /// Maximum step-size trials per half-problem iteration
    pub max_step_search: usize,

    /// Step-size shrink factor, in (0, 1)
    pub beta: T,

    /// Sufficient-decrease parameter σ, in (0, 1)
    pub sufficient_decrease: T,
}

impl<T> Default for ProjectedGradientConfig<T>
where
    T: Scalar,
{
    fn default() -> Self {
        Self {
            tolerance: T::DEFAULT_TOLERANCE,
            max_iterations: 100,
            max_subproblem_iterations: 1000,
            max_step_search: 20,
            beta: <T as Scalar>::from_f64(0.1),
            sufficient_decrease: <T as Scalar>::from_f64(0.01),
        }
    }
}

impl<T> ProjectedGradientConfig<T>
where
    T: Scalar,
{
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relative projected-gradient tolerance.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the outer iteration budget.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the half-problem iteration budget.
    pub fn with_max_subproblem_iterations(mut self, iterations: usize) -> Self {
        self.max_subproblem_iterations = iterations;
        self
    }

    /// Sets the number of step-size trials.
    pub fn with_max_step_search(mut self, trials: usize) -> Self {
        self.max_step_search = trials;
        self
    }

    /// Sets the step-size shrink factor.
    pub fn with_beta(mut self, beta: T) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the sufficient-decrease parameter.
    pub fn with_sufficient_decrease(mut self, sigma: T) -> Self {
        self.sufficient_decrease = sigma;
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        check_tolerance("tolerance", self.tolerance)?;
        check_positive("beta", self.beta)?;
        check_positive("sufficient_decrease", self.sufficient_decrease)?;
        if self.beta >= T::one() {
            return Err(NmfError::invalid_input(format!(
                "beta must be below 1, got {}",
                self.beta
            )));
        }
        if self.sufficient_decrease >= T::one() {
            return Err(NmfError::invalid_input(format!(
                "sufficient_decrease must be below 1, got {}",
                self.sufficient_decrease
            )));
        }
        Ok(())
    }
}

/// Solution of one half-problem.
#[derive(Debug)]
struct Subproblem<T: Scalar> {
    solution: Matrix<T>,
    gradient: Matrix<T>,
    iterations: usize,
}

/// Projected-gradient factorizer.
#[derive(Debug, Clone, Default)]
pub struct ProjectedGradient<T>
where
    T: Scalar,
{
    config: ProjectedGradientConfig<T>,
}

impl<T> ProjectedGradient<T>
where
    T: Scalar,
{
    /// Creates a factorizer with the given configuration.
    pub fn new(config: ProjectedGradientConfig<T>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ProjectedGradientConfig<T> {
        &self.config
    }

    /// Solves `min_{H ≥ 0} ½||V - WH||²` starting from `h_init`.
    fn solve_subproblem(
        &self,
        v: &Matrix<T>,
        w: &Matrix<T>,
        h_init: &Matrix<T>,
        tolerance: T,
    ) -> Result<Subproblem<T>> {
        let wt = w.transpose();
        let wtv = wt.matmul(v)?;
        let wtw = wt.matmul(w)?;

        let zero = T::zero();
        let half = <T as Scalar>::from_f64(0.5);
        let linear_weight = T::one() - self.config.sufficient_decrease;
        let beta = self.config.beta;

        let mut h = h_init.clone();
        let mut alpha = T::one();
        let mut gradient = wtw.matmul(&h)?.component_sub(&wtv)?;
        let mut iterations = 0;

        for iter in 1..=self.config.max_subproblem_iterations {
            iterations = iter;
            gradient = wtw.matmul(&h)?.component_sub(&wtv)?;
            if projected_norm(&gradient, &h) < tolerance {
                break;
            }

            let mut decrease_alpha: Option<bool> = None;
            let mut previous = h.clone();
            for _ in 0..self.config.max_step_search {
                let candidate = h
                    .component_sub(&gradient.scale(alpha))?
                    .map(|x| x.max(zero));
                let step = candidate.component_sub(&h)?;
                let grad_step = gradient.dot(&step)?;
                let curvature = wtw.matmul(&step)?.dot(&step)?;
                let sufficient = linear_weight * grad_step + half * curvature < zero;

                // the first trial decides whether alpha shrinks or grows
                if *decrease_alpha.get_or_insert(!sufficient) {
                    if sufficient {
                        h = candidate;
                        break;
                    }
                    alpha *= beta;
                } else if !sufficient || previous == candidate {
                    h = previous;
                    break;
                } else {
                    alpha /= beta;
                    previous = candidate;
                }
            }
        }

        Ok(Subproblem {
            solution: h,
            gradient,
            iterations,
        })
    }
}

/// Norm of the gradient restricted to entries that can still move:
/// negative gradient, or positive variable.
fn projected_norm<T: Scalar>(gradient: &Matrix<T>, x: &Matrix<T>) -> T {
    projected_norm_squared(gradient, x).sqrt()
}

fn projected_norm_squared<T: Scalar>(gradient: &Matrix<T>, x: &Matrix<T>) -> T {
    let zero = T::zero();
    gradient
        .iter()
        .zip(x.iter())
        .filter(|&(&g, &xi)| g < zero || xi > zero)
        .fold(zero, |acc, (&g, _)| acc + g * g)
}

/// Gradients of `½||V - WH||²` with respect to W and H.
fn gradients<T: Scalar>(
    v: &Matrix<T>,
    w: &Matrix<T>,
    h: &Matrix<T>,
) -> Result<(Matrix<T>, Matrix<T>)> {
    let ht = h.transpose();
    let wt = w.transpose();
    let grad_w = w.matmul(&h.matmul(&ht)?)?.component_sub(&v.matmul(&ht)?)?;
    let grad_h = wt.matmul(w)?.matmul(h)?.component_sub(&wt.matmul(v)?)?;
    Ok((grad_w, grad_h))
}

impl<T> Factorizer<T> for ProjectedGradient<T>
where
    T: Scalar,
{
    fn name(&self) -> &str {
        "Projected Gradient"
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

        let (mut grad_w, mut grad_h) = gradients(v, &w, &h)?;
        let initial_gradient = (grad_w.dot(&grad_w)? + grad_h.dot(&grad_h)?).sqrt();
        let stop_threshold = self.config.tolerance * initial_gradient;
        let mut tolerance_w =
            self.config.tolerance.max(<T as Scalar>::from_f64(0.001)) * initial_gradient;
        let mut tolerance_h = tolerance_w;
        let shrink = <T as Scalar>::from_f64(0.1);

        debug!(
            "{}: {}x{} target, rank {rank}, initial error {initial_error}, initial gradient {initial_gradient}",
            self.name(),
            v.nrows(),
            v.ncols()
        );

        let vt = v.transpose();
        let mut error_history = Vec::with_capacity(self.config.max_iterations);
        let mut termination_reason = TerminationReason::MaxIterations;

        for iter in 1..=self.config.max_iterations {
            let projected = (projected_norm_squared(&grad_w, &w)
                + projected_norm_squared(&grad_h, &h))
            .sqrt();
            if projected <= stop_threshold {
                termination_reason = TerminationReason::Converged;
                break;
            }

            let sub_w = self.solve_subproblem(&vt, &h.transpose(), &w.transpose(), tolerance_w)?;
            w = sub_w.solution.transpose();
            grad_w = sub_w.gradient.transpose();
            if sub_w.iterations == 1 {
                tolerance_w *= shrink;
            }

            let sub_h = self.solve_subproblem(v, &w, &h, tolerance_h)?;
            h = sub_h.solution;
            grad_h = sub_h.gradient;
            if sub_h.iterations == 1 {
                tolerance_h *= shrink;
            }
            trace!(
                "iteration {iter}: W subproblem {} its, H subproblem {} its",
                sub_w.iterations,
                sub_h.iterations
            );

            let error = reconstruction_error(v, &w, &h)?;
            error_history.push(error);
            debug!("iteration {iter}: error {error}, projected gradient {projected}");
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
            "{} finished after {} iterations ({:?}): error {}",
            self.name(),
            result.iterations,
            result.termination_reason,
            result.error
        );
        Ok(result)
    }
}
