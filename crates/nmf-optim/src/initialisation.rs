//! Strategies for building the initial factors W0 and H0.
//!
//! The rank is always chosen by the caller.

use nalgebra::linalg::SVD;
use nmf_core::{
    error::{NmfError, Result},
    matrix::Matrix,
    types::Scalar,
    validation::{check_rank, check_tolerance},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Offset added to random entries so they start strictly positive.
const RANDOM_FLOOR: f64 = 1e-8;

/// Iteration cap for the SVD used by [`Initialisation::Svd`].
const SVD_MAX_ITERATIONS: usize = 10_000;

/// How to obtain `W0 (m x k)` and `H0 (k x n)` for a target `V (m x n)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Initialisation<T: Scalar> {
    /// Caller-supplied guesses, checked against `V` and the rank.
    Provided {
        /// Initial basis matrix
        w: Matrix<T>,
        /// Initial coefficient matrix
        h: Matrix<T>,
    },

    /// Entries `1e-8 + u * max_value` with `u` uniform on `[0, 1)`.
    ///
    /// `max_value` defaults to the largest element of `V`. The same seed
    /// always yields the same factors.
    Random {
        /// Seed for the generator
        seed: u64,
        /// Scale of the entries
        max_value: Option<T>,
    },

    /// `W0 = |U_k √S_k|`, `H0 = |√S_k V_kᵗ|` from the `k` largest singular
    /// triplets of `V`.
    ///
    /// Taking absolute values may produce exact zeros, which multiplicative
    /// updates cannot move away from.
    Svd,
}

impl<T: Scalar> Initialisation<T> {
    /// Random initialisation scaled by the largest element of `V`.
    pub fn random(seed: u64) -> Self {
        Self::Random {
            seed,
            max_value: None,
        }
    }

    /// Caller-supplied guesses.
    pub fn provided(w: Matrix<T>, h: Matrix<T>) -> Self {
        Self::Provided { w, h }
    }

    /// Builds `(W0, H0)` of the given rank for the target `v`.
    pub fn initialise(&self, v: &Matrix<T>, rank: usize) -> Result<(Matrix<T>, Matrix<T>)> {
        check_rank(rank)?;
        v.check_non_negative("V")?;

        match self {
            Self::Provided { w, h } => provided(v, rank, w, h),
            Self::Random { seed, max_value } => random(v, rank, *seed, *max_value),
            Self::Svd => svd(v, rank),
        }
    }
}

fn provided<T: Scalar>(
    v: &Matrix<T>,
    rank: usize,
    w: &Matrix<T>,
    h: &Matrix<T>,
) -> Result<(Matrix<T>, Matrix<T>)> {
    let (m, n) = v.shape();
    if w.shape() != (m, rank) {
        return Err(NmfError::dimension_mismatch(
            format!("W0 of shape {m}x{rank}"),
            format!("{}x{}", w.nrows(), w.ncols()),
        ));
    }
    if h.shape() != (rank, n) {
        return Err(NmfError::dimension_mismatch(
            format!("H0 of shape {rank}x{n}"),
            format!("{}x{}", h.nrows(), h.ncols()),
        ));
    }
    w.check_non_negative("W0")?;
    h.check_non_negative("H0")?;
    Ok((w.clone(), h.clone()))
}

fn random<T: Scalar>(
    v: &Matrix<T>,
    rank: usize,
    seed: u64,
    max_value: Option<T>,
) -> Result<(Matrix<T>, Matrix<T>)> {
    let scale = max_value.or_else(|| v.max()).unwrap_or_else(T::one);
    check_tolerance("max_value", scale)?;

    let (m, n) = v.shape();
    let floor = <T as Scalar>::from_f64(RANDOM_FLOOR);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sample = || floor + <T as Scalar>::from_f64(rng.gen::<f64>()) * scale;

    let w = Matrix::from_fn(m, rank, |_, _| sample());
    let h = Matrix::from_fn(rank, n, |_, _| sample());
    Ok((w, h))
}

fn svd<T: Scalar>(v: &Matrix<T>, rank: usize) -> Result<(Matrix<T>, Matrix<T>)> {
    let (m, n) = v.shape();
    let available = m.min(n);
    if rank > available {
        return Err(NmfError::dimension_mismatch(
            format!("rank of at most {available} for a {m}x{n} target"),
            format!("rank {rank}"),
        ));
    }

    let decomposition = SVD::try_new(
        v.as_dmatrix().clone(),
        true,
        true,
        <T as Scalar>::EPSILON,
        SVD_MAX_ITERATIONS,
    )
    .ok_or_else(|| NmfError::numerical_error("SVD of V did not converge"))?;

    let u = decomposition
        .u
        .ok_or_else(|| NmfError::numerical_error("SVD returned no left singular vectors"))?;
    let v_t = decomposition
        .v_t
        .ok_or_else(|| NmfError::numerical_error("SVD returned no right singular vectors"))?;
    let roots: Vec<T> = decomposition
        .singular_values
        .iter()
        .take(rank)
        .map(|&s| s.sqrt())
        .collect();

    let w = Matrix::from_fn(m, rank, |i, j| magnitude(u[(i, j)] * roots[j]));
    let h = Matrix::from_fn(rank, n, |i, j| magnitude(roots[i] * v_t[(i, j)]));
    Ok((w, h))
}

fn magnitude<T: Scalar>(x: T) -> T {
    if x < T::zero() {
        -x
    } else {
        x
    }
}
