//! Shared fixtures for tests and benches.

use crate::{matrix::Matrix, types::Scalar};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialise `env_logger` once per test binary.
///
/// Reads `RUST_LOG`, defaulting to `debug`.
pub fn init_logging() {
    INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("debug");

        // don't panic if another binary already installed a logger
        let _ = env_logger::Builder::from_env(env).is_test(true).try_init();
    });
}

/// A factorization problem with known ground truth.
#[derive(Debug, Clone)]
pub struct Scenario<T: Scalar> {
    /// Target matrix `V = W_true * H_true`
    pub v: Matrix<T>,
    /// Initial guess for W
    pub w0: Matrix<T>,
    /// Initial guess for H
    pub h0: Matrix<T>,
}

fn from_f64_rows<T: Scalar, const C: usize>(rows: &[[f64; C]]) -> Matrix<T> {
    Matrix::from_fn(rows.len(), C, |i, j| <T as Scalar>::from_f64(rows[i][j]))
}

/// `V = [[1,2,3],[4,5,6]] * [[1,2],[3,4],[5,6]] = [[22,28],[49,64]]` with
/// initial guesses `W0 = [[1,1,3],[4,5,6]]`, `H0 = [[1,1],[3,4],[5,6]]`.
pub fn product_scenario<T: Scalar>() -> Scenario<T> {
    let w_true = from_f64_rows::<T, 3>(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    let h_true = from_f64_rows::<T, 2>(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);

    Scenario {
        v: w_true
            .matmul(&h_true)
            .unwrap_or_else(|_| unreachable!("2x3 times 3x2")),
        w0: from_f64_rows::<T, 3>(&[[1.0, 1.0, 3.0], [4.0, 5.0, 6.0]]),
        h0: from_f64_rows::<T, 2>(&[[1.0, 1.0], [3.0, 4.0], [5.0, 6.0]]),
    }
}

/// Deterministic strictly positive `rows x cols` matrix.
pub fn positive_matrix<T: Scalar>(rows: usize, cols: usize, salt: usize) -> Matrix<T> {
    Matrix::from_fn(rows, cols, |i, j| {
        let x = (i * 7 + j * 3 + salt * 11) % 13;
        <T as Scalar>::from_usize(x + 1) / <T as Scalar>::from_f64(4.0)
    })
}

/// Exactly rank-`rank` non-negative target with matching positive guesses.
pub fn low_rank_scenario<T: Scalar>(rows: usize, cols: usize, rank: usize) -> Scenario<T> {
    let w_true = positive_matrix::<T>(rows, rank, 1);
    let h_true = positive_matrix::<T>(rank, cols, 2);

    Scenario {
        v: w_true
            .matmul(&h_true)
            .unwrap_or_else(|_| unreachable!("inner dimensions agree")),
        w0: positive_matrix(rows, rank, 3),
        h0: positive_matrix(rank, cols, 4),
    }
}
