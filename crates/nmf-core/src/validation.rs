//! Precondition checks shared by the factorizers.
//!
//! Shapes are checked before values so that a mismatched problem is always
//! reported as [`NmfError::DimensionMismatch`], whatever its contents.

use crate::{
    error::{NmfError, Result},
    matrix::Matrix,
    types::Scalar,
};

/// Checks that `W0 (m x k)` and `H0 (k x n)` fit a target `V (m x n)`.
///
/// Returns the rank `k` on success.
pub fn check_factor_shapes<T: Scalar>(v: &Matrix<T>, w: &Matrix<T>, h: &Matrix<T>) -> Result<usize> {
    let (m, n) = v.shape();
    let k = w.ncols();

    if w.nrows() != m {
        return Err(NmfError::dimension_mismatch(
            format!("W0 with {m} rows (rows of V)"),
            format!("W0 of shape {}x{}", w.nrows(), w.ncols()),
        ));
    }
    if h.ncols() != n {
        return Err(NmfError::dimension_mismatch(
            format!("H0 with {n} columns (columns of V)"),
            format!("H0 of shape {}x{}", h.nrows(), h.ncols()),
        ));
    }
    if h.nrows() != k {
        return Err(NmfError::dimension_mismatch(
            format!("H0 with {k} rows (columns of W0)"),
            format!("H0 of shape {}x{}", h.nrows(), h.ncols()),
        ));
    }
    check_rank(k)?;

    Ok(k)
}

/// Rejects a zero rank.
pub fn check_rank(rank: usize) -> Result<()> {
    if rank == 0 {
        return Err(NmfError::dimension_mismatch("rank of at least 1", "rank 0"));
    }
    Ok(())
}

/// Full precondition check for a factorization problem.
///
/// Shapes first, then every element of `V`, `W0` and `H0` must be finite and
/// non-negative. Returns the rank.
pub fn validate_problem<T: Scalar>(v: &Matrix<T>, w0: &Matrix<T>, h0: &Matrix<T>) -> Result<usize> {
    let rank = check_factor_shapes(v, w0, h0)?;
    v.check_non_negative("V")?;
    w0.check_non_negative("W0")?;
    h0.check_non_negative("H0")?;
    Ok(rank)
}

/// Checks that a tolerance is finite and non-negative.
pub fn check_tolerance<T: Scalar>(name: &str, value: T) -> Result<()> {
    if !value.is_finite() || value < T::zero() {
        return Err(NmfError::invalid_input(format!(
            "{name} must be finite and non-negative, got {value}"
        )));
    }
    Ok(())
}

/// Checks that a parameter is finite and strictly positive.
pub fn check_positive<T: Scalar>(name: &str, value: T) -> Result<()> {
    if !value.is_finite() || value <= T::zero() {
        return Err(NmfError::invalid_input(format!(
            "{name} must be finite and positive, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: usize, cols: usize) -> Matrix<f64> {
        Matrix::from_element(rows, cols, 1.0)
    }

    #[test]
    fn test_compatible_shapes_return_rank() {
        assert_eq!(check_factor_shapes(&m(2, 2), &m(2, 3), &m(3, 2)).unwrap(), 3);
        assert_eq!(validate_problem(&m(4, 5), &m(4, 2), &m(2, 5)).unwrap(), 2);
    }

    #[test]
    fn test_each_mismatch_detected() {
        // W0 rows
        assert!(check_factor_shapes(&m(2, 2), &m(3, 3), &m(3, 2))
            .unwrap_err()
            .is_dimension_mismatch());
        // H0 cols
        assert!(check_factor_shapes(&m(2, 2), &m(2, 3), &m(3, 4))
            .unwrap_err()
            .is_dimension_mismatch());
        // inner rank
        assert!(check_factor_shapes(&m(2, 2), &m(2, 3), &m(2, 2))
            .unwrap_err()
            .is_dimension_mismatch());
        // rank zero
        assert!(check_factor_shapes(&m(2, 2), &m(2, 0), &m(0, 2))
            .unwrap_err()
            .is_dimension_mismatch());
    }

    #[test]
    fn test_shape_checked_before_values() {
        let mut bad = m(3, 3).into_dmatrix();
        bad[(0, 0)] = -1.0;
        let err = validate_problem(&m(2, 2), &Matrix::from(bad), &m(3, 2)).unwrap_err();
        assert!(err.is_dimension_mismatch());
    }

    #[test]
    fn test_negative_and_nan_values() {
        let w0 = Matrix::from_rows(&[[1.0, -1.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let err = validate_problem(&m(2, 2), &w0, &m(3, 2)).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("W0[0, 1]"));

        let v = Matrix::from_rows(&[[f64::NAN, 1.0], [1.0, 1.0]]).unwrap();
        assert!(validate_problem(&v, &m(2, 3), &m(3, 2))
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_parameter_checks() {
        assert!(check_tolerance("tolerance", 0.0).is_ok());
        assert!(check_tolerance("tolerance", -1e-3).is_err());
        assert!(check_tolerance("tolerance", f64::NAN).is_err());
        assert!(check_positive("epsilon", 1e-9).is_ok());
        assert!(check_positive("epsilon", 0.0).is_err());
        assert!(check_positive("epsilon", f64::INFINITY).is_err());
    }
}
