//! Scalar trait and numerical constants.
//!
//! Factorizations run in either `f32` or `f64`. The [`Scalar`] trait bundles
//! the nalgebra field traits the algorithms rely on together with a few
//! precision-dependent defaults.

use nalgebra::{DMatrix as NalgebraDMatrix, DVector as NalgebraDVector, RealField};
use std::fmt::{Debug, Display};

/// Trait for scalar types used in factorization (f32 or f64).
pub trait Scalar: RealField + Copy + Display + Debug + Default + Send + Sync + 'static {
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Default reconstruction-error tolerance.
    const DEFAULT_TOLERANCE: Self;

    /// Default value added to update denominators to avoid division by zero.
    const DIVISION_EPSILON: Self;

    /// Convert from f64 (for constants).
    fn from_f64(v: f64) -> Self {
        nalgebra::convert(v)
    }

    /// Convert from usize (for counts used in arithmetic).
    #[allow(clippy::cast_precision_loss)]
    fn from_usize(v: usize) -> Self {
        nalgebra::convert(v as f64)
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const DEFAULT_TOLERANCE: Self = 1e-3;
    const DIVISION_EPSILON: Self = 1e-9;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const DEFAULT_TOLERANCE: Self = 1e-3;
    const DIVISION_EPSILON: Self = 1e-9;
}

/// Type alias for the dynamically-sized nalgebra matrix backing [`crate::Matrix`].
pub type DMatrix<T> = NalgebraDMatrix<T>;

/// Type alias for a dynamically-sized nalgebra vector.
pub type DVector<T> = NalgebraDVector<T>;

/// Numerical constants for different precision levels.
pub mod constants {
    use super::Scalar;

    /// Get machine epsilon for the given scalar type.
    pub fn epsilon<T: Scalar>() -> T {
        T::EPSILON
    }

    /// Get default reconstruction-error tolerance.
    pub fn default_tolerance<T: Scalar>() -> T {
        T::DEFAULT_TOLERANCE
    }

    /// Get default denominator stabilizer.
    pub fn division_epsilon<T: Scalar>() -> T {
        T::DIVISION_EPSILON
    }
}
