//! NMF Optimization - Factorization algorithms for non-negative matrices.
//!
//! Every algorithm in this crate refines initial factors `W0 (m x k)` and
//! `H0 (k x n)` so that `W * H` approximates a non-negative target
//! `V (m x n)` under the squared Frobenius loss, keeping both factors
//! non-negative throughout.
//!
//! # Available Factorizers
//!
//! - **Multiplicative Update**: Lee & Seung element-wise rescaling
//! - **Projected Gradient**: alternating non-negative least squares with
//!   Armijo step search (Lin)
//!
//! Initial factors come either from the caller or from an
//! [`Initialisation`] strategy.
//!
//! # Examples
//!
//! ```rust
//! use nmf_core::Matrix;
//! use nmf_optim::{Factorizer, Initialisation, ProjectedGradient, ProjectedGradientConfig};
//!
//! let v = Matrix::from_rows(&[[22.0, 28.0], [49.0, 64.0]]).unwrap();
//!
//! let mut pg = ProjectedGradient::new(
//!     ProjectedGradientConfig::new()
//!         .with_tolerance(1e-4)
//!         .with_max_iterations(50),
//! );
//! let result = pg.factorize_from(&v, 2, &Initialisation::random(42)).unwrap();
//!
//! assert!(result.w.is_non_negative() && result.h.is_non_negative());
//! assert!(result.error <= result.initial_error);
//! ```

pub mod factorizer;
pub mod initialisation;
pub mod multiplicative;
pub mod projected_gradient;

pub use factorizer::{FactorizationResult, Factorizer, TerminationReason};
pub use initialisation::Initialisation;
pub use multiplicative::{factorize, MultiplicativeUpdate, MultiplicativeUpdateConfig};
pub use projected_gradient::{ProjectedGradient, ProjectedGradientConfig};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::factorizer::{FactorizationResult, Factorizer, TerminationReason};
    pub use crate::initialisation::Initialisation;
    pub use crate::multiplicative::{factorize, MultiplicativeUpdate, MultiplicativeUpdateConfig};
    pub use crate::projected_gradient::{ProjectedGradient, ProjectedGradientConfig};
}
