//! # NMF
//!
//! Non-negative matrix factorization: approximate a non-negative matrix
//! `V (m x n)` by the product of two non-negative factors `W (m x k)` and
//! `H (k x n)`.
//!
//! ## Overview
//!
//! - **Matrix type**: a small owned dense matrix over `f32` or `f64`
//! - **Factorizers**: multiplicative updates and projected-gradient
//!   alternating least squares
//! - **Initialisation**: caller-provided, seeded random, or SVD-based
//!   factors for a chosen rank
//!
//! ## Quick Start
//!
//! ```rust
//! use nmf::prelude::*;
//!
//! let w1 = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])?;
//! let h1 = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])?;
//! let v = w1.matmul(&h1)?;
//!
//! let w2 = Matrix::from_rows(&[[1.0, 1.0, 3.0], [4.0, 5.0, 6.0]])?;
//! let h2 = Matrix::from_rows(&[[1.0, 1.0], [3.0, 4.0], [5.0, 6.0]])?;
//!
//! let (w, h) = factorize(&v, &w2, &h2, 0.001, 10, 10)?;
//! assert!(reconstruction_error(&v, &w, &h)? < reconstruction_error(&v, &w2, &h2)?);
//! # Ok::<(), nmf::NmfError>(())
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): column-parallel matrix products for large operands
//! - `serde`: serialization of matrices and configurations

pub use nmf_core::{self, Matrix, NmfError, Result, Scalar};
pub use nmf_optim::{self, factorize, FactorizationResult, Factorizer, Initialisation};

// Re-export nalgebra for convenience
pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use nmf_core::prelude::*;
    pub use nmf_optim::prelude::*;
}
