//! Utility functions and helper types.

pub mod parallel_thresholds;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;

// Re-export utilities
pub use parallel_thresholds::*;
