//! Behavioural tests for the projected-gradient factorizer.

use nmf_core::{
    reconstruction_error,
    utils::test_helpers::{init_logging, low_rank_scenario, product_scenario},
    Matrix,
};
use nmf_optim::{Factorizer, ProjectedGradient, ProjectedGradientConfig, TerminationReason};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn solver(tolerance: f64, max_iterations: usize) -> ProjectedGradient<f64> {
    ProjectedGradient::new(
        ProjectedGradientConfig::new()
            .with_tolerance(tolerance)
            .with_max_iterations(max_iterations),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn factors_stay_non_negative(
        (v, w0, h0) in (1usize..5, 1usize..5, 1usize..4).prop_flat_map(|(m, n, k)| (
            prop::collection::vec(0.0..10.0_f64, m * n),
            prop::collection::vec(0.01..5.0_f64, m * k),
            prop::collection::vec(0.01..5.0_f64, k * n),
        ).prop_map(move |(v, w, h)| (
            Matrix::from_row_slice(m, n, &v).unwrap(),
            Matrix::from_row_slice(m, k, &w).unwrap(),
            Matrix::from_row_slice(k, n, &h).unwrap(),
        )))
    ) {
        let result = solver(1e-4, 10).factorize(&v, &w0, &h0).unwrap();
        prop_assert!(result.w.is_non_negative());
        prop_assert!(result.h.is_non_negative());
        prop_assert_eq!(result.w.shape(), w0.shape());
        prop_assert_eq!(result.h.shape(), h0.shape());
        prop_assert!(result.error <= result.initial_error * (1.0 + 1e-9) + 1e-9);
    }
}

#[test]
fn product_scenario_converges() {
    init_logging();
    let s = product_scenario::<f64>();
    let result = solver(1e-3, 100).factorize(&s.v, &s.w0, &s.h0).unwrap();

    assert_eq!(result.termination_reason, TerminationReason::Converged);
    assert!(result.error < result.initial_error);
    assert!(result.error < 0.1);
}

#[test]
fn low_rank_target_is_recovered() {
    init_logging();
    let s = low_rank_scenario::<f64>(6, 5, 2);
    let result = solver(1e-6, 200).factorize(&s.v, &s.w0, &s.h0).unwrap();

    assert!(result.converged);
    assert!(result.error < 1e-2);
    assert_eq!(
        reconstruction_error(&s.v, &result.w, &result.h).unwrap(),
        result.error
    );
}

#[test]
fn error_history_is_non_increasing() {
    let s = low_rank_scenario::<f64>(6, 5, 2);
    let result = solver(0.0, 20).factorize(&s.v, &s.w0, &s.h0).unwrap();

    for pair in result.error_history.windows(2) {
        assert!(pair[1] <= pair[0] * (1.0 + 1e-9) + 1e-12);
    }
}

#[test]
fn zero_iterations_returns_copies() {
    let s = product_scenario::<f64>();
    let result = solver(1e-3, 0).factorize(&s.v, &s.w0, &s.h0).unwrap();

    assert_eq!(result.w, s.w0);
    assert_eq!(result.h, s.h0);
    assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
}

#[test]
fn preconditions_match_multiplicative_update() {
    let s = product_scenario::<f64>();

    let w0 = Matrix::from_element(3, 3, 1.0);
    let err = solver(1e-3, 10).factorize(&s.v, &w0, &s.h0).unwrap_err();
    assert!(err.is_dimension_mismatch());

    let h0 = Matrix::from_rows(&[[1.0, 1.0], [3.0, f64::NAN], [5.0, 6.0]]).unwrap();
    let err = solver(1e-3, 10).factorize(&s.v, &s.w0, &h0).unwrap_err();
    assert!(err.is_invalid_input());

    let err = solver(-1.0, 10).factorize(&s.v, &s.w0, &s.h0).unwrap_err();
    assert!(err.is_invalid_input());
}
