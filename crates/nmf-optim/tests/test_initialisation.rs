//! Factorizing from generated initial factors.

use nmf_core::{
    utils::test_helpers::{init_logging, low_rank_scenario},
    Matrix,
};
use nmf_optim::{
    Factorizer, Initialisation, MultiplicativeUpdate, MultiplicativeUpdateConfig,
    ProjectedGradient,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

proptest! {
    #[test]
    fn random_factors_are_positive_and_shaped(
        m in 1usize..6,
        n in 1usize..6,
        rank in 1usize..4,
        seed in any::<u64>(),
    ) {
        let v = Matrix::from_fn(m, n, |i, j| (i + 2 * j) as f64);
        let (w, h) = Initialisation::random(seed).initialise(&v, rank).unwrap();

        prop_assert_eq!(w.shape(), (m, rank));
        prop_assert_eq!(h.shape(), (rank, n));
        prop_assert!(w.iter().chain(h.iter()).all(|&x| x > 0.0));
    }
}

#[test]
fn all_zero_target_still_gets_positive_factors() {
    let v = Matrix::<f64>::zeros(3, 2);
    let (w, h) = Initialisation::random(5).initialise(&v, 2).unwrap();
    assert!(w.iter().chain(h.iter()).all(|&x| x > 0.0 && x < 1e-7));
}

#[test]
fn multiplicative_update_from_random_start() {
    init_logging();
    let s = low_rank_scenario::<f64>(8, 6, 2);
    let mut mu = MultiplicativeUpdate::new(
        MultiplicativeUpdateConfig::new()
            .with_tolerance(1e-6)
            .with_max_outer_iterations(300),
    );

    let result = mu
        .factorize_from(&s.v, 2, &Initialisation::random(2024))
        .unwrap();

    assert_eq!(result.rank(), 2);
    assert!(result.error < result.initial_error);
}

#[test]
fn projected_gradient_from_svd_start() {
    init_logging();
    let s = low_rank_scenario::<f64>(6, 5, 2);
    let mut pg = ProjectedGradient::<f64>::default();

    let result = pg.factorize_from(&s.v, 2, &Initialisation::Svd).unwrap();

    assert_eq!(result.w.shape(), (6, 2));
    assert_eq!(result.h.shape(), (2, 5));
    assert!(result.w.is_non_negative() && result.h.is_non_negative());
    assert!(result.error <= result.initial_error);
}

#[test]
fn provided_factors_with_wrong_rank_are_rejected() {
    let s = low_rank_scenario::<f64>(4, 3, 2);
    let init = Initialisation::provided(s.w0.clone(), s.h0.clone());
    let mut mu = MultiplicativeUpdate::<f64>::default();

    assert!(mu.factorize_from(&s.v, 2, &init).is_ok());
    assert!(mu
        .factorize_from(&s.v, 3, &init)
        .unwrap_err()
        .is_dimension_mismatch());
}
