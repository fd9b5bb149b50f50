//! Benchmarks comparing the factorization algorithms
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nmf_core::utils::test_helpers::low_rank_scenario;
use nmf_optim::{
    Factorizer, MultiplicativeUpdate, MultiplicativeUpdateConfig, ProjectedGradient,
    ProjectedGradientConfig,
};

fn benchmark_factorizers(c: &mut Criterion) {
    let mut group = c.benchmark_group("factorizers");

    for &size in &[10, 50, 200] {
        let s = low_rank_scenario::<f64>(size, size, 5);

        group.bench_with_input(BenchmarkId::new("multiplicative", size), &size, |b, _| {
            b.iter(|| {
                let mut mu = MultiplicativeUpdate::new(
                    MultiplicativeUpdateConfig::new()
                        .with_tolerance(0.0)
                        .with_max_outer_iterations(20),
                );
                mu.factorize(black_box(&s.v), black_box(&s.w0), black_box(&s.h0))
            });
        });

        group.bench_with_input(BenchmarkId::new("projected_gradient", size), &size, |b, _| {
            b.iter(|| {
                let mut pg = ProjectedGradient::new(
                    ProjectedGradientConfig::new()
                        .with_tolerance(0.0)
                        .with_max_iterations(5),
                );
                pg.factorize(black_box(&s.v), black_box(&s.w0), black_box(&s.h0))
            });
        });
    }

    group.finish();
}

fn benchmark_inner_passes(c: &mut Criterion) {
    let mut group = c.benchmark_group("inner_passes");
    let s = low_rank_scenario::<f64>(100, 80, 4);

    for &inner in &[1, 5, 10] {
        group.bench_with_input(BenchmarkId::from_parameter(inner), &inner, |b, &inner| {
            b.iter(|| {
                let mut mu = MultiplicativeUpdate::new(
                    MultiplicativeUpdateConfig::new()
                        .with_tolerance(0.0)
                        .with_max_outer_iterations(10)
                        .with_max_inner_iterations(inner),
                );
                mu.factorize(black_box(&s.v), black_box(&s.w0), black_box(&s.h0))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_factorizers, benchmark_inner_passes);
criterion_main!(benches);
