//! The column-parallel product must give bit-identical results to the
//! sequential path.
//!
//! This binary forces the parallel path for every product by installing
//! zero thresholds before the first multiplication.

use nmf_core::{
    utils::parallel_thresholds::{parallel_thresholds, set_parallel_thresholds, ParallelThresholdsBuilder},
    Matrix,
};

fn force_parallel() {
    let _ = set_parallel_thresholds(
        ParallelThresholdsBuilder::new()
            .product_threshold(0)
            .min_columns(1)
            .num_threads(4)
            .build(),
    );
}

fn filled(rows: usize, cols: usize, salt: f64) -> Matrix<f64> {
    Matrix::from_fn(rows, cols, |i, j| {
        ((i as f64 + 1.0) * 0.37 + (j as f64) * 1.13 + salt).sin().abs()
    })
}

#[test]
fn parallel_and_sequential_products_are_identical() {
    force_parallel();
    assert!(parallel_thresholds().should_parallelize_product(2, 2, 2) || !cfg!(feature = "parallel"));

    let a = filled(37, 19, 0.5);
    let b = filled(19, 23, 1.5);
    let product = a.matmul(&b).unwrap();

    for j in 0..b.ncols() {
        let column = a.as_dmatrix() * b.as_dmatrix().column(j);
        for i in 0..a.nrows() {
            assert_eq!(product[(i, j)].to_bits(), column[i].to_bits());
        }
    }
}

#[test]
fn parallel_product_of_empty_operands() {
    force_parallel();

    let a = Matrix::<f64>::zeros(3, 0);
    let b = Matrix::<f64>::zeros(0, 4);
    let product = a.matmul(&b).unwrap();
    assert_eq!(product.shape(), (3, 4));
    assert!(product.iter().all(|&x| x == 0.0));
}
