//! Factorizes the product of two known matrices from a perturbed start.
//!
//! Run with: `RUST_LOG=debug cargo run --example factorize_product`

use nmf::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let w1 = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])?;
    let h1 = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])?;
    let v = w1.matmul(&h1)?;

    let w2 = Matrix::from_rows(&[[1.0, 1.0, 3.0], [4.0, 5.0, 6.0]])?;
    let h2 = Matrix::from_rows(&[[1.0, 1.0], [3.0, 4.0], [5.0, 6.0]])?;

    let (w, h) = factorize(&v, &w2, &h2, 0.001, 10, 10)?;
    log::info!(
        "reconstruction error {} (initial {})",
        reconstruction_error(&v, &w, &h)?,
        reconstruction_error(&v, &w2, &h2)?
    );

    println!("W =");
    print!("{w}");
    println!("H =");
    print!("{h}");

    Ok(())
}
