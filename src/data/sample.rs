//! Synthetic sample data for demos and tests.

use super::DataError;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

pub const DEFAULT_SEED: u64 = 42;
pub const SAMPLE_CATEGORIES: [&str; 3] = ["A", "B", "C"];

/// Create a sample table with the default seed.
///
/// Columns: `category` (A/B/C), `value` ~ N(100, 15), `count` in [1, 100).
pub fn create_sample_data(n_rows: usize) -> Result<DataFrame, DataError> {
    create_sample_data_with_seed(n_rows, DEFAULT_SEED)
}

pub fn create_sample_data_with_seed(n_rows: usize, seed: u64) -> Result<DataFrame, DataError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal =
        Normal::new(100.0, 15.0).map_err(|e| DataError::InvalidArgument(e.to_string()))?;

    let categories: Vec<&str> = (0..n_rows)
        .map(|_| SAMPLE_CATEGORIES[rng.gen_range(0..SAMPLE_CATEGORIES.len())])
        .collect();
    let values: Vec<f64> = (0..n_rows).map(|_| normal.sample(&mut rng)).collect();
    let counts: Vec<i64> = (0..n_rows).map(|_| rng.gen_range(1..100)).collect();

    let df = DataFrame::new(vec![
        Column::new("category".into(), categories),
        Column::new("value".into(), values),
        Column::new("count".into(), counts),
    ])?;
    log::debug!("generated {n_rows} sample rows with seed {seed}");
    Ok(df)
}
