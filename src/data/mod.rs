//! Data module - CSV loading, cleaning, filtering and aggregation

mod error;
mod loader;
mod processor;
mod sample;

pub use error::DataError;
pub use loader::{
    column_f64, column_strings, grouped_f64, is_numeric_dtype, load_data, numeric_columns,
    parse_csv, require_column, value_counts,
};
pub use processor::{aggregate_data, clean_data, filter_data, AggFunc, CellValue};
pub use sample::{create_sample_data, create_sample_data_with_seed, DEFAULT_SEED};
