//! Data module errors.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("File {} not found.", path.display())]
    NotFound { path: PathBuf },
    #[error("Error parsing CSV file: {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: PolarsError,
    },
    #[error("Column '{0}' not found in DataFrame.")]
    ColumnNotFound(String),
    #[error("agg_func must be one of [mean, sum, count, min, max], got '{0}'")]
    InvalidAggregation(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl DataError {
    /// True for the "resource not found" kind (bad file path).
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound { .. })
    }

    /// True for the "invalid argument" kind: missing column, unsupported
    /// aggregation, unparseable input.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            DataError::Parse { .. }
                | DataError::ColumnNotFound(_)
                | DataError::InvalidAggregation(_)
                | DataError::InvalidArgument(_)
        )
    }
}
