//! Error types for chart rendering

use crate::data::DataError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VizError {
    #[error("Column '{0}' not found in DataFrame.")]
    ColumnNotFound(String),

    #[error("Invalid plot configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Rendering error: {0}")]
    Rendering(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

impl VizError {
    /// True for bad columns and bad options, as opposed to drawing or I/O failures.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            VizError::ColumnNotFound(_) | VizError::InvalidConfiguration(_) => true,
            VizError::Data(e) => e.is_invalid_argument(),
            _ => false,
        }
    }
}
