//! Chartify Utils - CSV data helpers and static charts
//!
//! Two leaf modules sharing the Polars [`DataFrame`](polars::prelude::DataFrame)
//! as their table type:
//!
//! - [`data`]: load, clean, filter, aggregate and generate sample tables
//! - [`charts`]: distribution, scatter, box, heatmap and count plots
//!
//! [`stats`] holds the numeric helpers both of them lean on.

pub mod charts;
pub mod data;
pub mod stats;

pub use charts::{setup_style, ChartHandle, ChartPlotter, ChartStyle, Orientation, VizError};
pub use data::{
    aggregate_data, clean_data, create_sample_data, create_sample_data_with_seed, filter_data,
    load_data, AggFunc, CellValue, DataError,
};
pub use stats::{summarize_data, DataSummary};
