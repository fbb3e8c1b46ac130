//! Stats module - descriptive statistics and table summaries

mod calculator;
mod correlation;
mod summary;

pub use calculator::{BoxStats, ColumnStats, HistogramBin, StatsCalculator, WHISKER_IQR};
pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use summary::{summarize_data, DataSummary};
