//! Whole-table summary: shape, missing cells, dtypes and per-column statistics.

use super::calculator::{ColumnStats, StatsCalculator};
use crate::data::{column_f64, is_numeric_dtype, DataError};
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub rows: usize,
    pub columns: usize,
    /// Null cells plus NaN floats
    pub missing_values: usize,
    pub dtypes: BTreeMap<String, String>,
    pub numeric_stats: BTreeMap<String, ColumnStats>,
}

fn missing_in(column: &Column) -> Result<usize, DataError> {
    let nulls = column.null_count();
    let nans = match column.dtype() {
        DataType::Float32 | DataType::Float64 => {
            let series = column.as_materialized_series().cast(&DataType::Float64)?;
            series.f64()?.into_iter().flatten().filter(|v| v.is_nan()).count()
        }
        _ => 0,
    };
    Ok(nulls + nans)
}

/// Generate summary statistics for a table.
///
/// Numeric column statistics are computed in parallel.
pub fn summarize_data(df: &DataFrame) -> Result<DataSummary, DataError> {
    let mut missing_values = 0;
    let mut dtypes = BTreeMap::new();
    for column in df.get_columns() {
        missing_values += missing_in(column)?;
        dtypes.insert(column.name().to_string(), column.dtype().to_string());
    }

    let numeric: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| is_numeric_dtype(c.dtype()))
        .map(|c| c.name().to_string())
        .collect();

    let numeric_stats = numeric
        .par_iter()
        .map(|name| {
            let values: Vec<f64> = column_f64(df, name)?.into_iter().flatten().collect();
            Ok((name.clone(), StatsCalculator::compute_descriptive_stats(&values)))
        })
        .collect::<Result<BTreeMap<_, _>, DataError>>()?;

    Ok(DataSummary {
        rows: df.height(),
        columns: df.width(),
        missing_values,
        dtypes,
        numeric_stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_csv;

    #[test]
    fn summary_counts_missing_cells() {
        let df = parse_csv("a,b,c\n1,x,1.5\n,y,\n3,,2.5\n").unwrap();
        let summary = summarize_data(&df).unwrap();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.columns, 3);
        assert_eq!(summary.missing_values, 3);
        assert_eq!(summary.dtypes["b"], "str");
        assert_eq!(summary.numeric_stats["a"].count, 2);
        assert_eq!(summary.numeric_stats["c"].mean, 2.0);
        assert!(!summary.numeric_stats.contains_key("b"));
    }

    #[test]
    fn summary_counts_nan_as_missing() {
        let df = DataFrame::new(vec![Column::new("v".into(), [1.0, f64::NAN])]).unwrap();
        let summary = summarize_data(&df).unwrap();
        assert_eq!(summary.missing_values, 1);
        assert_eq!(summary.numeric_stats["v"].count, 1);
    }

    #[test]
    fn summary_serializes_to_json() {
        let df = parse_csv("a\n1\n2\n").unwrap();
        let json = serde_json::to_value(summarize_data(&df).unwrap()).unwrap();
        assert_eq!(json["rows"], 2);
        assert_eq!(json["numeric_stats"]["a"]["max"], 2.0);
    }
}
