//! Data Processor Module
//! Handles data cleaning, row filtering and grouped aggregation.

use super::loader::{is_numeric_dtype, require_column};
use super::DataError;
use polars::prelude::*;
use std::fmt;
use std::str::FromStr;

/// A scalar used as a filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl CellValue {
    fn to_lit(&self) -> Expr {
        match self {
            CellValue::Int(v) => lit(*v),
            CellValue::Float(v) => lit(*v),
            CellValue::Str(v) => lit(v.clone()),
            CellValue::Bool(v) => lit(*v),
        }
    }

    /// Whether a column of `dtype` can hold this value at all.
    fn comparable_with(&self, dtype: &DataType) -> bool {
        match self {
            CellValue::Int(_) | CellValue::Float(_) => is_numeric_dtype(dtype),
            CellValue::Str(_) => matches!(dtype, DataType::String),
            CellValue::Bool(_) => matches!(dtype, DataType::Boolean),
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(v as i64)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Str(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Str(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

/// Aggregation applied per group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggFunc {
    #[default]
    Mean,
    Sum,
    /// Non-null values only
    Count,
    Min,
    Max,
}

impl AggFunc {
    pub const ALL: [AggFunc; 5] = [
        AggFunc::Mean,
        AggFunc::Sum,
        AggFunc::Count,
        AggFunc::Min,
        AggFunc::Max,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AggFunc::Mean => "mean",
            AggFunc::Sum => "sum",
            AggFunc::Count => "count",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
        }
    }

    fn expr(self, column: &str) -> Expr {
        let c = col(column);
        match self {
            AggFunc::Mean => c.mean(),
            AggFunc::Sum => c.sum(),
            AggFunc::Count => c.count(),
            AggFunc::Min => c.min(),
            AggFunc::Max => c.max(),
        }
    }
}

impl FromStr for AggFunc {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggFunc::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| DataError::InvalidAggregation(s.to_string()))
    }
}

impl fmt::Display for AggFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Remove exact duplicate rows (first occurrence kept), then every row that
/// holds a null or a floating-point NaN. Row order is preserved.
pub fn clean_data(df: &DataFrame) -> Result<DataFrame, DataError> {
    let not_nan = df
        .get_columns()
        .iter()
        .filter(|c| matches!(c.dtype(), DataType::Float32 | DataType::Float64))
        .map(|c| col(c.name().clone()).is_not_nan())
        .reduce(|acc, e| acc.and(e));

    let mut lazy = df
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .drop_nulls(None);
    if let Some(predicate) = not_nan {
        lazy = lazy.filter(predicate);
    }
    let cleaned = lazy.collect()?;

    let dropped = df.height() - cleaned.height();
    if dropped > 0 {
        log::warn!("clean_data dropped {dropped} of {} rows", df.height());
    }
    Ok(cleaned)
}

/// Keep rows where `column` equals `value`.
///
/// A value of a type the column cannot hold (a number against a text column,
/// say) matches nothing, so the result is an empty table with the same schema.
pub fn filter_data(
    df: &DataFrame,
    column: &str,
    value: impl Into<CellValue>,
) -> Result<DataFrame, DataError> {
    let dtype = require_column(df, column)?.dtype();
    let value = value.into();
    if !value.comparable_with(dtype) {
        log::debug!("{value:?} cannot equal a {dtype} value in {column}; no rows match");
        return Ok(df.head(Some(0)));
    }
    log::debug!("filtering on {column} == {value:?}");

    let filtered = df
        .clone()
        .lazy()
        .filter(col(column).eq(value.to_lit()))
        .collect()?;
    Ok(filtered)
}

/// Group by `group_col` and reduce `agg_col` with the named function.
///
/// Output columns: [group_col, agg_col], one row per group, sorted by group.
/// Rows with a null group key belong to no group and are dropped. Every
/// function except `count` needs a numeric `agg_col`. When both names are the
/// same column the result column is named `{agg_col}_{func}`.
pub fn aggregate_data(
    df: &DataFrame,
    group_col: &str,
    agg_col: &str,
    agg_func: &str,
) -> Result<DataFrame, DataError> {
    let func: AggFunc = agg_func.parse()?;
    require_column(df, group_col)?;
    let agg_dtype = require_column(df, agg_col)?.dtype();
    if func != AggFunc::Count && !is_numeric_dtype(agg_dtype) {
        return Err(DataError::InvalidArgument(format!(
            "cannot take the {func} of non-numeric column '{agg_col}' ({agg_dtype})"
        )));
    }
    let output = if agg_col == group_col {
        format!("{agg_col}_{func}")
    } else {
        agg_col.to_string()
    };
    log::debug!("aggregating {agg_col} by {group_col} with {func}");

    let result = df
        .clone()
        .lazy()
        .filter(col(group_col).is_not_null())
        .group_by([col(group_col)])
        .agg([func.expr(agg_col).alias(output.as_str())])
        .sort_by_exprs(vec![col(group_col)], SortMultipleOptions::default())
        .collect()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_csv;

    #[test]
    fn agg_func_parses_known_names() {
        for func in AggFunc::ALL {
            assert_eq!(func.name().parse::<AggFunc>().unwrap(), func);
        }
        assert_eq!(AggFunc::default(), AggFunc::Mean);
    }

    #[test]
    fn agg_func_rejects_unknown_name() {
        let err = "median".parse::<AggFunc>().unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("median"));
    }

    #[test]
    fn clean_drops_nan_floats() {
        let df = DataFrame::new(vec![
            Column::new("k".into(), ["a", "b", "c"]),
            Column::new("v".into(), [1.0, f64::NAN, 3.0]),
        ])
        .unwrap();
        let cleaned = clean_data(&df).unwrap();
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn count_ignores_nulls() {
        let df = parse_csv("g,v\na,1\na,\nb,2\n").unwrap();
        let out = aggregate_data(&df, "g", "v", "count").unwrap();
        let counts: Vec<Option<f64>> = out
            .column("v")
            .unwrap()
            .as_materialized_series()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(counts, vec![Some(1.0), Some(1.0)]);
    }

    #[test]
    fn aggregate_skips_null_group_keys() {
        let df = parse_csv("g,v\na,1\n,5\nb,2\n").unwrap();
        let out = aggregate_data(&df, "g", "v", "sum").unwrap();
        assert_eq!(out.height(), 2);
        let groups: Vec<Option<&str>> = out
            .column("g")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(groups, vec![Some("a"), Some("b")]);
    }

    #[test]
    fn aggregate_group_column_with_itself() {
        let df = parse_csv("g,v\na,1\nb,2\na,3\n").unwrap();
        let out = aggregate_data(&df, "g", "g", "count").unwrap();
        let names: Vec<String> = out
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, ["g", "g_count"]);
        let counts: Vec<Option<f64>> = out
            .column("g_count")
            .unwrap()
            .as_materialized_series()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(counts, vec![Some(2.0), Some(1.0)]);
    }

    #[test]
    fn aggregate_rejects_text_for_numeric_functions() {
        let df = parse_csv("g,name\na,x\nb,y\n").unwrap();
        for func in ["mean", "sum", "min", "max"] {
            let err = aggregate_data(&df, "g", "name", func).unwrap_err();
            assert!(matches!(err, DataError::InvalidArgument(_)), "{func}");
            assert!(err.is_invalid_argument());
        }
        assert_eq!(aggregate_data(&df, "g", "name", "count").unwrap().height(), 2);
    }

    #[test]
    fn filter_with_mismatched_type_matches_nothing() {
        let df = parse_csv("name,score\nada,5\nbob,7\n").unwrap();
        let out = filter_data(&df, "name", 5).unwrap();
        assert_eq!(out.height(), 0);
        assert_eq!(out.schema(), df.schema());

        let out = filter_data(&df, "score", "5").unwrap();
        assert_eq!(out.height(), 0);

        assert_eq!(filter_data(&df, "score", 7.0).unwrap().height(), 1);
    }
}
