//! CSV Data Loader Module
//! Handles CSV file loading and column extraction using Polars.

use super::DataError;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

/// Rows scanned when inferring column types.
const INFER_SCHEMA_ROWS: usize = 10000;

fn csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
}

/// Load a CSV file using Polars.
///
/// A path that does not name a file yields [`DataError::NotFound`]; anything
/// Polars cannot parse yields [`DataError::Parse`].
pub fn load_data(file_path: impl AsRef<Path>) -> Result<DataFrame, DataError> {
    let file_path = file_path.as_ref();
    if !file_path.is_file() {
        return Err(DataError::NotFound {
            path: file_path.to_path_buf(),
        });
    }

    let df = csv_options()
        .try_into_reader_with_file_path(Some(file_path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| DataError::Parse {
            path: file_path.display().to_string(),
            source,
        })?;

    log::info!(
        "loaded {} ({} rows x {} columns)",
        file_path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Parse CSV text already held in memory.
pub fn parse_csv(content: &str) -> Result<DataFrame, DataError> {
    let cursor = Cursor::new(content.as_bytes().to_vec());
    csv_options()
        .into_reader_with_file_handle(cursor)
        .finish()
        .map_err(|source| DataError::Parse {
            path: "<memory>".to_string(),
            source,
        })
}

/// Look up a column, mapping a miss to [`DataError::ColumnNotFound`].
pub fn require_column<'a>(df: &'a DataFrame, column: &str) -> Result<&'a Column, DataError> {
    df.column(column)
        .map_err(|_| DataError::ColumnNotFound(column.to_string()))
}

pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Get list of numeric column names, in table order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

/// Values of a column as `f64`. Nulls, NaN and unparseable strings become `None`.
pub fn column_f64(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>, DataError> {
    let series = require_column(df, column)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let values = series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Values of a column rendered as strings. Nulls stay `None`.
pub fn column_strings(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>, DataError> {
    let series = require_column(df, column)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Distinct non-null values of a column with their counts, in order of
/// first appearance.
pub fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<(String, usize)>, DataError> {
    require_column(df, column)?;
    let counts = df
        .clone()
        .lazy()
        .select([col(column).cast(DataType::String).alias("value")])
        .drop_nulls(None)
        .group_by_stable([col("value")])
        .agg([len().alias("count")])
        .collect()?;

    let values = counts.column("value")?.str()?;
    let totals = counts.column("count")?.cast(&DataType::UInt64)?;
    let pairs = values
        .into_iter()
        .zip(totals.u64()?)
        .filter_map(|(value, n)| Some((value?.to_string(), n? as usize)))
        .collect();
    Ok(pairs)
}

/// Values of `columns` as `f64`, grouped by the text form of `key`.
///
/// Rows with a null key, or a null or NaN in any of `columns`, are skipped.
/// Groups come in order of first appearance; each holds one vector per
/// requested column, all of the same length.
pub fn grouped_f64(
    df: &DataFrame,
    key: &str,
    columns: &[&str],
) -> Result<Vec<(String, Vec<Vec<f64>>)>, DataError> {
    require_column(df, key)?;
    let value_names: Vec<String> = (0..columns.len()).map(|i| format!("v{i}")).collect();
    let mut selected = vec![col(key).cast(DataType::String).alias("key")];
    let mut keep = col("key").is_not_null();
    for (column, name) in columns.iter().zip(&value_names) {
        require_column(df, column)?;
        selected.push(col(*column).cast(DataType::Float64).alias(name.as_str()));
        keep = keep
            .and(col(name.as_str()).is_not_null())
            .and(col(name.as_str()).is_not_nan());
    }

    let grouped = df
        .clone()
        .lazy()
        .select(selected)
        .filter(keep)
        .group_by_stable([col("key")])
        .agg(value_names.iter().map(|name| col(name.as_str())).collect::<Vec<_>>())
        .collect()?;

    let keys = grouped.column("key")?.str()?;
    let lists = value_names
        .iter()
        .map(|name| Ok(grouped.column(name)?.as_materialized_series().list()?.clone()))
        .collect::<Result<Vec<ListChunked>, DataError>>()?;

    let mut groups = Vec::with_capacity(grouped.height());
    for (row, key) in keys.into_iter().enumerate() {
        let Some(key) = key else { continue };
        let mut values = Vec::with_capacity(lists.len());
        for list in &lists {
            let column_values = match list.get_as_series(row) {
                Some(series) => series.f64()?.into_iter().flatten().collect(),
                None => Vec::new(),
            };
            values.push(column_values);
        }
        groups.push((key.to_string(), values));
    }
    Ok(groups)
}
