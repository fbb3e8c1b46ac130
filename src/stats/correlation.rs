//! Pairwise correlation of numeric columns.

use super::calculator::StatsCalculator;
use crate::data::{column_f64, numeric_columns, DataError};
use polars::prelude::DataFrame;
use rayon::prelude::*;

/// Square Pearson matrix; `values[i][j]` pairs `columns[i]` with `columns[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        Some(self.values[i][j])
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Correlate every numeric column against every other, using rows where
/// both values are present.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix, DataError> {
    let columns = numeric_columns(df);
    let data = columns
        .iter()
        .map(|name| column_f64(df, name))
        .collect::<Result<Vec<_>, _>>()?;

    let values = (0..columns.len())
        .into_par_iter()
        .map(|i| {
            (0..columns.len())
                .map(|j| {
                    let r = StatsCalculator::pearson(&data[i], &data[j]);
                    if i == j && !r.is_nan() {
                        1.0
                    } else {
                        r
                    }
                })
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix { columns, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_csv;

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let df = parse_csv("x,y,label,z\n1,2,a,9\n2,4,b,7\n3,7,c,8\n4,8,d,1\n").unwrap();
        let corr = correlation_matrix(&df).unwrap();
        assert_eq!(corr.columns, vec!["x", "y", "z"]);
        for i in 0..3 {
            assert_eq!(corr.values[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(corr.values[i][j], corr.values[j][i]);
            }
        }
        assert!(corr.get("x", "y").unwrap() > 0.9);
        assert!(corr.get("x", "label").is_none());
    }

    #[test]
    fn no_numeric_columns_gives_empty_matrix() {
        let df = parse_csv("a,b\nx,y\n").unwrap();
        assert!(correlation_matrix(&df).unwrap().is_empty());
    }
}
