//! Chart Plotter Module
//! Validates chart requests against a table, prepares the data and renders it.

use super::renderer::{
    render_figure, BoxFigure, CountFigure, Figure, HeatmapFigure, HistogramFigure, ScatterFigure,
};
use super::style::{setup_style, ChartStyle, Colormap};
use super::VizError;
use crate::data::{column_f64, grouped_f64, value_counts};
use crate::stats::{correlation_matrix, BoxStats, StatsCalculator};
use polars::prelude::DataFrame;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default histogram bin count
pub const DEFAULT_BINS: usize = 30;
/// Points on which the density curve is evaluated
const KDE_POINTS: usize = 200;

const FIGURE_SIZE: (u32, u32) = (1000, 600);
const HEATMAP_SIZE: (u32, u32) = (1000, 800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Distribution,
    Scatter,
    BoxPlot,
    Heatmap,
    Categorical,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Distribution => "distribution",
            ChartKind::Scatter => "scatter",
            ChartKind::BoxPlot => "box",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Categorical => "count",
        };
        f.write_str(name)
    }
}

/// Bar direction of a count plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl FromStr for Orientation {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v" | "vertical" => Ok(Orientation::Vertical),
            "h" | "horizontal" => Ok(Orientation::Horizontal),
            other => Err(VizError::InvalidConfiguration(format!(
                "orientation must be 'v' or 'h', got '{other}'"
            ))),
        }
    }
}

/// Describes a rendered chart: where it went and how its axes are labelled.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHandle {
    pub kind: ChartKind,
    pub path: PathBuf,
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub width: u32,
    pub height: u32,
}

fn require(df: &DataFrame, column: &str) -> Result<(), VizError> {
    if df.column(column).is_err() {
        return Err(VizError::ColumnNotFound(column.to_string()));
    }
    Ok(())
}

/// Renders the supported chart kinds with a shared [`ChartStyle`].
pub struct ChartPlotter {
    style: ChartStyle,
}

impl Default for ChartPlotter {
    fn default() -> Self {
        Self::new(setup_style())
    }
}

impl ChartPlotter {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    fn render(
        &self,
        figure: &impl Figure,
        output: &Path,
        default_size: (u32, u32),
        kind: ChartKind,
        title: String,
        (x_label, y_label): (Option<String>, Option<String>),
    ) -> Result<ChartHandle, VizError> {
        let (width, height) = self.style.size_or(default_size);
        render_figure(figure, output, (width, height), &self.style)?;
        log::info!("wrote {kind} chart to {}", output.display());

        Ok(ChartHandle {
            kind,
            path: output.to_path_buf(),
            title,
            x_label,
            y_label,
            width,
            height,
        })
    }

    /// Histogram of one column with a kernel density overlay.
    ///
    /// Title defaults to `"Distribution of {column}"`.
    pub fn plot_distribution(
        &self,
        df: &DataFrame,
        column: &str,
        title: Option<&str>,
        bins: usize,
        output: impl AsRef<Path>,
    ) -> Result<ChartHandle, VizError> {
        require(df, column)?;
        if bins == 0 {
            return Err(VizError::InvalidConfiguration(
                "bins must be at least 1".to_string(),
            ));
        }

        let values: Vec<f64> = column_f64(df, column)?.into_iter().flatten().collect();
        if values.is_empty() {
            return Err(VizError::InvalidConfiguration(format!(
                "Column '{column}' has no numeric values"
            )));
        }

        let hist = StatsCalculator::histogram(&values, bins);
        let (lo, hi) = match (hist.first(), hist.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => (0.0, 1.0),
        };
        let bin_width = (hi - lo) / bins as f64;
        let grid: Vec<f64> = (0..KDE_POINTS)
            .map(|i| lo + (hi - lo) * i as f64 / (KDE_POINTS - 1) as f64)
            .collect();
        // Scale density so its area matches the histogram's
        let scale = values.len() as f64 * bin_width;
        let kde = StatsCalculator::gaussian_kde(&values, &grid)
            .into_iter()
            .map(|(x, d)| (x, d * scale))
            .collect();

        let title = title
            .map(str::to_string)
            .unwrap_or_else(|| format!("Distribution of {column}"));
        let figure = HistogramFigure {
            title: title.clone(),
            x_label: column.to_string(),
            bins: hist,
            kde,
        };
        self.render(
            &figure,
            output.as_ref(),
            FIGURE_SIZE,
            ChartKind::Distribution,
            title,
            (Some(column.to_string()), Some("Frequency".to_string())),
        )
    }

    /// Scatter plot of `y` against `x`, optionally coloured by `hue`.
    ///
    /// Title defaults to `"{y} vs {x}"`.
    pub fn plot_scatter(
        &self,
        df: &DataFrame,
        x: &str,
        y: &str,
        hue: Option<&str>,
        title: Option<&str>,
        output: impl AsRef<Path>,
    ) -> Result<ChartHandle, VizError> {
        require(df, x)?;
        require(df, y)?;
        if let Some(hue) = hue {
            require(df, hue)?;
        }

        let groups: Vec<(Option<String>, Vec<(f64, f64)>)> = match hue {
            Some(hue) => grouped_f64(df, hue, &[x, y])?
                .into_iter()
                .map(|(key, columns)| {
                    let points = match columns.as_slice() {
                        [xs, ys] => xs.iter().copied().zip(ys.iter().copied()).collect(),
                        _ => Vec::new(),
                    };
                    (Some(key), points)
                })
                .collect(),
            None => {
                let points: Vec<(f64, f64)> = column_f64(df, x)?
                    .into_iter()
                    .zip(column_f64(df, y)?)
                    .filter_map(|(px, py)| Some((px?, py?)))
                    .collect();
                if points.is_empty() {
                    Vec::new()
                } else {
                    vec![(None, points)]
                }
            }
        };
        if groups.is_empty() {
            return Err(VizError::InvalidConfiguration(format!(
                "No rows with numeric values in both '{x}' and '{y}'"
            )));
        }

        let title = title
            .map(str::to_string)
            .unwrap_or_else(|| format!("{y} vs {x}"));
        let figure = ScatterFigure {
            title: title.clone(),
            x_label: x.to_string(),
            y_label: y.to_string(),
            groups,
        };
        self.render(
            &figure,
            output.as_ref(),
            FIGURE_SIZE,
            ChartKind::Scatter,
            title,
            (Some(x.to_string()), Some(y.to_string())),
        )
    }

    /// Box plot of `y` per category of `x`, or of a single column when only
    /// one of them is given.
    ///
    /// Title defaults to `"{y} by {x}"`, or `"Box Plot of {column}"`.
    pub fn plot_boxplot(
        &self,
        df: &DataFrame,
        x: Option<&str>,
        y: Option<&str>,
        title: Option<&str>,
        output: impl AsRef<Path>,
    ) -> Result<ChartHandle, VizError> {
        for column in [x, y].into_iter().flatten() {
            require(df, column)?;
        }

        let boxes: Vec<(String, BoxStats)> = match (x, y) {
            (Some(x), Some(y)) => grouped_f64(df, x, &[y])?
                .into_iter()
                .filter_map(|(key, mut columns)| {
                    let values = columns.pop()?;
                    Some((key, BoxStats::from_values(&values)?))
                })
                .collect(),
            (Some(column), None) | (None, Some(column)) => {
                let values: Vec<f64> = column_f64(df, column)?.into_iter().flatten().collect();
                BoxStats::from_values(&values)
                    .map(|stats| vec![(column.to_string(), stats)])
                    .unwrap_or_default()
            }
            (None, None) => {
                return Err(VizError::InvalidConfiguration(
                    "box plot needs at least one of x or y".to_string(),
                ))
            }
        };
        if boxes.is_empty() {
            return Err(VizError::InvalidConfiguration(
                "No numeric values to plot".to_string(),
            ));
        }

        let title = title.map(str::to_string).unwrap_or_else(|| match (x, y) {
            (Some(x), Some(y)) => format!("{y} by {x}"),
            (Some(column), None) | (None, Some(column)) => format!("Box Plot of {column}"),
            (None, None) => String::new(),
        });
        let figure = BoxFigure {
            title: title.clone(),
            x_label: x.map(str::to_string),
            y_label: y.map(str::to_string),
            boxes,
        };
        self.render(
            &figure,
            output.as_ref(),
            FIGURE_SIZE,
            ChartKind::BoxPlot,
            title,
            (x.map(str::to_string), y.map(str::to_string)),
        )
    }

    /// Annotated correlation heatmap of the numeric columns.
    ///
    /// Title defaults to `"Correlation Heatmap"`.
    pub fn plot_heatmap(
        &self,
        df: &DataFrame,
        title: Option<&str>,
        colormap: &str,
        output: impl AsRef<Path>,
    ) -> Result<ChartHandle, VizError> {
        let colormap: Colormap = colormap.parse()?;
        let matrix = correlation_matrix(df)?;
        if matrix.is_empty() {
            return Err(VizError::InvalidConfiguration(
                "heatmap needs at least one numeric column".to_string(),
            ));
        }

        let title = title
            .map(str::to_string)
            .unwrap_or_else(|| "Correlation Heatmap".to_string());
        let figure = HeatmapFigure {
            title: title.clone(),
            matrix,
            colormap,
        };
        self.render(
            &figure,
            output.as_ref(),
            HEATMAP_SIZE,
            ChartKind::Heatmap,
            title,
            (None, None),
        )
    }

    /// Bar chart of how often each value of `column` occurs.
    ///
    /// Title defaults to `"Counts of {column}"`.
    pub fn plot_categorical(
        &self,
        df: &DataFrame,
        column: &str,
        title: Option<&str>,
        orientation: Orientation,
        output: impl AsRef<Path>,
    ) -> Result<ChartHandle, VizError> {
        require(df, column)?;
        let counts = value_counts(df, column)?;
        if counts.is_empty() {
            return Err(VizError::InvalidConfiguration(format!(
                "Column '{column}' has no values to count"
            )));
        }

        let title = title
            .map(str::to_string)
            .unwrap_or_else(|| format!("Counts of {column}"));
        let horizontal = orientation == Orientation::Horizontal;
        let (x_label, y_label) = if horizontal {
            ("count".to_string(), column.to_string())
        } else {
            (column.to_string(), "count".to_string())
        };
        let figure = CountFigure {
            title: title.clone(),
            column: column.to_string(),
            counts,
            horizontal,
        };
        self.render(
            &figure,
            output.as_ref(),
            FIGURE_SIZE,
            ChartKind::Categorical,
            title,
            (Some(x_label), Some(y_label)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{create_sample_data, parse_csv};

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("chartify_utils_unit_{name}.png"))
    }

    #[test]
    fn distribution_rejects_missing_column() {
        let df = create_sample_data(10).unwrap();
        let err = ChartPlotter::default()
            .plot_distribution(&df, "nope", None, DEFAULT_BINS, scratch("dist"))
            .unwrap_err();
        assert!(matches!(err, VizError::ColumnNotFound(ref c) if c == "nope"));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn distribution_rejects_zero_bins() {
        let df = create_sample_data(10).unwrap();
        let err = ChartPlotter::default()
            .plot_distribution(&df, "value", None, 0, scratch("dist0"))
            .unwrap_err();
        assert!(matches!(err, VizError::InvalidConfiguration(_)));
    }

    #[test]
    fn scatter_checks_hue_column() {
        let df = create_sample_data(10).unwrap();
        let err = ChartPlotter::default()
            .plot_scatter(&df, "value", "count", Some("colour"), None, scratch("scatter"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Column 'colour' not found in DataFrame.");
    }

    #[test]
    fn boxplot_needs_a_column() {
        let df = create_sample_data(10).unwrap();
        let plotter = ChartPlotter::default();
        let err = plotter
            .plot_boxplot(&df, None, None, None, scratch("box"))
            .unwrap_err();
        assert!(matches!(err, VizError::InvalidConfiguration(_)));

        let err = plotter
            .plot_boxplot(&df, Some("category"), Some("missing"), None, scratch("box"))
            .unwrap_err();
        assert!(matches!(err, VizError::ColumnNotFound(_)));
    }

    #[test]
    fn heatmap_rejects_unknown_colormap_and_text_tables() {
        let plotter = ChartPlotter::default();
        let df = create_sample_data(10).unwrap();
        let err = plotter
            .plot_heatmap(&df, None, "rainbow", scratch("heat"))
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let text_only = parse_csv("a,b\nx,y\n").unwrap();
        let err = plotter
            .plot_heatmap(&text_only, None, "coolwarm", scratch("heat"))
            .unwrap_err();
        assert!(matches!(err, VizError::InvalidConfiguration(_)));
    }

    #[test]
    fn categorical_rejects_missing_column() {
        let df = create_sample_data(10).unwrap();
        let err = ChartPlotter::default()
            .plot_categorical(&df, "kind", None, Orientation::Vertical, scratch("count"))
            .unwrap_err();
        assert!(matches!(err, VizError::ColumnNotFound(_)));
    }

    #[test]
    fn orientation_parses_short_names() {
        assert_eq!("v".parse::<Orientation>().unwrap(), Orientation::Vertical);
        assert_eq!("h".parse::<Orientation>().unwrap(), Orientation::Horizontal);
        assert!("x".parse::<Orientation>().is_err());
    }
}
