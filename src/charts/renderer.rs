//! Static Chart Renderer
//! Draws prepared chart data with plotters.
//!
//! Every figure is drawn against a generic backend, so the same code writes
//! SVG (for `.svg` paths) and bitmap images (everything else).

use super::style::{palette_color, ChartStyle, Colormap};
use super::VizError;
use crate::stats::{BoxStats, CorrelationMatrix, HistogramBin};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;
use std::path::Path;

/// Width of the heatmap colour bar area
const COLORBAR_WIDTH: i32 = 150;
/// Half the width of a bar or box, in category units
const BAR_HALF_WIDTH: f64 = 0.4;

fn draw_err<E: std::fmt::Display>(context: &'static str) -> impl FnOnce(E) -> VizError {
    move |e| VizError::Rendering(format!("{context}: {e}"))
}

/// Something that can draw itself onto a drawing area.
pub(crate) trait Figure {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &ChartStyle,
    ) -> Result<(), VizError>;
}

/// Draw `figure` into `path`, picking the backend from the file extension.
pub(crate) fn render_figure(
    figure: &impl Figure,
    path: &Path,
    size: (u32, u32),
    style: &ChartStyle,
) -> Result<(), VizError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        figure.draw(&root, style)?;
        root.present().map_err(draw_err("Failed to save chart"))?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        figure.draw(&root, style)?;
        root.present().map_err(draw_err("Failed to save chart"))?;
    }
    Ok(())
}

/// Axis range padded by `pad` of its span on both sides.
fn padded_range(values: impl Iterator<Item = f64>, pad: f64) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let span = if hi > lo { hi - lo } else { 1.0 };
    (lo - span * pad, hi + span * pad)
}

/// Category axis with one slot per category, centred on `0..n`.
///
/// Asking the mesh for `n` labels on this range puts one tick on each integer.
fn category_range(n: usize) -> Range<f64> {
    -0.5..n as f64 - 0.5
}

fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

pub(crate) struct HistogramFigure {
    pub title: String,
    pub x_label: String,
    pub bins: Vec<HistogramBin>,
    /// Density curve already scaled to bin counts
    pub kde: Vec<(f64, f64)>,
}

impl Figure for HistogramFigure {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &ChartStyle,
    ) -> Result<(), VizError> {
        root.fill(&style.figure_background)
            .map_err(draw_err("Failed to fill background"))?;

        let x_min = self.bins.first().map(|b| b.start).unwrap_or(0.0);
        let x_max = self.bins.last().map(|b| b.end).unwrap_or(1.0);
        let y_max = self
            .bins
            .iter()
            .map(|b| b.count as f64)
            .chain(self.kde.iter().map(|p| p.1))
            .fold(1.0f64, f64::max)
            * 1.1;

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, style.title_font())
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)
            .map_err(draw_err("Failed to build chart"))?;

        chart
            .plotting_area()
            .fill(&style.background)
            .map_err(draw_err("Failed to fill plot area"))?;

        chart
            .configure_mesh()
            .light_line_style(style.grid_color.stroke_width(1))
            .bold_line_style(style.grid_color.stroke_width(2))
            .axis_desc_style(style.label_font())
            .label_style(style.tick_font())
            .x_desc(&self.x_label)
            .y_desc("Frequency")
            .draw()
            .map_err(draw_err("Failed to configure mesh"))?;

        let color = palette_color(0);
        chart
            .draw_series(self.bins.iter().map(|b| {
                Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], color.mix(0.6).filled())
            }))
            .map_err(draw_err("Failed to draw bins"))?;
        chart
            .draw_series(self.bins.iter().map(|b| {
                Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], WHITE.stroke_width(1))
            }))
            .map_err(draw_err("Failed to draw bin edges"))?;

        if !self.kde.is_empty() {
            chart
                .draw_series(LineSeries::new(
                    self.kde.iter().copied(),
                    color.stroke_width(3),
                ))
                .map_err(draw_err("Failed to draw density"))?;
        }

        Ok(())
    }
}

pub(crate) struct ScatterFigure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// (hue value, points); a single unnamed group when no hue is used
    pub groups: Vec<(Option<String>, Vec<(f64, f64)>)>,
}

impl Figure for ScatterFigure {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &ChartStyle,
    ) -> Result<(), VizError> {
        root.fill(&style.figure_background)
            .map_err(draw_err("Failed to fill background"))?;

        let points = || self.groups.iter().flat_map(|(_, pts)| pts.iter());
        let (x_min, x_max) = padded_range(points().map(|p| p.0), 0.05);
        let (y_min, y_max) = padded_range(points().map(|p| p.1), 0.05);

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, style.title_font())
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_err("Failed to build chart"))?;

        chart
            .plotting_area()
            .fill(&style.background)
            .map_err(draw_err("Failed to fill plot area"))?;

        chart
            .configure_mesh()
            .light_line_style(style.grid_color.stroke_width(1))
            .bold_line_style(style.grid_color.stroke_width(2))
            .axis_desc_style(style.label_font())
            .label_style(style.tick_font())
            .x_desc(&self.x_label)
            .y_desc(&self.y_label)
            .draw()
            .map_err(draw_err("Failed to configure mesh"))?;

        let mut has_legend = false;
        for (idx, (name, pts)) in self.groups.iter().enumerate() {
            let color = palette_color(idx);
            let series = chart
                .draw_series(
                    pts.iter()
                        .map(|&(x, y)| Circle::new((x, y), 6, color.mix(0.8).filled())),
                )
                .map_err(draw_err("Failed to draw points"))?;
            if let Some(name) = name {
                has_legend = true;
                series
                    .label(name.as_str())
                    .legend(move |(x, y)| Circle::new((x + 5, y), 5, color.filled()));
            }
        }

        if has_legend {
            chart
                .configure_series_labels()
                .label_font(style.tick_font())
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(draw_err("Failed to draw legend"))?;
        }

        Ok(())
    }
}

pub(crate) struct BoxFigure {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub boxes: Vec<(String, BoxStats)>,
}

impl Figure for BoxFigure {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &ChartStyle,
    ) -> Result<(), VizError> {
        root.fill(&style.figure_background)
            .map_err(draw_err("Failed to fill background"))?;

        let n = self.boxes.len();
        let labels: Vec<String> = self.boxes.iter().map(|(name, _)| name.clone()).collect();
        let (y_min, y_max) = padded_range(
            self.boxes.iter().flat_map(|(_, b)| {
                b.outliers
                    .iter()
                    .copied()
                    .chain([b.whisker_low, b.whisker_high])
            }),
            0.08,
        );

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, style.title_font())
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(category_range(n), y_min..y_max)
            .map_err(draw_err("Failed to build chart"))?;

        chart
            .plotting_area()
            .fill(&style.background)
            .map_err(draw_err("Failed to fill plot area"))?;

        let label_at = |v: &f64| category_label(&labels, *v);
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(style.grid_color.stroke_width(1))
            .bold_line_style(style.grid_color.stroke_width(2))
            .axis_desc_style(style.label_font())
            .label_style(style.tick_font())
            .x_labels(n)
            .x_label_formatter(&label_at);
        if let Some(x_label) = &self.x_label {
            mesh.x_desc(x_label);
        }
        if let Some(y_label) = &self.y_label {
            mesh.y_desc(y_label);
        }
        mesh.draw().map_err(draw_err("Failed to configure mesh"))?;

        let w = BAR_HALF_WIDTH * 0.75;
        for (i, (_, b)) in self.boxes.iter().enumerate() {
            let x = i as f64;
            let color = palette_color(i);

            chart
                .draw_series([
                    Rectangle::new([(x - w, b.q1), (x + w, b.q3)], color.mix(0.7).filled()),
                    Rectangle::new([(x - w, b.q1), (x + w, b.q3)], BLACK.stroke_width(1)),
                ])
                .map_err(draw_err("Failed to draw box"))?;

            chart
                .draw_series([
                    PathElement::new(vec![(x - w, b.median), (x + w, b.median)], BLACK.stroke_width(2)),
                    PathElement::new(vec![(x, b.q3), (x, b.whisker_high)], BLACK.stroke_width(1)),
                    PathElement::new(vec![(x, b.q1), (x, b.whisker_low)], BLACK.stroke_width(1)),
                    PathElement::new(
                        vec![(x - w / 2.0, b.whisker_high), (x + w / 2.0, b.whisker_high)],
                        BLACK.stroke_width(1),
                    ),
                    PathElement::new(
                        vec![(x - w / 2.0, b.whisker_low), (x + w / 2.0, b.whisker_low)],
                        BLACK.stroke_width(1),
                    ),
                ])
                .map_err(draw_err("Failed to draw whiskers"))?;

            chart
                .draw_series(
                    b.outliers
                        .iter()
                        .map(|&v| Circle::new((x, v), 4, BLACK.stroke_width(1))),
                )
                .map_err(draw_err("Failed to draw outliers"))?;
        }

        Ok(())
    }
}

pub(crate) struct HeatmapFigure {
    pub title: String,
    pub matrix: CorrelationMatrix,
    pub colormap: Colormap,
}

impl HeatmapFigure {
    fn color_for(&self, r: f64) -> RGBColor {
        if r.is_nan() {
            RGBColor(200, 200, 200)
        } else {
            self.colormap.color_at((r + 1.0) / 2.0)
        }
    }
}

impl Figure for HeatmapFigure {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &ChartStyle,
    ) -> Result<(), VizError> {
        root.fill(&style.figure_background)
            .map_err(draw_err("Failed to fill background"))?;

        let (width, _) = root.dim_in_pixel();
        let (main, bar) = root.split_horizontally(width as i32 - COLORBAR_WIDTH);

        let n = self.matrix.columns.len();
        // First column at the top
        let row_labels: Vec<String> = self.matrix.columns.iter().rev().cloned().collect();
        let col_labels = &self.matrix.columns;

        let mut chart = ChartBuilder::on(&main)
            .caption(&self.title, style.title_font())
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(120)
            .build_cartesian_2d(category_range(n), category_range(n))
            .map_err(draw_err("Failed to build chart"))?;

        let x_label_at = |v: &f64| category_label(col_labels, *v);
        let y_label_at = |v: &f64| category_label(&row_labels, *v);
        chart
            .configure_mesh()
            .disable_mesh()
            .label_style(style.tick_font())
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&x_label_at)
            .y_label_formatter(&y_label_at)
            .draw()
            .map_err(draw_err("Failed to configure mesh"))?;

        let annotation = TextStyle::from(style.tick_font()).pos(Pos::new(HPos::Center, VPos::Center));
        for (i, row) in self.matrix.values.iter().enumerate() {
            let y = (n - 1 - i) as f64;
            for (j, &r) in row.iter().enumerate() {
                let x = j as f64;
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                        self.color_for(r).filled(),
                    )))
                    .map_err(draw_err("Failed to draw cell"))?;

                let text_color = if r.abs() > 0.6 { &WHITE } else { &BLACK };
                let text = if r.is_nan() {
                    "nan".to_string()
                } else {
                    format!("{r:.2}")
                };
                chart
                    .draw_series(std::iter::once(Text::new(
                        text,
                        (x, y),
                        annotation.color(text_color),
                    )))
                    .map_err(draw_err("Failed to annotate cell"))?;
            }
        }

        let mut colorbar = ChartBuilder::on(&bar)
            .margin_top(70)
            .margin_bottom(75)
            .margin_right(20)
            .y_label_area_size(70)
            .build_cartesian_2d(0.0..1.0, -1.0..1.0)
            .map_err(draw_err("Failed to build colour bar"))?;

        colorbar
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(5)
            .axis_desc_style(style.label_font())
            .label_style(style.tick_font())
            .y_desc("Correlation")
            .draw()
            .map_err(draw_err("Failed to configure colour bar"))?;

        const STEPS: usize = 100;
        let step = 2.0 / STEPS as f64;
        colorbar
            .draw_series((0..STEPS).map(|k| {
                let y0 = -1.0 + k as f64 * step;
                Rectangle::new(
                    [(0.0, y0), (1.0, y0 + step)],
                    self.colormap.color_at((y0 + step / 2.0 + 1.0) / 2.0).filled(),
                )
            }))
            .map_err(draw_err("Failed to draw colour bar"))?;

        Ok(())
    }
}

pub(crate) struct CountFigure {
    pub title: String,
    pub column: String,
    pub counts: Vec<(String, usize)>,
    pub horizontal: bool,
}

impl Figure for CountFigure {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &ChartStyle,
    ) -> Result<(), VizError> {
        root.fill(&style.figure_background)
            .map_err(draw_err("Failed to fill background"))?;

        let n = self.counts.len();
        let max_count = self.counts.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64;
        let count_range = 0.0..(max_count * 1.1).max(1.0);
        let categories = category_range(n);

        // Horizontal bars list the first category at the top
        let labels: Vec<String> = if self.horizontal {
            self.counts.iter().rev().map(|(v, _)| v.clone()).collect()
        } else {
            self.counts.iter().map(|(v, _)| v.clone()).collect()
        };
        let label_at = |v: &f64| category_label(&labels, *v);
        let color = palette_color(0);

        if self.horizontal {
            let mut chart = ChartBuilder::on(root)
                .caption(&self.title, style.title_font())
                .margin(15)
                .x_label_area_size(60)
                .y_label_area_size(100)
                .build_cartesian_2d(count_range, categories)
                .map_err(draw_err("Failed to build chart"))?;

            chart
                .plotting_area()
                .fill(&style.background)
                .map_err(draw_err("Failed to fill plot area"))?;

            chart
                .configure_mesh()
                .light_line_style(style.grid_color.stroke_width(1))
                .bold_line_style(style.grid_color.stroke_width(2))
                .axis_desc_style(style.label_font())
                .label_style(style.tick_font())
                .y_labels(n)
                .y_label_formatter(&label_at)
                .x_desc("count")
                .y_desc(&self.column)
                .draw()
                .map_err(draw_err("Failed to configure mesh"))?;

            chart
                .draw_series(self.counts.iter().enumerate().map(|(i, (_, c))| {
                    let y = (n - 1 - i) as f64;
                    Rectangle::new(
                        [(0.0, y - BAR_HALF_WIDTH), (*c as f64, y + BAR_HALF_WIDTH)],
                        color.filled(),
                    )
                }))
                .map_err(draw_err("Failed to draw bars"))?;
        } else {
            let mut chart = ChartBuilder::on(root)
                .caption(&self.title, style.title_font())
                .margin(15)
                .x_label_area_size(60)
                .y_label_area_size(80)
                .build_cartesian_2d(categories, count_range)
                .map_err(draw_err("Failed to build chart"))?;

            chart
                .plotting_area()
                .fill(&style.background)
                .map_err(draw_err("Failed to fill plot area"))?;

            chart
                .configure_mesh()
                .light_line_style(style.grid_color.stroke_width(1))
                .bold_line_style(style.grid_color.stroke_width(2))
                .axis_desc_style(style.label_font())
                .label_style(style.tick_font())
                .x_labels(n)
                .x_label_formatter(&label_at)
                .x_desc(&self.column)
                .y_desc("count")
                .draw()
                .map_err(draw_err("Failed to configure mesh"))?;

            chart
                .draw_series(self.counts.iter().enumerate().map(|(i, (_, c))| {
                    let x = i as f64;
                    Rectangle::new(
                        [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, *c as f64)],
                        color.filled(),
                    )
                }))
                .map_err(draw_err("Failed to draw bars"))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_label_only_on_integer_ticks() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(category_label(&labels, 0.0), "a");
        assert_eq!(category_label(&labels, 1.0), "b");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn category_range_centres_slots_on_integers() {
        assert_eq!(category_range(1), -0.5..0.5);
        assert_eq!(category_range(4), -0.5..3.5);
        let labels: Vec<String> = ["a", "b", "c", "d"].map(String::from).to_vec();
        let range = category_range(labels.len());
        let shown: Vec<String> = (0..labels.len())
            .map(|i| i as f64)
            .filter(|v| range.contains(v))
            .map(|v| category_label(&labels, v))
            .collect();
        assert_eq!(shown, labels);
    }

    #[test]
    fn padded_range_handles_degenerate_input() {
        assert_eq!(padded_range(std::iter::empty(), 0.1), (0.0, 1.0));
        assert_eq!(padded_range([2.0, 2.0].into_iter(), 0.5), (1.5, 2.5));
        assert_eq!(padded_range([0.0, 10.0].into_iter(), 0.1), (-1.0, 11.0));
    }
}
