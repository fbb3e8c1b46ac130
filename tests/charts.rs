use chartify_utils::charts::{ChartKind, DEFAULT_BINS};
use chartify_utils::{create_sample_data, setup_style, ChartPlotter, Orientation, VizError};
use std::path::PathBuf;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("chartify_utils_{name}"))
}

#[test]
fn validation_runs_before_any_file_is_written() {
    let df = create_sample_data(20).unwrap();
    let plotter = ChartPlotter::new(setup_style());
    let path = scratch("never_written.png");
    std::fs::remove_file(&path).ok();

    let err = plotter
        .plot_scatter(&df, "value", "missing", None, None, &path)
        .unwrap_err();
    assert!(matches!(err, VizError::ColumnNotFound(_)));
    assert!(!path.exists());
}

#[test]
fn heatmap_colormap_is_checked() {
    let df = create_sample_data(20).unwrap();
    let err = ChartPlotter::default()
        .plot_heatmap(&df, None, "not-a-map", scratch("bad_cmap.png"))
        .unwrap_err();
    assert!(err.is_invalid_argument());
}

// Drawing text goes through system fonts, which minimal environments lack.

#[test]
#[ignore = "needs system fonts"]
fn distribution_chart_generation() {
    let df = create_sample_data(100).unwrap();
    let path = scratch("distribution.png");
    let handle = ChartPlotter::default()
        .plot_distribution(&df, "value", None, DEFAULT_BINS, &path)
        .unwrap();

    assert_eq!(handle.kind, ChartKind::Distribution);
    assert_eq!(handle.title, "Distribution of value");
    assert_eq!(handle.x_label.as_deref(), Some("value"));
    assert_eq!(handle.y_label.as_deref(), Some("Frequency"));
    assert_eq!((handle.width, handle.height), (1000, 600));
    assert!(path.exists());

    std::fs::remove_file(path).ok();
}

#[test]
#[ignore = "needs system fonts"]
fn scatter_with_hue_as_svg() {
    let df = create_sample_data(60).unwrap();
    let path = scratch("scatter.svg");
    let handle = ChartPlotter::default()
        .plot_scatter(&df, "value", "count", Some("category"), None, &path)
        .unwrap();

    assert_eq!(handle.title, "count vs value");
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("count vs value"));

    std::fs::remove_file(path).ok();
}

#[test]
#[ignore = "needs system fonts"]
fn boxplot_titles() {
    let df = create_sample_data(60).unwrap();
    let plotter = ChartPlotter::default();

    let grouped = scratch("box_grouped.png");
    let handle = plotter
        .plot_boxplot(&df, Some("category"), Some("value"), None, &grouped)
        .unwrap();
    assert_eq!(handle.title, "value by category");

    let single = scratch("box_single.png");
    let handle = plotter
        .plot_boxplot(&df, None, Some("value"), None, &single)
        .unwrap();
    assert_eq!(handle.title, "Box Plot of value");
    assert_eq!(handle.x_label, None);

    std::fs::remove_file(grouped).ok();
    std::fs::remove_file(single).ok();
}

#[test]
#[ignore = "needs system fonts"]
fn heatmap_and_count_plots() {
    let df = create_sample_data(60).unwrap();
    let plotter = ChartPlotter::new(setup_style().dimensions(800, 500));

    let heat = scratch("heatmap.png");
    let handle = plotter.plot_heatmap(&df, None, "coolwarm", &heat).unwrap();
    assert_eq!(handle.title, "Correlation Heatmap");
    assert_eq!((handle.width, handle.height), (800, 500));

    let counts = scratch("counts.png");
    let handle = plotter
        .plot_categorical(&df, "category", Some("Categories"), Orientation::Horizontal, &counts)
        .unwrap();
    assert_eq!(handle.title, "Categories");
    assert_eq!(handle.x_label.as_deref(), Some("count"));
    assert_eq!(handle.y_label.as_deref(), Some("category"));

    std::fs::remove_file(heat).ok();
    std::fs::remove_file(counts).ok();
}
