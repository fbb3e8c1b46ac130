//! Chartify - CSV summary and chart generation from the command line.

use anyhow::Context;
use chartify_utils::charts::DEFAULT_BINS;
use chartify_utils::data::numeric_columns;
use chartify_utils::{
    aggregate_data, clean_data, create_sample_data_with_seed, load_data, setup_style,
    summarize_data, ChartPlotter, Orientation,
};
use clap::{Parser, Subcommand};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "chartify")]
#[command(about = "Summarize CSV tables and render static charts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a synthetic sample table as CSV
    Sample {
        /// Number of rows to generate
        #[arg(long, default_value_t = 100)]
        rows: usize,

        /// Random seed
        #[arg(long, default_value_t = chartify_utils::data::DEFAULT_SEED)]
        seed: u64,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print summary statistics as JSON
    Summarize {
        /// CSV file to read
        file: PathBuf,

        /// Drop duplicate and incomplete rows first
        #[arg(long)]
        clean: bool,
    },

    /// Group by one column and aggregate another
    Aggregate {
        /// CSV file to read
        file: PathBuf,

        /// Column to group by
        #[arg(long)]
        group: String,

        /// Column to aggregate
        #[arg(long)]
        column: String,

        /// One of mean, sum, count, min, max
        #[arg(long, default_value = "mean")]
        func: String,
    },

    /// Render the standard chart set for a table
    Charts {
        /// CSV file to read
        file: PathBuf,

        /// Directory to write charts into
        #[arg(long, default_value = "charts")]
        out_dir: PathBuf,

        /// Drop duplicate and incomplete rows first
        #[arg(long)]
        clean: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sample { rows, seed, output } => cmd_sample(rows, seed, output),
        Commands::Summarize { file, clean } => cmd_summarize(file, clean),
        Commands::Aggregate {
            file,
            group,
            column,
            func,
        } => cmd_aggregate(file, &group, &column, &func),
        Commands::Charts {
            file,
            out_dir,
            clean,
        } => cmd_charts(file, out_dir, clean),
    }
}

fn read_table(file: &Path, clean: bool) -> anyhow::Result<DataFrame> {
    let df = load_data(file)?;
    if clean {
        Ok(clean_data(&df)?)
    } else {
        Ok(df)
    }
}

fn cmd_sample(rows: usize, seed: u64, output: PathBuf) -> anyhow::Result<()> {
    let mut df = create_sample_data_with_seed(rows, seed)?;
    let mut file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .context("Failed to write sample CSV")?;
    log::info!("wrote {rows} sample rows to {}", output.display());
    Ok(())
}

fn cmd_summarize(file: PathBuf, clean: bool) -> anyhow::Result<()> {
    let df = read_table(&file, clean)?;
    let summary = summarize_data(&df)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_aggregate(file: PathBuf, group: &str, column: &str, func: &str) -> anyhow::Result<()> {
    let df = read_table(&file, false)?;
    let result = aggregate_data(&df, group, column, func)?;
    println!("{result}");
    Ok(())
}

/// Picks columns the way a first look at a table would: the first numeric
/// column for distributions, the first two for a scatter, and the first
/// text column as the category.
fn cmd_charts(file: PathBuf, out_dir: PathBuf, clean: bool) -> anyhow::Result<()> {
    let df = read_table(&file, clean)?;
    let plotter = ChartPlotter::new(setup_style());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let numeric = numeric_columns(&df);
    let category = df
        .get_columns()
        .iter()
        .find(|c| matches!(c.dtype(), DataType::String))
        .map(|c| c.name().to_string());

    if let Some(first) = numeric.first() {
        plotter.plot_distribution(
            &df,
            first,
            None,
            DEFAULT_BINS,
            out_dir.join("distribution.png"),
        )?;
        plotter.plot_boxplot(
            &df,
            category.as_deref(),
            Some(first),
            None,
            out_dir.join("boxplot.png"),
        )?;
    }
    if let [x, y, ..] = numeric.as_slice() {
        plotter.plot_scatter(
            &df,
            x,
            y,
            category.as_deref(),
            None,
            out_dir.join("scatter.png"),
        )?;
    }
    if !numeric.is_empty() {
        plotter.plot_heatmap(&df, None, "coolwarm", out_dir.join("heatmap.png"))?;
    }
    if let Some(category) = &category {
        plotter.plot_categorical(
            &df,
            category,
            None,
            Orientation::Vertical,
            out_dir.join("counts.png"),
        )?;
    }

    log::info!("charts written to {}", out_dir.display());
    Ok(())
}
