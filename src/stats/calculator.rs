//! Statistics Calculator Module
//! Descriptive statistics, histogram binning, kernel density and box-plot
//! summaries over plain `f64` slices.

use serde::Serialize;
use statrs::distribution::{Continuous, Normal};

/// Tukey fence multiplier for box-plot whiskers
pub const WHISKER_IQR: f64 = 1.5;

/// Describe-style statistics for a single numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for ColumnStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            p50: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// One equal-width histogram bin, `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Five-number summary plus outliers beyond the whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Returns `None` when there are no values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = StatsCalculator::sorted(values);

        let q1 = StatsCalculator::percentile(&sorted, 25.0);
        let median = StatsCalculator::percentile(&sorted, 50.0);
        let q3 = StatsCalculator::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        Some(Self {
            whisker_low,
            q1,
            median,
            q3,
            whisker_high,
            outliers,
        })
    }
}

/// Stateless statistics helpers.
pub struct StatsCalculator;

impl StatsCalculator {
    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnStats {
        let n = values.len();
        if n == 0 {
            return ColumnStats::default();
        }

        let sorted = Self::sorted(values);
        let mean = values.iter().sum::<f64>() / n as f64;

        // Sample standard deviation; undefined for a single value
        let std = if n > 1 {
            (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        ColumnStats {
            count: n,
            mean,
            std,
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            p50: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Bin values into `bins` equal-width bins spanning their range.
    ///
    /// A constant input is spread over `[v - 0.5, v + 0.5]`.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: lo + i as f64 * width,
                end: lo + (i + 1) as f64 * width,
                count,
            })
            .collect()
    }

    /// Gaussian kernel density estimate evaluated on `grid`.
    ///
    /// Bandwidth follows Scott's rule (`std * n^(-1/5)`). Returns an empty
    /// vector when fewer than two values are given or they have no spread.
    pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Vec<(f64, f64)> {
        let n = values.len();
        if n < 2 {
            return Vec::new();
        }
        let std = Self::compute_descriptive_stats(values).std;
        let bandwidth = std * (n as f64).powf(-0.2);
        if !(bandwidth > 0.0) {
            return Vec::new();
        }
        let Ok(kernel) = Normal::new(0.0, 1.0) else {
            return Vec::new();
        };

        grid.iter()
            .map(|&x| {
                let density = values
                    .iter()
                    .map(|&v| kernel.pdf((x - v) / bandwidth))
                    .sum::<f64>()
                    / (n as f64 * bandwidth);
                (x, density)
            })
            .collect()
    }

    /// Pearson correlation over pairs where both sides are present.
    ///
    /// NaN when fewer than two complete pairs exist or either side is constant.
    pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
        let pairs: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys)
            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
            .collect();
        let n = pairs.len();
        if n < 2 {
            return f64::NAN;
        }

        let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
        let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
        let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
        for &(x, y) in &pairs {
            cov += (x - mean_x) * (y - mean_y);
            var_x += (x - mean_x).powi(2);
            var_y += (y - mean_y).powi(2);
        }

        let denom = (var_x * var_y).sqrt();
        if denom == 0.0 {
            f64::NAN
        } else {
            (cov / denom).clamp(-1.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptive_stats_match_describe() {
        let stats = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.p25, 1.75);
        assert_eq!(stats.p50, 2.5);
        assert_eq!(stats.p75, 3.25);
        assert!((stats.std - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn single_value_has_undefined_std() {
        let stats = StatsCalculator::compute_descriptive_stats(&[7.0]);
        assert_eq!(stats.count, 1);
        assert!(stats.std.is_nan());
        assert_eq!(stats.p50, 7.0);
    }

    #[test]
    fn histogram_counts_every_value() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let bins = StatsCalculator::histogram(&values, 7);
        assert_eq!(bins.len(), 7);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins[0].start, 0.0);
        assert!((bins[6].end - 99.0).abs() < 1e-9);
    }

    #[test]
    fn histogram_of_constant_values() {
        let bins = StatsCalculator::histogram(&[5.0, 5.0, 5.0], 2);
        assert_eq!(bins[0].start, 4.5);
        assert_eq!(bins[1].end, 5.5);
        assert_eq!(bins[1].count, 3);
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 4.5, 6.0];
        let grid: Vec<f64> = (0..=1000).map(|i| -5.0 + i as f64 * 0.015).collect();
        let density = StatsCalculator::gaussian_kde(&values, &grid);
        let area: f64 = density.iter().map(|(_, d)| d * 0.015).sum();
        assert!((area - 1.0).abs() < 0.01, "area = {area}");
    }

    #[test]
    fn kde_needs_spread() {
        assert!(StatsCalculator::gaussian_kde(&[1.0, 1.0], &[1.0]).is_empty());
        assert!(StatsCalculator::gaussian_kde(&[1.0], &[1.0]).is_empty());
    }

    #[test]
    fn box_stats_flag_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = BoxStats::from_values(&values).unwrap();
        assert_eq!(stats.q1, 2.25);
        assert_eq!(stats.median, 3.5);
        assert_eq!(stats.q3, 4.75);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 5.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert!(BoxStats::from_values(&[]).is_none());
    }

    #[test]
    fn pearson_skips_incomplete_pairs() {
        let xs = [Some(1.0), Some(2.0), None, Some(3.0)];
        let ys = [Some(2.0), Some(4.0), Some(9.0), Some(6.0)];
        assert!((StatsCalculator::pearson(&xs, &ys) - 1.0).abs() < 1e-12);

        let flat = [Some(1.0), Some(1.0), Some(1.0), Some(1.0)];
        assert!(StatsCalculator::pearson(&xs, &flat).is_nan());
    }
}
