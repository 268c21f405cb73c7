//! Rating Aggregations Module
//! Derived views computed from the filtered table: top-rated rows, rating
//! histogram with density overlay, rating shares, and per-model rankings.

use polars::prelude::*;
use statrs::distribution::{Continuous, Normal};
use std::collections::HashMap;
use thiserror::Error;

use crate::data::{MODEL_COL, RATING_COL};

/// Ranked views keep at most this many entries.
pub const TOP_N: usize = 10;
/// Number of equal-width intervals in the rating histogram.
pub const HISTOGRAM_BINS: usize = 10;
/// Sample count of the density overlay polyline.
const DENSITY_POINTS: usize = 200;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("no rows to aggregate")]
    EmptyInput,
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One (model, rating) observation extracted from the filtered table.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRow {
    pub model: String,
    pub rating: f64,
}

/// A single histogram interval. The final interval is closed on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Overall (lower, upper) span covered by the bins.
    pub fn span(&self) -> Option<(f64, f64)> {
        match (self.bins.first(), self.bins.last()) {
            (Some(first), Some(last)) => Some((first.lower, last.upper)),
            _ => None,
        }
    }
}

/// Pull (model, rating) pairs out of the filtered DataFrame.
/// Null models and null ratings are skipped (the filter already drops them).
pub fn extract_rows(df: &DataFrame) -> Result<Vec<RatingRow>, AggregateError> {
    let models = df.column(MODEL_COL)?;
    let ratings_f64 = df.column(RATING_COL)?.cast(&DataType::Float64)?;
    let ratings = ratings_f64.f64()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Ok(m), Some(r)) = (models.get(i), ratings.get(i)) {
            if !m.is_null() && !r.is_nan() {
                rows.push(RatingRow {
                    model: m.to_string().trim_matches('"').to_string(),
                    rating: r,
                });
            }
        }
    }
    Ok(rows)
}

/// Handles the derived-view computations. All functions are pure and fail
/// with [`AggregateError::EmptyInput`] when given no rows; callers branch to
/// an explicit no-data state before rendering.
pub struct RatingStats;

impl RatingStats {
    /// Rows sorted by rating descending, ties keeping original order,
    /// truncated to the first `n`.
    pub fn top_rated(rows: &[RatingRow], n: usize) -> Result<Vec<RatingRow>, AggregateError> {
        if rows.is_empty() {
            return Err(AggregateError::EmptyInput);
        }

        let mut sorted = rows.to_vec();
        // Vec::sort_by is stable, so equal ratings keep their input order
        sorted.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted.truncate(n);
        Ok(sorted)
    }

    /// Partition the observed rating range into `bins` equal-width intervals
    /// and count rows per interval. A degenerate range (all ratings equal)
    /// collapses to a single bin holding every row.
    pub fn histogram(rows: &[RatingRow], bins: usize) -> Result<Histogram, AggregateError> {
        if rows.is_empty() {
            return Err(AggregateError::EmptyInput);
        }
        let bins = bins.max(1);

        let min = rows.iter().map(|r| r.rating).fold(f64::INFINITY, f64::min);
        let max = rows
            .iter()
            .map(|r| r.rating)
            .fold(f64::NEG_INFINITY, f64::max);

        if max == min {
            return Ok(Histogram {
                bins: vec![HistogramBin {
                    lower: min,
                    upper: max,
                    count: rows.len(),
                }],
            });
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for row in rows {
            let mut idx = ((row.rating - min) / width) as usize;
            // The maximum rating lands exactly on the last edge; close the
            // final interval instead of opening an extra bin.
            if idx >= bins {
                idx = bins - 1;
            }
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: min + i as f64 * width,
                upper: min + (i + 1) as f64 * width,
                count,
            })
            .collect();
        Ok(Histogram { bins })
    }

    /// Gaussian kernel density estimate across the histogram span, scaled to
    /// counts so it overlays the bars. Empty when the estimate is undefined
    /// (fewer than two rows, zero variance, or a degenerate span).
    pub fn density_curve(rows: &[RatingRow], histogram: &Histogram) -> Vec<[f64; 2]> {
        let n = rows.len();
        if n < 2 {
            return Vec::new();
        }
        let Some((lo, hi)) = histogram.span() else {
            return Vec::new();
        };
        if hi <= lo {
            return Vec::new();
        }

        let values: Vec<f64> = rows.iter().map(|r| r.rating).collect();
        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std = variance.sqrt();
        if std == 0.0 {
            return Vec::new();
        }

        // Scott's rule bandwidth
        let bandwidth = std * (n as f64).powf(-0.2);
        let bin_width = (hi - lo) / histogram.bins.len() as f64;
        let scale = n as f64 * bin_width;

        let mut curve = Vec::with_capacity(DENSITY_POINTS + 1);
        if let Ok(kernel) = Normal::new(0.0, 1.0) {
            for i in 0..=DENSITY_POINTS {
                let x = lo + (hi - lo) * i as f64 / DENSITY_POINTS as f64;
                let density = values
                    .iter()
                    .map(|&v| kernel.pdf((x - v) / bandwidth))
                    .sum::<f64>()
                    / (n as f64 * bandwidth);
                curve.push([x, density * scale]);
            }
        }
        curve
    }

    /// Count rows per exact rating value, sorted ascending by value.
    /// Display order for the share breakdown, not a ranked view.
    pub fn rating_share(rows: &[RatingRow]) -> Result<Vec<(f64, usize)>, AggregateError> {
        if rows.is_empty() {
            return Err(AggregateError::EmptyInput);
        }

        let mut values: Vec<f64> = rows.iter().map(|r| r.rating).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut share: Vec<(f64, usize)> = Vec::new();
        for v in values {
            match share.last_mut() {
                Some((current, count)) if *current == v => *count += 1,
                _ => share.push((v, 1)),
            }
        }
        Ok(share)
    }

    /// Mean rating per model, sorted descending by mean, first `n`.
    pub fn average_by_model(
        rows: &[RatingRow],
        n: usize,
    ) -> Result<Vec<(String, f64)>, AggregateError> {
        if rows.is_empty() {
            return Err(AggregateError::EmptyInput);
        }

        let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
        for row in rows {
            let entry = sums.entry(row.model.clone()).or_insert((0.0, 0));
            entry.0 += row.rating;
            entry.1 += 1;
        }

        let mut means: Vec<(String, f64)> = sums
            .into_iter()
            .map(|(model, (sum, count))| (model, sum / count as f64))
            .collect();
        // Value ties fall back to name order so the result does not depend
        // on HashMap iteration order
        means.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        means.truncate(n);
        Ok(means)
    }

    /// Row count per model, sorted descending by count, first `n`.
    pub fn model_counts(
        rows: &[RatingRow],
        n: usize,
    ) -> Result<Vec<(String, usize)>, AggregateError> {
        if rows.is_empty() {
            return Err(AggregateError::EmptyInput);
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for row in rows {
            *counts.entry(row.model.clone()).or_insert(0) += 1;
        }

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        Ok(ranked)
    }
}

/// The complete bundle of derived views handed to the presentation layer.
/// Built synchronously from the filtered table on every interaction.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub row_count: usize,
    pub top_rated: Vec<RatingRow>,
    pub histogram: Histogram,
    pub density: Vec<[f64; 2]>,
    pub rating_share: Vec<(f64, usize)>,
    pub average_by_model: Vec<(String, f64)>,
    pub model_counts: Vec<(String, usize)>,
}

impl DashboardData {
    pub fn build(filtered: &DataFrame) -> Result<Self, AggregateError> {
        let rows = extract_rows(filtered)?;
        if rows.is_empty() {
            return Err(AggregateError::EmptyInput);
        }

        let histogram = RatingStats::histogram(&rows, HISTOGRAM_BINS)?;
        let density = RatingStats::density_curve(&rows, &histogram);

        Ok(Self {
            row_count: rows.len(),
            top_rated: RatingStats::top_rated(&rows, TOP_N)?,
            density,
            histogram,
            rating_share: RatingStats::rating_share(&rows)?,
            average_by_model: RatingStats::average_by_model(&rows, TOP_N)?,
            model_counts: RatingStats::model_counts(&rows, TOP_N)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(model: &str, rating: f64) -> RatingRow {
        RatingRow {
            model: model.to_string(),
            rating,
        }
    }

    fn sample_rows() -> Vec<RatingRow> {
        vec![
            row("iPhone 12", 4.5),
            row("iPhone 12", 5.0),
            row("iPhone 13", 3.0),
        ]
    }

    #[test]
    fn top_rated_sorts_descending_and_truncates() {
        let top = RatingStats::top_rated(&sample_rows(), 2).unwrap();
        assert_eq!(top, vec![row("iPhone 12", 5.0), row("iPhone 12", 4.5)]);
    }

    #[test]
    fn top_rated_ties_keep_original_order() {
        let rows = vec![row("A", 4.0), row("B", 4.0), row("C", 5.0)];
        let top = RatingStats::top_rated(&rows, 10).unwrap();
        assert_eq!(top, vec![row("C", 5.0), row("A", 4.0), row("B", 4.0)]);
    }

    #[test]
    fn average_by_model_ranks_by_mean() {
        let avg = RatingStats::average_by_model(&sample_rows(), 10).unwrap();
        assert_eq!(
            avg,
            vec![("iPhone 12".to_string(), 4.75), ("iPhone 13".to_string(), 3.0)]
        );
    }

    #[test]
    fn average_by_model_breaks_value_ties_by_name() {
        let rows = vec![row("B", 4.0), row("A", 4.0)];
        let avg = RatingStats::average_by_model(&rows, 10).unwrap();
        assert_eq!(avg, vec![("A".to_string(), 4.0), ("B".to_string(), 4.0)]);
    }

    #[test]
    fn model_counts_rank_by_frequency() {
        let counts = RatingStats::model_counts(&sample_rows(), 10).unwrap();
        assert_eq!(
            counts,
            vec![("iPhone 12".to_string(), 2), ("iPhone 13".to_string(), 1)]
        );
    }

    #[test]
    fn model_counts_never_exceed_row_count() {
        let rows = sample_rows();
        let counts = RatingStats::model_counts(&rows, 10).unwrap();
        let total: usize = counts.iter().map(|(_, c)| c).sum();
        assert!(total <= rows.len());
    }

    #[test]
    fn ranked_views_return_at_most_n_groups() {
        let rows: Vec<RatingRow> = (0..30).map(|i| row(&format!("Model {i}"), 4.0)).collect();
        assert_eq!(RatingStats::average_by_model(&rows, TOP_N).unwrap().len(), TOP_N);
        assert_eq!(RatingStats::model_counts(&rows, TOP_N).unwrap().len(), TOP_N);
        assert_eq!(RatingStats::top_rated(&rows, TOP_N).unwrap().len(), TOP_N);
    }

    #[test]
    fn histogram_counts_cover_every_row() {
        let rows = sample_rows();
        let hist = RatingStats::histogram(&rows, HISTOGRAM_BINS).unwrap();
        assert_eq!(hist.bins.len(), HISTOGRAM_BINS);
        assert_eq!(hist.total(), rows.len());

        // Max-value rows land in the final bin
        let last = hist.bins.last().unwrap();
        assert!(last.count >= 1);
        assert_eq!(hist.span(), Some((3.0, 5.0)));
    }

    #[test]
    fn histogram_degenerate_range_collapses_to_one_bin() {
        let rows = vec![row("A", 4.0), row("B", 4.0)];
        let hist = RatingStats::histogram(&rows, HISTOGRAM_BINS).unwrap();
        assert_eq!(hist.bins.len(), 1);
        assert_eq!(hist.bins[0].count, 2);
    }

    #[test]
    fn rating_share_is_sorted_ascending() {
        let rows = sample_rows();
        let share = RatingStats::rating_share(&rows).unwrap();
        assert_eq!(share, vec![(3.0, 1), (4.5, 1), (5.0, 1)]);
        let total: usize = share.iter().map(|(_, c)| c).sum();
        assert_eq!(total, rows.len());
    }

    #[test]
    fn density_curve_is_empty_for_degenerate_input() {
        let one = vec![row("A", 4.0)];
        let hist = RatingStats::histogram(&one, HISTOGRAM_BINS).unwrap();
        assert!(RatingStats::density_curve(&one, &hist).is_empty());

        let flat = vec![row("A", 4.0), row("B", 4.0)];
        let hist = RatingStats::histogram(&flat, HISTOGRAM_BINS).unwrap();
        assert!(RatingStats::density_curve(&flat, &hist).is_empty());
    }

    #[test]
    fn density_curve_spans_the_histogram() {
        let rows = sample_rows();
        let hist = RatingStats::histogram(&rows, HISTOGRAM_BINS).unwrap();
        let curve = RatingStats::density_curve(&rows, &hist);
        assert!(!curve.is_empty());
        assert_eq!(curve.first().unwrap()[0], 3.0);
        assert_eq!(curve.last().unwrap()[0], 5.0);
        assert!(curve.iter().all(|p| p[1] >= 0.0));
    }

    #[test]
    fn empty_input_is_an_explicit_error() {
        let rows: Vec<RatingRow> = Vec::new();
        assert!(matches!(
            RatingStats::top_rated(&rows, 10),
            Err(AggregateError::EmptyInput)
        ));
        assert!(matches!(
            RatingStats::histogram(&rows, 10),
            Err(AggregateError::EmptyInput)
        ));
        assert!(matches!(
            RatingStats::rating_share(&rows),
            Err(AggregateError::EmptyInput)
        ));
        assert!(matches!(
            RatingStats::average_by_model(&rows, 10),
            Err(AggregateError::EmptyInput)
        ));
        assert!(matches!(
            RatingStats::model_counts(&rows, 10),
            Err(AggregateError::EmptyInput)
        ));
    }

    #[test]
    fn build_produces_all_views_from_a_dataframe() {
        let df = DataFrame::new(vec![
            Column::new(
                MODEL_COL.into(),
                vec!["iPhone 12", "iPhone 12", "iPhone 13"],
            ),
            Column::new(RATING_COL.into(), vec![4.5f64, 5.0, 3.0]),
        ])
        .unwrap();

        let data = DashboardData::build(&df).unwrap();
        assert_eq!(data.row_count, 3);
        assert_eq!(data.top_rated.len(), 3);
        assert_eq!(data.average_by_model[0], ("iPhone 12".to_string(), 4.75));
        assert_eq!(data.model_counts[0], ("iPhone 12".to_string(), 2));
        assert_eq!(data.histogram.total(), 3);
    }

    #[test]
    fn build_rejects_an_empty_dataframe() {
        let df = DataFrame::new(vec![
            Column::new(MODEL_COL.into(), Vec::<String>::new()),
            Column::new(RATING_COL.into(), Vec::<f64>::new()),
        ])
        .unwrap();

        assert!(matches!(
            DashboardData::build(&df),
            Err(AggregateError::EmptyInput)
        ));
    }
}
