//! Stats module - derived views over the filtered table

mod aggregate;

pub use aggregate::{
    extract_rows, AggregateError, DashboardData, Histogram, HistogramBin, RatingRow, RatingStats,
    HISTOGRAM_BINS, TOP_N,
};
