//! Filter Stage Module
//! Row selection by allowed model names and an inclusive rating range.

use polars::prelude::*;
use std::collections::BTreeSet;

use super::loader::{model_names, rating_bounds, MODEL_COL, RATING_COL};

/// Fallback rating span when a dataset has no usable rating values.
const DEFAULT_RATING_SPAN: (f64, f64) = (0.0, 5.0);

/// User-selected filter state: which models to keep and the inclusive
/// `[min_rating, max_rating]` band. The default selects everything.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub models: BTreeSet<String>,
    pub min_rating: f64,
    pub max_rating: f64,
}

impl FilterCriteria {
    /// Criteria that match the whole dataset: every distinct model selected,
    /// range set to the observed min/max.
    pub fn matching(df: &DataFrame) -> Self {
        let (min_rating, max_rating) = rating_bounds(df).unwrap_or(DEFAULT_RATING_SPAN);
        Self {
            models: model_names(df).into_iter().collect(),
            min_rating,
            max_rating,
        }
    }

    /// Select the rows satisfying both predicates, preserving row order.
    ///
    /// A row passes when its model is in the selected set AND its rating lies
    /// in `[min_rating, max_rating]`. Null models and null ratings never
    /// pass. An empty model set, or an inverted range, matches nothing.
    pub fn apply(&self, df: &DataFrame) -> PolarsResult<DataFrame> {
        let models = df.column(MODEL_COL)?;
        let ratings_f64 = df.column(RATING_COL)?.cast(&DataType::Float64)?;
        let ratings = ratings_f64.f64()?;

        let mut mask = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let model_ok = models
                .get(i)
                .ok()
                .filter(|v| !v.is_null())
                .map(|v| self.models.contains(v.to_string().trim_matches('"')))
                .unwrap_or(false);
            let rating_ok = ratings
                .get(i)
                .map(|r| r >= self.min_rating && r <= self.max_rating)
                .unwrap_or(false);
            mask.push(model_ok && rating_ok);
        }

        df.filter(&BooleanChunked::from_slice("mask".into(), &mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                MODEL_COL.into(),
                vec!["iPhone 12", "iPhone 12", "iPhone 13"],
            ),
            Column::new(RATING_COL.into(), vec![4.5f64, 5.0, 3.0]),
        ])
        .unwrap()
    }

    fn ratings_of(df: &DataFrame) -> Vec<f64> {
        let casted = df
            .column(RATING_COL)
            .unwrap()
            .cast(&DataType::Float64)
            .unwrap();
        casted.f64().unwrap().into_iter().flatten().collect()
    }

    #[test]
    fn default_criteria_match_everything() {
        let df = sample_df();
        let criteria = FilterCriteria::matching(&df);
        assert_eq!(criteria.min_rating, 3.0);
        assert_eq!(criteria.max_rating, 5.0);

        let filtered = criteria.apply(&df).unwrap();
        assert_eq!(filtered.height(), df.height());
    }

    #[test]
    fn result_preserves_row_order() {
        let df = sample_df();
        let filtered = FilterCriteria::matching(&df).apply(&df).unwrap();
        assert_eq!(ratings_of(&filtered), vec![4.5, 5.0, 3.0]);
    }

    #[test]
    fn boundary_ratings_are_inclusive() {
        let df = sample_df();
        let mut criteria = FilterCriteria::matching(&df);
        criteria.min_rating = 4.5;
        criteria.max_rating = 5.0;

        let filtered = criteria.apply(&df).unwrap();
        assert_eq!(ratings_of(&filtered), vec![4.5, 5.0]);
    }

    #[test]
    fn narrowed_range_keeps_only_matching_rows() {
        let df = sample_df();
        let mut criteria = FilterCriteria::matching(&df);
        criteria.min_rating = 4.6;

        let filtered = criteria.apply(&df).unwrap();
        assert_eq!(ratings_of(&filtered), vec![5.0]);
    }

    #[test]
    fn model_selection_excludes_other_models() {
        let df = sample_df();
        let mut criteria = FilterCriteria::matching(&df);
        criteria.models = ["iPhone 13".to_string()].into_iter().collect();

        let filtered = criteria.apply(&df).unwrap();
        assert_eq!(filtered.height(), 1);
        assert_eq!(ratings_of(&filtered), vec![3.0]);
    }

    #[test]
    fn empty_model_set_matches_nothing() {
        let df = sample_df();
        let mut criteria = FilterCriteria::matching(&df);
        criteria.models.clear();

        assert_eq!(criteria.apply(&df).unwrap().height(), 0);
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let df = sample_df();
        let mut criteria = FilterCriteria::matching(&df);
        criteria.min_rating = 5.0;
        criteria.max_rating = 3.0;

        assert_eq!(criteria.apply(&df).unwrap().height(), 0);
    }

    #[test]
    fn filtering_is_idempotent() {
        let df = sample_df();
        let mut criteria = FilterCriteria::matching(&df);
        criteria.min_rating = 4.0;

        let once = criteria.apply(&df).unwrap();
        let again = criteria.apply(&df).unwrap();
        assert!(once.equals(&again));
    }
}
