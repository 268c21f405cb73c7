//! CSV Data Loader Module
//! Handles CSV file loading and column validation using Polars.

use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

/// Column holding the model name of each review row.
pub const MODEL_COL: &str = "Product Name";
/// Column holding the numeric star rating of each review row.
pub const RATING_COL: &str = "Star Rating";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("Column '{0}' is not numeric")]
    NotNumeric(&'static str),
}

/// Handles CSV file loading with Polars for high performance.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Parse and validate a ratings CSV. The header row is taken verbatim;
    /// extra columns beyond the required two are kept and passed through.
    /// Runs on the background loading thread, so it does not touch state.
    pub fn read_ratings_csv(file_path: &str) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        Self::validate(&df)?;
        Ok(df)
    }

    /// Check the required columns exist and the rating column is numeric.
    fn validate(df: &DataFrame) -> Result<(), LoaderError> {
        if df.column(MODEL_COL).is_err() {
            return Err(LoaderError::MissingColumn(MODEL_COL));
        }
        let rating = df
            .column(RATING_COL)
            .map_err(|_| LoaderError::MissingColumn(RATING_COL))?;

        if !matches!(
            rating.dtype(),
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
        ) {
            return Err(LoaderError::NotNumeric(RATING_COL));
        }
        Ok(())
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Set DataFrame directly (used for async loading)
    pub fn set_dataframe(&mut self, df: DataFrame, path: PathBuf) {
        self.df = Some(df);
        self.file_path = Some(path);
    }
}

/// Distinct model names present in the dataset, sorted.
pub fn model_names(df: &DataFrame) -> Vec<String> {
    df.column(MODEL_COL)
        .ok()
        .and_then(|col| col.unique().ok())
        .map(|unique| {
            let series = unique.as_materialized_series();
            let mut names: Vec<String> = (0..series.len())
                .filter_map(|i| {
                    let val = series.get(i).ok()?;
                    if val.is_null() {
                        None
                    } else {
                        Some(val.to_string().trim_matches('"').to_string())
                    }
                })
                .collect();
            names.sort();
            names
        })
        .unwrap_or_default()
}

/// Observed (min, max) of the rating column, ignoring nulls.
/// None when the dataset has no non-null rating.
pub fn rating_bounds(df: &DataFrame) -> Option<(f64, f64)> {
    let col = df.column(RATING_COL).ok()?;
    let casted = col.cast(&DataType::Float64).ok()?;
    let ca = casted.f64().ok()?;
    match (ca.min(), ca.max()) {
        (Some(min), Some(max)) => Some((min, max)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_valid_csv() {
        let file = write_csv(
            "Product Name,Star Rating,Region\n\
             iPhone 12,4.5,IN\n\
             iPhone 13,3.0,IN\n",
        );
        let df = DataLoader::read_ratings_csv(file.path().to_str().unwrap())
            .expect("load should succeed");

        assert_eq!(df.height(), 2);
        // Extra columns pass through untouched
        assert!(df.column("Region").is_ok());
    }

    #[test]
    fn missing_rating_column_is_rejected() {
        let file = write_csv("Product Name,Price\niPhone 12,799\n");
        let err = DataLoader::read_ratings_csv(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(RATING_COL)));
    }

    #[test]
    fn non_numeric_rating_column_is_rejected() {
        let file = write_csv(
            "Product Name,Star Rating\n\
             iPhone 12,great\n\
             iPhone 13,bad\n",
        );
        let err = DataLoader::read_ratings_csv(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LoaderError::NotNumeric(RATING_COL)));
    }

    #[test]
    fn loader_state_tracks_the_installed_dataset() {
        let file = write_csv(
            "Product Name,Star Rating\n\
             iPhone 12,4.5\n\
             iPhone 13,3.0\n",
        );
        let path = file.path().to_path_buf();
        let df = DataLoader::read_ratings_csv(path.to_str().unwrap()).unwrap();

        let mut loader = DataLoader::new();
        assert!(loader.get_dataframe().is_none());

        loader.set_dataframe(df, path.clone());
        assert_eq!(loader.get_row_count(), 2);
        assert_eq!(loader.get_columns(), vec![MODEL_COL, RATING_COL]);
        assert_eq!(loader.get_file_path(), Some(&path));
    }

    #[test]
    fn model_names_are_distinct_and_sorted() {
        let file = write_csv(
            "Product Name,Star Rating\n\
             iPhone 13,3.0\n\
             iPhone 12,4.5\n\
             iPhone 12,5.0\n",
        );
        let df = DataLoader::read_ratings_csv(file.path().to_str().unwrap()).unwrap();
        let names = model_names(&df);
        assert_eq!(names, vec!["iPhone 12".to_string(), "iPhone 13".to_string()]);
    }

    #[test]
    fn rating_bounds_cover_observed_range() {
        let file = write_csv(
            "Product Name,Star Rating\n\
             iPhone 12,4.5\n\
             iPhone 12,5.0\n\
             iPhone 13,3.0\n",
        );
        let df = DataLoader::read_ratings_csv(file.path().to_str().unwrap()).unwrap();
        let (min, max) = rating_bounds(&df).unwrap();
        assert_eq!(min, 3.0);
        assert_eq!(max, 5.0);
    }
}
