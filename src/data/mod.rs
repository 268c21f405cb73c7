//! Data module - CSV loading and filtering

mod filter;
mod loader;

pub use filter::FilterCriteria;
pub use loader::{model_names, rating_bounds, DataLoader, LoaderError, MODEL_COL, RATING_COL};
