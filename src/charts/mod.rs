//! Charts module - Chart rendering

mod plotter;
mod report;

pub use plotter::{ChartPlotter, ACCENT_COLOR, PALETTE};
pub use report::render_report;
