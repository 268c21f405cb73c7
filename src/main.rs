//! RateScope - iPhone Ratings CSV Dashboard & Chart Viewer
//!
//! A Rust application for exploring iPhone rating CSVs with filters and charts.

mod data;
mod stats;
mod charts;
mod gui;

use eframe::egui;
use gui::RateScopeApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1100.0, 650.0])
            .with_title("RateScope"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "RateScope",
        options,
        Box::new(|cc| Ok(Box::new(RateScopeApp::new(cc)))),
    )
}
