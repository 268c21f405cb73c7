//! RateScope Main Application
//! Main window with control panel and dashboard.

use crate::charts::render_report;
use crate::data::DataLoader;
use crate::gui::{ControlPanel, ControlPanelAction, Dashboard};
use crate::stats::{AggregateError, DashboardData};
use egui::SidePanel;
use polars::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Complete { df: DataFrame, path: PathBuf },
    Error(String),
}

/// Main application window.
pub struct RateScopeApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    dashboard: Dashboard,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl RateScopeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            dashboard: Dashboard::new(),
            load_rx: None,
            is_loading: false,
        }
    }

    /// Handle CSV file selection - parsing runs on a background thread.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.dashboard.clear();
            self.control_panel.csv_path = Some(path.clone());
            self.control_panel.set_status("Loading CSV file...");
            self.is_loading = true;

            let (tx, rx) = channel();
            self.load_rx = Some(rx);

            thread::spawn(move || {
                let path_str = path.to_string_lossy().to_string();
                match DataLoader::read_ratings_csv(&path_str) {
                    Ok(df) => {
                        let _ = tx.send(LoadResult::Complete { df, path });
                    }
                    Err(e) => {
                        let _ = tx.send(LoadResult::Error(e.to_string()));
                    }
                }
            });
        }
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Complete { df, path } => {
                        self.loader.set_dataframe(df, path);
                        let rows = self.loader.get_row_count();
                        let cols = self.loader.get_columns().len();
                        if let Some(path) = self.loader.get_file_path() {
                            log::info!(
                                "Loaded {} rows, {} columns from {}",
                                rows,
                                cols,
                                path.display()
                            );
                        }
                        if let Some(df) = self.loader.get_dataframe() {
                            self.control_panel.update_dataset(df);
                        }
                        self.recompute();
                        self.control_panel
                            .set_status(&format!("Loaded {} rows, {} columns", rows, cols));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        log::error!("CSV load failed: {error}");
                        self.control_panel
                            .set_status(&format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Rerun the filter and view computation against the loaded dataset.
    /// Called on load completion and on every filter change.
    fn recompute(&mut self) {
        let Some(df) = self.loader.get_dataframe() else {
            return;
        };

        match self.control_panel.criteria.apply(df) {
            Ok(filtered) => {
                let data = match DashboardData::build(&filtered) {
                    Ok(data) => Some(data),
                    Err(AggregateError::EmptyInput) => None,
                    Err(e) => {
                        log::error!("view computation failed: {e}");
                        self.control_panel.set_status(&format!("Error: {}", e));
                        None
                    }
                };

                self.control_panel.export_enabled = data.is_some();
                self.control_panel.set_status(&format!(
                    "{} of {} rows match",
                    filtered.height(),
                    df.height()
                ));
                self.dashboard.set_view(filtered, data);
            }
            Err(e) => {
                log::error!("filter failed: {e}");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Handle PNG export - render the charts into a single static report.
    fn handle_export_png(&mut self) {
        let Some(data) = self.dashboard.data.clone() else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        // Ask user for output location
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("ratescope_report.png")
            .save_file()
        else {
            return; // User cancelled
        };

        match render_report(&data, &path, 1600, 1200) {
            Ok(()) => {
                log::info!("Chart report written to {}", path.display());
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.control_panel
                    .set_status(&format!("Report saved: {}", name));
            }
            Err(e) => {
                log::error!("export failed: {e:#}");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for RateScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::FilterChanged => self.recompute(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui);
        });
    }
}
