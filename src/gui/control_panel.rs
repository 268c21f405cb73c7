//! Control Panel Widget
//! Left side panel with the file picker, filter controls, and status line.

use crate::charts::ACCENT_COLOR;
use crate::data::{model_names, FilterCriteria};
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::DataFrame;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub all_models: Vec<String>,
    pub criteria: FilterCriteria,
    pub bounds: (f64, f64),
    pub status: String,
    pub export_enabled: bool,
    pub has_data: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            all_models: Vec::new(),
            criteria: FilterCriteria {
                models: BTreeSet::new(),
                min_rating: 0.0,
                max_rating: 5.0,
            },
            bounds: (0.0, 5.0),
            status: "Ready".to_string(),
            export_enabled: false,
            has_data: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the filter controls for a freshly loaded dataset.
    pub fn update_dataset(&mut self, df: &DataFrame) {
        self.all_models = model_names(df);
        self.criteria = FilterCriteria::matching(df);
        self.bounds = (self.criteria.min_rating, self.criteria.max_rating);
        self.has_data = true;
        self.export_enabled = false;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(RichText::new("📱 RateScope").size(22.0).color(ACCENT_COLOR));
            ui.label(
                RichText::new("iPhone Ratings Dashboard")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Options =====
        ui.label(RichText::new("🔍 Filter Options").size(14.0).strong());
        ui.add_space(8.0);

        if !self.has_data {
            ui.label(
                RichText::new("Load a CSV to enable filters")
                    .size(12.0)
                    .color(Color32::GRAY),
            );
        } else {
            ui.label("iPhone Models:");
            ui.horizontal(|ui| {
                if ui.small_button("All").clicked() {
                    self.criteria.models = self.all_models.iter().cloned().collect();
                    action = ControlPanelAction::FilterChanged;
                }
                if ui.small_button("None").clicked() {
                    self.criteria.models.clear();
                    action = ControlPanelAction::FilterChanged;
                }
                ui.label(
                    RichText::new(format!(
                        "{}/{} selected",
                        self.criteria.models.len(),
                        self.all_models.len()
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
            });

            let models = self.all_models.clone();
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                        for model in &models {
                            let mut checked = self.criteria.models.contains(model);
                            if ui.checkbox(&mut checked, model).changed() {
                                if checked {
                                    self.criteria.models.insert(model.clone());
                                } else {
                                    self.criteria.models.remove(model);
                                }
                                action = ControlPanelAction::FilterChanged;
                            }
                        }
                    });
                });

            ui.add_space(10.0);
            ui.label("Star Rating Range:");

            let (lo, hi) = self.bounds;
            let min_changed = ui
                .add(egui::Slider::new(&mut self.criteria.min_rating, lo..=hi).text("Min"))
                .changed();
            let max_changed = ui
                .add(egui::Slider::new(&mut self.criteria.max_rating, lo..=hi).text("Max"))
                .changed();

            // Keep the band valid: dragging one bound past the other drags
            // the other bound along
            if min_changed && self.criteria.min_rating > self.criteria.max_rating {
                self.criteria.max_rating = self.criteria.min_rating;
            }
            if max_changed && self.criteria.max_rating < self.criteria.min_rating {
                self.criteria.min_rating = self.criteria.max_rating;
            }
            if min_changed || max_changed {
                action = ControlPanelAction::FilterChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("saved") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set the status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    FilterChanged,
    ExportPng,
}
