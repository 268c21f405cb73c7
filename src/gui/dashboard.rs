//! Dashboard Widget
//! Central scrollable panel: filtered table, top-rated table, and charts.

use crate::charts::ChartPlotter;
use crate::stats::{DashboardData, RatingRow};
use egui::{Color32, RichText, ScrollArea};
use polars::prelude::*;

/// Cap on rows rendered in the filtered table.
const MAX_TABLE_ROWS: usize = 200;

/// Scrollable dashboard displaying the filtered table and derived views.
pub struct Dashboard {
    /// Rows passing the current filters (None until a file is loaded).
    pub filtered: Option<DataFrame>,
    /// Computed views; None when no row passes the filters.
    pub data: Option<DashboardData>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            filtered: None,
            data: None,
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything (before loading a new file).
    pub fn clear(&mut self) {
        self.filtered = None;
        self.data = None;
    }

    /// Install a freshly computed view.
    pub fn set_view(&mut self, filtered: DataFrame, data: Option<DashboardData>) {
        self.filtered = Some(filtered);
        self.data = data;
    }

    /// Draw the dashboard.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(filtered) = &self.filtered else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Open a ratings CSV to get started").size(20.0));
            });
            return;
        };

        let Some(data) = &self.data else {
            // Explicit empty state instead of charts over zero rows
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("No rows match the current filters")
                        .size(18.0)
                        .color(Color32::GRAY),
                );
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("📋 Filtered Reviews ({} rows)", data.row_count))
                        .size(16.0)
                        .strong(),
                );
                ui.add_space(6.0);
                Self::draw_filtered_table(ui, filtered);

                ui.add_space(16.0);
                ui.separator();
                ui.add_space(8.0);

                ui.label(
                    RichText::new("🏆 Top 10 Highest Rated iPhones")
                        .size(16.0)
                        .strong(),
                );
                ui.add_space(6.0);
                Self::draw_top_rated(ui, &data.top_rated);

                ui.add_space(16.0);
                ui.separator();
                ui.add_space(8.0);

                ChartPlotter::draw_all(ui, data);
                ui.add_space(12.0);
            });
    }

    /// Filtered table: every column, rows capped at [`MAX_TABLE_ROWS`].
    fn draw_filtered_table(ui: &mut egui::Ui, df: &DataFrame) {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let columns = df.get_columns();
        let shown = df.height().min(MAX_TABLE_ROWS);

        ScrollArea::both()
            .id_salt("filtered_table_scroll")
            .max_height(280.0)
            .show(ui, |ui| {
                egui::Grid::new("filtered_table")
                    .striped(true)
                    .min_col_width(90.0)
                    .spacing([14.0, 4.0])
                    .show(ui, |ui| {
                        for name in &names {
                            ui.label(RichText::new(name).strong().size(12.0));
                        }
                        ui.end_row();

                        for i in 0..shown {
                            for col in columns {
                                let text = col
                                    .get(i)
                                    .ok()
                                    .filter(|v| !v.is_null())
                                    .map(|v| v.to_string().trim_matches('"').to_string())
                                    .unwrap_or_default();
                                ui.label(RichText::new(text).size(12.0));
                            }
                            ui.end_row();
                        }
                    });
            });

        if df.height() > MAX_TABLE_ROWS {
            ui.label(
                RichText::new(format!(
                    "Showing first {} of {} rows",
                    MAX_TABLE_ROWS,
                    df.height()
                ))
                .size(11.0)
                .color(Color32::GRAY),
            );
        }
    }

    /// Two-column table of the top-rated rows.
    fn draw_top_rated(ui: &mut egui::Ui, rows: &[RatingRow]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("top_rated_table")
                    .striped(true)
                    .min_col_width(140.0)
                    .spacing([14.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Product Name").strong().size(12.0));
                        ui.label(RichText::new("Star Rating").strong().size(12.0));
                        ui.end_row();

                        for row in rows {
                            ui.label(RichText::new(&row.model).size(12.0));
                            ui.label(RichText::new(format!("{:.1}", row.rating)).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    }
}
