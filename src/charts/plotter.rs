//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::stats::{DashboardData, Histogram};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints};

/// Color palette for chart series
pub const ACCENT_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const CHART_HEIGHT: f32 = 260.0;

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for a series index.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw the rating histogram with the density overlay.
    pub fn draw_histogram(ui: &mut egui::Ui, histogram: &Histogram, density: &[[f64; 2]]) {
        let bars: Vec<Bar> = histogram
            .bins
            .iter()
            .map(|bin| {
                let center = (bin.lower + bin.upper) / 2.0;
                let width = ((bin.upper - bin.lower) * 0.95).max(0.05);
                Bar::new(center, bin.count as f64)
                    .width(width)
                    .fill(ACCENT_COLOR.gamma_multiply(0.55))
            })
            .collect();

        Plot::new("rating_histogram")
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Star Rating")
            .y_axis_label("Count")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Ratings"));

                if !density.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(
                            density.iter().map(|p| [p[0], p[1]]),
                        ))
                        .color(PALETTE[3])
                        .width(2.0)
                        .name("Density"),
                    );
                }
            });
    }

    /// Draw the rating-value share breakdown as a pie with a legend.
    pub fn draw_share_pie(ui: &mut egui::Ui, shares: &[(f64, usize)]) {
        let total: usize = shares.iter().map(|(_, count)| *count).sum();
        if total == 0 {
            return;
        }

        let size = 220.0;
        let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = size * 0.46;

        // Fan of small convex polygons per slice; a single polygon would not
        // stay convex once a slice passes half the circle
        let mut start = -std::f32::consts::FRAC_PI_2;
        for (i, (_, count)) in shares.iter().enumerate() {
            let sweep = (*count as f32 / total as f32) * std::f32::consts::TAU;
            let color = Self::series_color(i);
            let steps = ((sweep / 0.15).ceil() as usize).max(2);

            let mut prev = center + egui::vec2(start.cos(), start.sin()) * radius;
            for step in 1..=steps {
                let angle = start + sweep * step as f32 / steps as f32;
                let next = center + egui::vec2(angle.cos(), angle.sin()) * radius;
                painter.add(egui::Shape::convex_polygon(
                    vec![center, prev, next],
                    color,
                    egui::Stroke::NONE,
                ));
                prev = next;
            }
            start += sweep;
        }

        ui.add_space(6.0);
        for (i, (value, count)) in shares.iter().enumerate() {
            ui.horizontal(|ui| {
                let (swatch, _) =
                    ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(swatch, 2.0, Self::series_color(i));
                let pct = 100.0 * *count as f64 / total as f64;
                ui.label(RichText::new(format!("{value:.1} ★  {pct:.1}%")).size(12.0));
            });
        }
    }

    /// Draw a ranked view as horizontal bars, best entry on top.
    pub fn draw_ranked_bars(
        ui: &mut egui::Ui,
        id: &str,
        entries: &[(String, f64)],
        value_label: &str,
    ) {
        let n = entries.len();
        // Row i sits at y = n-1-i so rank one renders at the top
        let labels: Vec<String> = entries.iter().rev().map(|(name, _)| name.clone()).collect();

        let bars: Vec<Bar> = entries
            .iter()
            .enumerate()
            .map(|(i, (_, value))| {
                Bar::new((n - 1 - i) as f64, *value)
                    .width(0.6)
                    .fill(Self::series_color(i))
            })
            .collect();

        Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label(value_label.to_string())
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 0.25 && idx >= 0.0 && (idx as usize) < labels.len() {
                    labels[idx as usize].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().name(value_label.to_string()));
            });
    }

    /// Convenience for count-valued ranked views.
    pub fn draw_count_bars(ui: &mut egui::Ui, id: &str, entries: &[(String, usize)], label: &str) {
        let as_f64: Vec<(String, f64)> = entries
            .iter()
            .map(|(name, count)| (name.clone(), *count as f64))
            .collect();
        Self::draw_ranked_bars(ui, id, &as_f64, label);
    }

    /// All four dashboard charts for one computed view bundle.
    pub fn draw_all(ui: &mut egui::Ui, data: &DashboardData) {
        let half = (ui.available_width() - 40.0) / 2.0;

        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_width(half);
                ui.label(RichText::new("Distribution of Star Ratings").size(14.0).strong());
                Self::draw_histogram(ui, &data.histogram, &data.density);
            });
            ui.add_space(10.0);
            ui.vertical(|ui| {
                ui.set_width(half);
                ui.label(RichText::new("Star Rating Share").size(14.0).strong());
                Self::draw_share_pie(ui, &data.rating_share);
            });
        });

        ui.add_space(12.0);
        ui.label(RichText::new("Average Rating by Model").size(14.0).strong());
        Self::draw_ranked_bars(
            ui,
            "avg_rating_bars",
            &data.average_by_model,
            "Average Star Rating",
        );

        ui.add_space(12.0);
        ui.label(RichText::new("Most Common Models").size(14.0).strong());
        Self::draw_count_bars(ui, "model_count_bars", &data.model_counts, "Reviews");
    }
}
