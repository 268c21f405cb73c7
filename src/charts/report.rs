//! Static Report Renderer
//! Writes the four dashboard charts into a single PNG.

use std::error::Error;
use std::path::Path;

use anyhow::anyhow;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::stats::DashboardData;

const BAR_BLUE: RGBColor = RGBColor(52, 152, 219);
const BAR_GREEN: RGBColor = RGBColor(46, 204, 113);
const BAR_PURPLE: RGBColor = RGBColor(155, 89, 182);
const CURVE_ORANGE: RGBColor = RGBColor(243, 156, 18);

/// Render the computed views as a 2x2 PNG report.
pub fn render_report(
    data: &DashboardData,
    path: &Path,
    width: u32,
    height: u32,
) -> anyhow::Result<()> {
    draw(data, path, width, height).map_err(|e| anyhow!("failed to render chart report: {e}"))
}

fn draw(
    data: &DashboardData,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("RateScope Report", ("sans-serif", 26))?;
    let areas = root.split_evenly((2, 2));

    draw_histogram(&areas[0], data)?;
    draw_share(&areas[1], data)?;
    draw_ranked(
        &areas[2],
        "Average Rating by Model",
        &data.average_by_model,
        "Average Star Rating",
    )?;
    let counts: Vec<(String, f64)> = data
        .model_counts
        .iter()
        .map(|(model, count)| (model.clone(), *count as f64))
        .collect();
    draw_ranked(&areas[3], "Most Common Models", &counts, "Reviews")?;

    root.present()?;
    Ok(())
}

fn draw_histogram(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    data: &DashboardData,
) -> Result<(), Box<dyn Error>> {
    let (lo, hi) = data.histogram.span().unwrap_or((0.0, 5.0));
    // Degenerate span still needs a drawable axis
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
    let max_count = data
        .histogram
        .bins
        .iter()
        .map(|b| b.count)
        .max()
        .unwrap_or(0) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption("Distribution of Star Ratings", ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d(lo..hi, 0f64..(max_count * 1.15).max(1.0))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Count")
        .draw()?;

    chart.draw_series(data.histogram.bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.lower, 0.0), (bin.upper, bin.count as f64)],
            BAR_BLUE.mix(0.6).filled(),
        )
    }))?;

    if !data.density.is_empty() {
        chart.draw_series(LineSeries::new(
            data.density.iter().map(|p| (p[0], p[1])),
            &CURVE_ORANGE,
        ))?;
    }
    Ok(())
}

fn draw_share(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    data: &DashboardData,
) -> Result<(), Box<dyn Error>> {
    let n = data.rating_share.len();
    let max_count = data
        .rating_share
        .iter()
        .map(|(_, count)| *count)
        .max()
        .unwrap_or(0) as f64;
    let labels: Vec<String> = data
        .rating_share
        .iter()
        .map(|(value, _)| format!("{value:.1}"))
        .collect();

    let mut chart = ChartBuilder::on(area)
        .caption("Star Rating Share", ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d(0f64..n.max(1) as f64, 0f64..(max_count * 1.15).max(1.0))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.min(12))
        .x_label_formatter(&|x| {
            let idx = x.floor() as usize;
            labels.get(idx).cloned().unwrap_or_default()
        })
        .y_desc("Count")
        .draw()?;

    chart.draw_series(data.rating_share.iter().enumerate().map(|(i, (_, count))| {
        Rectangle::new(
            [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, *count as f64)],
            BAR_GREEN.mix(0.7).filled(),
        )
    }))?;
    Ok(())
}

fn draw_ranked(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    entries: &[(String, f64)],
    x_desc: &str,
) -> Result<(), Box<dyn Error>> {
    let n = entries.len();
    let max_value = entries.iter().map(|(_, value)| *value).fold(0.0, f64::max);
    // Slot y holds the entry ranked n-1-y, so rank one sits on top
    let names: Vec<String> = entries.iter().rev().map(|(name, _)| name.clone()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(30)
        .y_label_area_size(150)
        .build_cartesian_2d(0f64..(max_value * 1.15).max(1.0), 0f64..n.max(1) as f64)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n.max(1))
        .y_label_formatter(&|y| {
            let idx = y.floor() as usize;
            names.get(idx).cloned().unwrap_or_default()
        })
        .x_desc(x_desc)
        .draw()?;

    chart.draw_series(entries.iter().enumerate().map(|(i, (_, value))| {
        let y = (n - 1 - i) as f64;
        Rectangle::new(
            [(0.0, y + 0.2), (*value, y + 0.8)],
            BAR_PURPLE.mix(0.7).filled(),
        )
    }))?;
    Ok(())
}
