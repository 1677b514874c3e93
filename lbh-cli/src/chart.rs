//! Step-series chart rendering.
//!
//! One line per rank-1 holder, a dot on each player's latest point and a
//! "days ago" label under every axis tick.

use std::path::Path;

use anyhow::Result;
use lbh_core::{AxisTick, SeriesSet, SECONDS_PER_DAY};
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

/// Render `series` as an SVG file at `path`.
pub fn render_svg(
    path: &Path,
    size: (u32, u32),
    title: &str,
    series: &SeriesSet,
    ticks: &[AxisTick],
) -> Result<()> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    draw_series_chart(root, title, series, ticks)
}

/// Pad a degenerate range so the chart still has some extent.
fn padded(lo: f64, hi: f64, pad: f64) -> (f64, f64) {
    if hi > lo {
        let margin = (hi - lo) * 0.05;
        (lo - margin, hi + margin)
    } else {
        (lo - pad, hi + pad)
    }
}

pub fn draw_series_chart<DB>(
    root: DrawingArea<DB, plotters::coord::Shift>,
    title: &str,
    series: &SeriesSet,
    ticks: &[AxisTick],
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (t_min, t_max) = series
        .time_bounds()
        .ok_or(lbh_core::HistoryError::EmptySeriesSet)?;
    let (v_min, v_max) = series
        .value_bounds()
        .ok_or(lbh_core::HistoryError::EmptySeriesSet)?;

    let (x_lo, x_hi) = padded(t_min as f64, t_max as f64, SECONDS_PER_DAY as f64);
    let (y_lo, y_hi) = padded(v_min, v_max, 1.0);

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(25)
        .caption(title, FontDesc::new(FontFamily::SansSerif, 24.0, FontStyle::Normal))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    // x labels come from the ticks, not from the mesh
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc("Days ago")
        .y_desc("Budget")
        .label_style(FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Normal))
        .draw()?;

    let label_style = FontDesc::new(FontFamily::SansSerif, 14.0, FontStyle::Normal).color(&BLACK);
    for tick in ticks {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(tick.time, y_lo), (tick.time, y_hi)],
            BLACK.mix(0.15),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            tick.days_ago.to_string(),
            (tick.time, y_lo),
            label_style.clone(),
        )))?;
    }

    for (i, player) in series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        let points: Vec<(f64, f64)> = player
            .series
            .points()
            .map(|(t, v)| (t as f64, v))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(player.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        if let Some(&last) = points.last() {
            chart.draw_series(std::iter::once(Circle::new(last, 4, color.filled())))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .label_font(FontDesc::new(FontFamily::SansSerif, 14.0, FontStyle::Normal))
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}
