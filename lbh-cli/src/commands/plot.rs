//! Plot command - Render a level's step series as an SVG chart

use crate::chart;
use crate::commands::series::SeriesReport;
use crate::commands::{now_secs, StoreContext};
use crate::output::{self, OutputConfig, OutputFormat, Outputter};
use anyhow::{Context, Result};
use colored::Colorize;
use lbh_core::Category;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where a chart went and how many rank-1 holders it shows.
#[derive(Debug, Serialize)]
pub struct PlotWritten {
    pub level: String,
    pub category: Category,
    pub path: String,
    pub players: usize,
}

impl Outputter for PlotWritten {
    fn to_table(&self, _config: &OutputConfig) -> String {
        format!(
            "{} {} ({}): {} rank-1 holder(s)\n  {}",
            "PLOTTED".green().bold(),
            self.level.bold(),
            self.category,
            self.players,
            self.path.dimmed()
        )
    }
}

/// Default chart path: `<level>-<category>.svg` in the working directory.
pub fn default_output(level: &str, category: Category) -> PathBuf {
    PathBuf::from(format!("{}-{}.svg", level, category))
}

/// Run the plot command.
pub fn run(
    ctx: &StoreContext,
    level: &str,
    category: Category,
    output: Option<&Path>,
    size: (u32, u32),
    format: OutputFormat,
) -> Result<()> {
    let report = SeriesReport::build(ctx, level, category, now_secs())?;
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(level, category));

    let title = format!("{} ({})", level, category);
    chart::render_svg(&path, size, &title, &report.series, &report.ticks)
        .with_context(|| format!("Failed to render chart to {}", path.display()))?;
    tracing::info!("Rendered {} series to {:?}", report.series.len(), path);

    let written = PlotWritten {
        level: level.to_string(),
        category,
        path: path.display().to_string(),
        players: report.series.len(),
    };
    output::print(&written, format)
}
