//! Series command - Rank-1 step series of one level and category
//!
//! Table output lists every rank-1 holder with their point count and value
//! range, followed by the time axis ticks. JSON output carries the full series;
//! CSV output has one row per point.

use crate::commands::{format_time, now_secs, StoreContext};
use crate::output::{self, row_table, rows_csv, Column, OutputConfig, OutputFormat, Outputter};
use anyhow::Result;
use colored::Colorize;
use lbh_core::{axis_ticks, series_for_category, AxisTick, Category, SeriesSet};
use serde::Serialize;

/// Series of one level/category together with its axis ticks.
#[derive(Debug, Serialize)]
pub struct SeriesReport {
    pub level: String,
    pub category: Category,
    pub series: SeriesSet,
    pub ticks: Vec<AxisTick>,
}

impl SeriesReport {
    /// Read the level's record and build its series and ticks.
    ///
    /// Fails with `EmptySeriesSet` when nobody ever held rank 1.
    pub fn build(ctx: &StoreContext, level: &str, category: Category, now: i64) -> Result<Self> {
        let record = ctx.read_record(level)?;
        let series = series_for_category(&record, category)?;
        let ticks = axis_ticks(&series, now)?;
        Ok(Self {
            level: level.to_string(),
            category,
            series,
            ticks,
        })
    }
}

#[derive(Serialize)]
struct PlayerRow<'a> {
    player: &'a str,
    points: usize,
    first: String,
    last: String,
    best: f64,
    latest: f64,
}

#[derive(Serialize)]
struct PointRow<'a> {
    player: &'a str,
    time: i64,
    value: f64,
}

#[derive(Serialize)]
struct TickRow {
    date: String,
    days_ago: i64,
}

impl SeriesReport {
    fn player_rows(&self) -> Vec<PlayerRow<'_>> {
        self.series
            .iter()
            .map(|p| {
                let series = &p.series;
                PlayerRow {
                    player: &p.name,
                    points: series.len(),
                    first: series.times.first().map(|&t| format_time(t)).unwrap_or_default(),
                    last: series.times.last().map(|&t| format_time(t)).unwrap_or_default(),
                    best: series.values.iter().copied().fold(f64::INFINITY, f64::min),
                    latest: series.values.last().copied().unwrap_or_default(),
                }
            })
            .collect()
    }
}

impl Outputter for SeriesReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} ({})\n",
            "SERIES".cyan().bold(),
            self.level.bold(),
            self.category
        ));
        let columns = vec![
            Column::new("Player", "player").width(32),
            Column::new("Points", "points").right(),
            Column::new("First", "first"),
            Column::new("Last", "last"),
            Column::new("Best", "best").right(),
            Column::new("Latest", "latest").right(),
        ];
        output.push_str(&row_table(&self.player_rows(), &columns, config));

        output.push_str(&format!("\n\n{}\n", "AXIS".cyan().bold()));
        let ticks: Vec<TickRow> = self
            .ticks
            .iter()
            .map(|t| TickRow {
                date: format_time(t.time.round() as i64),
                days_ago: t.days_ago,
            })
            .collect();
        let tick_columns = vec![
            Column::new("Date", "date"),
            Column::new("Days ago", "days_ago").right(),
        ];
        output.push_str(&row_table(&ticks, &tick_columns, config));
        output
    }

    fn to_csv(&self) -> String {
        let points: Vec<PointRow> = self
            .series
            .iter()
            .flat_map(|p| {
                p.series.points().map(move |(time, value)| PointRow {
                    player: &p.name,
                    time,
                    value,
                })
            })
            .collect();
        let columns = vec![
            Column::new("player", "player"),
            Column::new("time", "time"),
            Column::new("value", "value"),
        ];
        rows_csv(&points, &columns)
    }
}

/// Run the series command.
pub fn run(ctx: &StoreContext, level: &str, category: Category, format: OutputFormat) -> Result<()> {
    let report = SeriesReport::build(ctx, level, category, now_secs())?;
    output::print(&report, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lbh_core::{build_step_series, HistoryEntry};

    fn report() -> SeriesReport {
        let history = vec![
            HistoryEntry::new("A", 0, 100, 1),
            HistoryEntry::new("B", 86_400, 90, 1),
            HistoryEntry::new("A", 172_800, 80, 1),
        ];
        let series = build_step_series(&history, &["A".to_string(), "B".to_string()]);
        let ticks = axis_ticks(&series, 172_800).unwrap();
        SeriesReport {
            level: "mAp2V".into(),
            category: Category::Any,
            series,
            ticks,
        }
    }

    #[test]
    fn test_csv_has_one_row_per_point() {
        let csv = report().to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "player,time,value");
        assert_eq!(lines[1], "A,0,100.0");
        assert_eq!(lines[2], "A,172800,100.0");
        assert_eq!(lines[3], "A,172800,80.0");
        assert_eq!(lines[4], "B,86400,90.0");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_json_contains_series_and_ticks() {
        let json = output::render(&report(), &OutputConfig::new(OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["category"], "any");
        assert_eq!(value["series"][0]["name"], "A");
        assert_eq!(value["series"][1]["times"], serde_json::json!([86400]));
        assert_eq!(value["ticks"].as_array().unwrap().len(), 6);
        assert_eq!(value["ticks"][0]["days_ago"], 2);
    }

    #[test]
    fn test_player_rows() {
        let report = report();
        let rows = report.player_rows();
        assert_eq!(rows[0].player, "A");
        assert_eq!(rows[0].points, 3);
        assert_eq!(rows[0].best, 80.0);
        assert_eq!(rows[1].latest, 90.0);
    }
}
