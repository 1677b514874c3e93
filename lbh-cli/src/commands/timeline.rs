//! Timeline command - Record progression of one level and category

use crate::commands::{format_time, StoreContext};
use crate::output::{self, row_table, rows_csv, Column, OutputConfig, OutputFormat, Outputter};
use anyhow::Result;
use colored::Colorize;
use lbh_core::{create_timeline, Category, Timeline};
use serde::Serialize;

/// One record improvement (or tie) as a flat row.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineRow {
    pub time: i64,
    pub date: String,
    pub value: Option<f64>,
    pub players: String,
    pub tie: bool,
}

#[derive(Debug, Serialize)]
pub struct TimelineReport {
    pub level: String,
    pub category: Category,
    pub records: Vec<TimelineRow>,
}

impl TimelineReport {
    pub fn new(level: &str, category: Category, timeline: &Timeline) -> Self {
        let records = timeline
            .groups
            .iter()
            .map(|group| TimelineRow {
                time: group.time,
                date: format_time(group.time),
                value: group.value(),
                players: group
                    .entries
                    .iter()
                    .map(|e| e.display_name())
                    .collect::<Vec<_>>()
                    .join(", "),
                tie: group.is_tie_breaker,
            })
            .collect();
        Self {
            level: level.to_string(),
            category,
            records,
        }
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("Date", "date"),
        Column::new("Value", "value").right(),
        Column::new("Players", "players").width(48),
        Column::new("Tie", "tie"),
    ]
}

impl Outputter for TimelineReport {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = format!(
            "{} {} ({})\n",
            "TIMELINE".cyan().bold(),
            self.level.bold(),
            self.category
        );
        if self.records.is_empty() {
            output.push_str(&"No records".dimmed().to_string());
            return output;
        }
        output.push_str(&row_table(&self.records, &columns(), config));
        output
    }

    fn to_csv(&self) -> String {
        let columns = vec![
            Column::new("time", "time"),
            Column::new("value", "value"),
            Column::new("players", "players"),
            Column::new("tie", "tie"),
        ];
        rows_csv(&self.records, &columns)
    }
}

/// Run the timeline command.
pub fn run(
    ctx: &StoreContext,
    level: &str,
    category: Category,
    ties: bool,
    format: OutputFormat,
) -> Result<()> {
    let record = ctx.read_record(level)?;
    let history = record.top_history(category)?;
    let timeline = create_timeline(&history, ties);
    tracing::debug!("{} record groups from {} entries", timeline.len(), history.len());

    output::print(&TimelineReport::new(level, category, &timeline), format)
}
