//! Boxed terminal tables built with `tabled`.

use serde::Serialize;
use serde_json::Value;
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment, Modify, Width},
    Table,
};

use super::{Column, OutputConfig};

/// One table row per item, cells read from the serialized item by column key.
pub fn row_table<T: Serialize>(rows: &[T], columns: &[Column], config: &OutputConfig) -> String {
    if rows.is_empty() {
        return "(none)".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.header));
    for row in rows {
        let value = serde_json::to_value(row).unwrap_or(Value::Null);
        builder.push_record(columns.iter().map(|c| {
            let text = display(value.get(c.key));
            match (config.wrap_width, c.max_width) {
                (Some(_), Some(max)) => clip(&text, max),
                _ => text,
            }
        }));
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    for (i, _) in columns.iter().enumerate().filter(|(_, c)| c.right) {
        table.with(Modify::new(Columns::single(i)).with(Alignment::right()));
    }
    finish(table, config)
}

/// Two-column table of labels and values, labels right-aligned.
pub fn key_value_table(pairs: &[(&str, String)], config: &OutputConfig) -> String {
    let mut builder = Builder::default();
    for (label, value) in pairs {
        builder.push_record([*label, value.as_str()]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()));
    finish(table, config)
}

fn finish(mut table: Table, config: &OutputConfig) -> String {
    if let Some(width) = config.wrap_width {
        table.with(Width::wrap(width));
    }
    table.to_string()
}

fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Cut `text` to `max` characters, the last three replaced by `...`.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else if max <= 3 {
        text.chars().take(max).collect()
    } else {
        let kept: String = text.chars().take(max - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        player: &'static str,
        value: u64,
        note: Option<&'static str>,
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("Player", "player").width(8),
            Column::new("Value", "value").right(),
            Column::new("Note", "note"),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                player: "alice",
                value: 900,
                note: None,
            },
            Row {
                player: "bartholomew",
                value: 85,
                note: Some("tie"),
            },
        ]
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("alice", 8), "alice");
        assert_eq!(clip("bartholomew", 8), "barth...");
        assert_eq!(clip("ÅsaÖstlund", 6), "Åsa...");
        assert_eq!(clip("bob", 2), "bo");
    }

    #[test]
    fn test_piped_table_keeps_full_names() {
        let table = row_table(&rows(), &columns(), &OutputConfig::new(OutputFormat::Table));
        assert!(table.contains("bartholomew"));
        assert!(table.contains("Value"));
        // null cells show as a dash
        assert!(table.contains(" - "));
    }

    #[test]
    fn test_terminal_table_clips_wide_columns() {
        let config = OutputConfig {
            format: OutputFormat::Table,
            wrap_width: Some(200),
        };
        let table = row_table(&rows(), &columns(), &config);
        assert!(table.contains("barth..."));
        assert!(!table.contains("bartholomew"));
    }

    #[test]
    fn test_right_aligned_scores() {
        let table = row_table(&rows(), &columns(), &OutputConfig::new(OutputFormat::Table));
        let line = table.lines().find(|l| l.contains("bartholomew")).unwrap();
        assert!(line.contains("    85 "));
    }

    #[test]
    fn test_empty_rows() {
        let table = row_table::<Row>(&[], &columns(), &OutputConfig::new(OutputFormat::Table));
        assert_eq!(table, "(none)");
    }

    #[test]
    fn test_key_value_table() {
        let pairs = [("Level", "mAp2V".to_string()), ("Code", "01-05".to_string())];
        let table = key_value_table(&pairs, &OutputConfig::new(OutputFormat::Table));
        assert!(table.contains("Level"));
        assert!(table.contains("01-05"));
    }
}
