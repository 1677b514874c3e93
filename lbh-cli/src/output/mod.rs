//! Rendering of command results as a table, JSON or CSV.
//!
//! Commands build a serializable report and implement [`Outputter`] on it.
//! Table and CSV rows are read back from the serialized report by field
//! name, so one row struct serves both formats.

use std::io::IsTerminal;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

mod csv;
mod table;

pub use self::csv::{record_csv, rows_csv};
pub use self::table::{key_value_table, row_table};

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Boxed tables for reading in a terminal (default)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Comma-separated rows with a header line
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Terminal width tables are wrapped to. `None` when stdout is piped,
    /// in which case long cells are never clipped either.
    pub wrap_width: Option<usize>,
}

impl OutputConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            wrap_width: None,
        }
    }

    /// Wrap to the terminal when stdout is one.
    pub fn for_stdout(format: OutputFormat) -> Self {
        let wrap_width = std::io::stdout().is_terminal().then(|| {
            terminal_size::terminal_size()
                .map(|(w, _)| w.0 as usize)
                .unwrap_or(80)
        });
        Self { format, wrap_width }
    }
}

/// A table or CSV column: header text and the serialized field it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub key: &'static str,
    /// Clip longer cells in a terminal table.
    pub max_width: Option<usize>,
    pub right: bool,
}

impl Column {
    pub fn new(header: &'static str, key: &'static str) -> Self {
        Self {
            header,
            key,
            max_width: None,
            right: false,
        }
    }

    pub fn width(mut self, max: usize) -> Self {
        self.max_width = Some(max);
        self
    }

    /// Right-align, for counts and scores.
    pub fn right(mut self) -> Self {
        self.right = true;
        self
    }
}

/// A command result that knows how to draw itself as a table.
///
/// JSON is always the serde form. CSV defaults to a header plus one line of
/// the top-level fields; reports with row data override it.
pub trait Outputter: Serialize {
    fn to_table(&self, config: &OutputConfig) -> String;

    fn to_csv(&self) -> String {
        record_csv(self)
    }
}

pub fn render<T: Outputter>(data: &T, config: &OutputConfig) -> Result<String> {
    Ok(match config.format {
        OutputFormat::Table => data.to_table(config),
        OutputFormat::Json => {
            serde_json::to_string_pretty(data).context("Failed to serialize output")?
        }
        OutputFormat::Csv => data.to_csv(),
    })
}

/// Render `data` for stdout and print it.
pub fn print<T: Outputter>(data: &T, format: OutputFormat) -> Result<()> {
    println!("{}", render(data, &OutputConfig::for_stdout(format))?);
    Ok(())
}
