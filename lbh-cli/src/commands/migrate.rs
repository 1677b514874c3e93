//! Migrate command - Merge legacy history files into canonical records
//!
//! Walks the level index, replaces `top_history` of every level that has a
//! legacy `oldest_data_<code>.json` file and reports what happened per level.
//! Levels without a legacy file are skipped; failing levels are reported and
//! make the command exit non-zero after every other level was processed.

use crate::commands::StoreContext;
use crate::output::{self, row_table, rows_csv, Column, OutputConfig, OutputFormat, Outputter};
use anyhow::Result;
use colored::Colorize;
use lbh_core::{migrate, LevelOutcome, MigrateOptions, MigrationReport, Zone};
use serde::Serialize;

/// One row of the migration table.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationRow {
    pub id: String,
    pub code: Option<String>,
    pub status: &'static str,
    pub any: Option<usize>,
    pub unbroken: Option<usize>,
    pub detail: Option<String>,
}

impl MigrationRow {
    fn from_report(id: &str, code: Option<&str>, outcome: &LevelOutcome) -> Self {
        let (status, any, unbroken, detail) = match outcome {
            LevelOutcome::Merged {
                any,
                unbroken,
                written,
            } => (
                "merged",
                Some(*any),
                Some(*unbroken),
                (!written).then(|| "dry run, not written".to_string()),
            ),
            LevelOutcome::Skipped { legacy_file } => {
                ("skipped", None, None, Some(format!("no {}", legacy_file)))
            }
            LevelOutcome::Failed { reason } => ("failed", None, None, Some(reason.clone())),
        };
        Self {
            id: id.to_string(),
            code: code.map(str::to_string),
            status,
            any,
            unbroken,
            detail,
        }
    }
}

/// Migration result as shown to the user.
#[derive(Debug, Serialize)]
pub struct MigrationSummary {
    pub dry_run: bool,
    pub merged: usize,
    pub skipped: usize,
    pub failed: usize,
    pub levels: Vec<MigrationRow>,
}

impl From<&MigrationReport> for MigrationSummary {
    fn from(report: &MigrationReport) -> Self {
        Self {
            dry_run: report.dry_run,
            merged: report.merged(),
            skipped: report.skipped(),
            failed: report.failed(),
            levels: report
                .levels
                .iter()
                .map(|l| MigrationRow::from_report(&l.id, l.code.as_deref(), &l.outcome))
                .collect(),
        }
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("Level", "id"),
        Column::new("Code", "code"),
        Column::new("Status", "status"),
        Column::new("Any", "any").right(),
        Column::new("Unbroken", "unbroken").right(),
        Column::new("Detail", "detail").width(60),
    ]
}

impl Outputter for MigrationSummary {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = String::new();

        let title = if self.dry_run {
            "MIGRATION (dry run)"
        } else {
            "MIGRATION"
        };
        output.push_str(&format!("{}\n", title.cyan().bold()));
        output.push_str(&row_table(&self.levels, &columns(), config));
        output.push('\n');

        let failed = format!("{} failed", self.failed);
        output.push_str(&format!(
            "{} merged, {} skipped, {}",
            self.merged.to_string().green(),
            self.skipped.to_string().yellow(),
            if self.failed > 0 {
                failed.red().bold().to_string()
            } else {
                failed
            }
        ));
        output
    }

    fn to_csv(&self) -> String {
        rows_csv(&self.levels, &columns())
    }
}

/// Run the migrate command.
pub fn run(
    ctx: &StoreContext,
    levels: Vec<String>,
    dry_run: bool,
    zone: Zone,
    format: OutputFormat,
) -> Result<()> {
    let index = ctx.load_index()?;
    let store = ctx.store();

    let options = MigrateOptions {
        only: (!levels.is_empty()).then_some(levels),
        dry_run,
        zone,
    };
    tracing::debug!(
        "Migrating from {} (timezone: {}, dry run: {})",
        store.data_dir().display(),
        zone,
        dry_run
    );

    let report = migrate(&store, &index, &options);
    output::print(&MigrationSummary::from(&report), format)?;

    if report.has_failures() {
        anyhow::bail!("{} level(s) failed to migrate", report.failed());
    }
    Ok(())
}
