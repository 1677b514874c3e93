//! Locate command - Show where a level's files live
//!
//! Resolves the level id through the index and reports the canonical record
//! path and the legacy file path, with whether each exists.

use crate::commands::StoreContext;
use crate::output::{self, key_value_table, OutputConfig, OutputFormat, Outputter};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LocateInfo {
    pub id: String,
    pub code: String,
    pub name: Option<String>,
    pub canonical_path: String,
    pub canonical_exists: bool,
    pub legacy_path: String,
    pub legacy_exists: bool,
}

fn yes_no(found: bool) -> String {
    if found {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}

impl Outputter for LocateInfo {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut pairs = vec![("Level", self.id.clone()), ("Code", self.code.clone())];
        if let Some(name) = &self.name {
            pairs.push(("Name", name.clone()));
        }
        pairs.extend([
            ("Record", self.canonical_path.clone()),
            ("Record exists", yes_no(self.canonical_exists)),
            ("Legacy", self.legacy_path.clone()),
            ("Legacy exists", yes_no(self.legacy_exists)),
        ]);
        key_value_table(&pairs, config)
    }
}

/// Run the locate command.
pub fn run(ctx: &StoreContext, level: &str, format: OutputFormat) -> Result<()> {
    let index = ctx.load_index()?;
    let descriptor = index.require(level)?;
    let store = ctx.store();

    let canonical = store.canonical_path(level);
    let legacy = store.locate_legacy(&index, level)?;

    let info = LocateInfo {
        id: descriptor.id.clone(),
        code: descriptor.code.clone(),
        name: descriptor.name().map(str::to_string),
        canonical_exists: canonical.exists(),
        canonical_path: canonical.display().to_string(),
        legacy_exists: legacy.is_found(),
        legacy_path: legacy.path().display().to_string(),
    };
    output::print(&info, format)
}
