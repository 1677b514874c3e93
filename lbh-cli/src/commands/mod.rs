//! Command implementations for the lbh CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod completions;
pub mod locate;
pub mod migrate;
pub mod plot;
pub mod series;
pub mod timeline;

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use lbh_core::{load_level_index, CanonicalRecord, JsonStore, LevelIndex};
use std::path::PathBuf;

/// Store locations resolved from flags, config and defaults.
#[derive(Debug, Clone)]
pub struct StoreContext {
    pub data_dir: PathBuf,
    pub level_index: PathBuf,
}

impl StoreContext {
    pub fn store(&self) -> JsonStore {
        JsonStore::new(&self.data_dir)
    }

    pub fn load_index(&self) -> Result<LevelIndex> {
        load_level_index(&self.level_index).with_context(|| {
            format!(
                "Failed to load level index from {}",
                self.level_index.display()
            )
        })
    }

    pub fn read_record(&self, level_id: &str) -> Result<CanonicalRecord> {
        self.store()
            .read_canonical(level_id)
            .with_context(|| format!("Failed to read canonical record for level {}", level_id))
    }
}

/// Current time in epoch seconds.
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Render epoch seconds as a local `YYYY-MM-DD HH:MM` string.
pub fn format_time(secs: i64) -> String {
    Local
        .timestamp_opt(secs, 0)
        .earliest()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}
