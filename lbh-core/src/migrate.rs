//! Batch migration of legacy history into canonical records.
//!
//! Each level is handled independently: a level without a legacy file is
//! skipped, a level that fails is recorded as failed, and the loop moves on.
//! A canonical record is only written after its merge fully succeeded.

use serde::Serialize;

use crate::error::Result;
use crate::level::LevelIndex;
use crate::merge::merge_history;
use crate::store::{JsonStore, LegacyLookup};
use crate::time::{normalize_history_in, Zone};
use crate::types::Category;

/// Knobs for a migration run.
#[derive(Clone, Debug, Default)]
pub struct MigrateOptions {
    /// Restrict the run to these level ids, in this order. `None` means
    /// every level in the index.
    pub only: Option<Vec<String>>,
    /// Do everything except writing canonical records.
    pub dry_run: bool,
    /// Zone legacy wall-clock times are interpreted in.
    pub zone: Zone,
}

/// What happened to one level.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LevelOutcome {
    Merged {
        any: usize,
        unbroken: usize,
        written: bool,
    },
    Skipped {
        legacy_file: String,
    },
    Failed {
        reason: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelReport {
    pub id: String,
    pub code: Option<String>,
    #[serde(flatten)]
    pub outcome: LevelOutcome,
}

/// Per-level outcomes of a migration run, in processing order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    pub levels: Vec<LevelReport>,
    pub dry_run: bool,
}

impl MigrationReport {
    fn count(&self, pred: impl Fn(&LevelOutcome) -> bool) -> usize {
        self.levels.iter().filter(|l| pred(&l.outcome)).count()
    }

    pub fn merged(&self) -> usize {
        self.count(|o| matches!(o, LevelOutcome::Merged { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, LevelOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, LevelOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Migrate a single level.
///
/// Returns `Skipped` when no legacy file exists for the level; any other
/// problem is an error and nothing is written.
pub fn migrate_level(
    store: &JsonStore,
    index: &LevelIndex,
    id: &str,
    options: &MigrateOptions,
) -> Result<LevelOutcome> {
    let legacy_path = match store.locate_legacy(index, id)? {
        LegacyLookup::Found(path) => path,
        LegacyLookup::NotFound(path) => {
            return Ok(LevelOutcome::Skipped {
                legacy_file: path.display().to_string(),
            })
        }
    };

    let legacy = store.read_legacy(&legacy_path)?;
    let legacy = normalize_history_in(legacy, options.zone)?;
    let record = store.read_canonical(id)?;
    let merged = merge_history(record, &legacy)?;

    if !options.dry_run {
        store.write_canonical(id, &merged)?;
    }

    let count = |c: Category| legacy.category(c).map_or(0, <[_]>::len);
    Ok(LevelOutcome::Merged {
        any: count(Category::Any),
        unbroken: count(Category::Unbroken),
        written: !options.dry_run,
    })
}

/// Migrate every selected level, continuing past failures.
pub fn migrate(store: &JsonStore, index: &LevelIndex, options: &MigrateOptions) -> MigrationReport {
    let ids: Vec<String> = match &options.only {
        Some(ids) => ids.clone(),
        None => index.iter().map(|level| level.id.clone()).collect(),
    };

    let mut report = MigrationReport {
        levels: Vec::with_capacity(ids.len()),
        dry_run: options.dry_run,
    };

    for id in ids {
        let code = index.get(&id).map(|level| level.code.clone());
        let outcome = match migrate_level(store, index, &id, options) {
            Ok(outcome) => outcome,
            Err(e) => LevelOutcome::Failed {
                reason: e.to_string(),
            },
        };

        match &outcome {
            LevelOutcome::Merged { any, unbroken, .. } => {
                tracing::info!(
                    "[merge] {} ({}): any={} unbroken={}",
                    code.as_deref().unwrap_or("?"),
                    id,
                    any,
                    unbroken
                );
            }
            LevelOutcome::Skipped { legacy_file } => {
                tracing::debug!("[skip] {}: no legacy file at {}", id, legacy_file);
            }
            LevelOutcome::Failed { reason } => {
                tracing::warn!("[fail] {}: {}", id, reason);
            }
        }

        report.levels.push(LevelReport { id, code, outcome });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let report = MigrationReport {
            levels: vec![
                LevelReport {
                    id: "a".into(),
                    code: Some("01-01".into()),
                    outcome: LevelOutcome::Merged {
                        any: 1,
                        unbroken: 0,
                        written: true,
                    },
                },
                LevelReport {
                    id: "b".into(),
                    code: None,
                    outcome: LevelOutcome::Failed {
                        reason: "Unknown level id: b".into(),
                    },
                },
                LevelReport {
                    id: "c".into(),
                    code: Some("01-03".into()),
                    outcome: LevelOutcome::Skipped {
                        legacy_file: "data/oldest_data_1-3.json".into(),
                    },
                },
            ],
            dry_run: false,
        };
        assert_eq!(report.merged(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_outcome_serialization() {
        let report = LevelReport {
            id: "a".into(),
            code: Some("01-01".into()),
            outcome: LevelOutcome::Skipped {
                legacy_file: "x".into(),
            },
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "skipped");
        assert_eq!(value["legacy_file"], "x");
        assert_eq!(value["id"], "a");
    }
}
