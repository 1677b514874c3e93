//! lbh core - leaderboard history migration and series reconstruction.
//!
//! Two pipelines share one data model:
//!
//! - **Migration**: level index → legacy file lookup → timestamp
//!   normalization → merge into the canonical record → write back.
//! - **Series**: canonical record → rank-1 selection → step series →
//!   axis ticks, ready for a renderer.
//!
//! # Usage
//!
//! ```no_run
//! use lbh_core::{load_level_index, migrate, JsonStore, MigrateOptions};
//! use std::path::Path;
//!
//! let index = load_level_index(Path::new("json/campaign_levels.json"))?;
//! let store = JsonStore::new("data");
//! let report = migrate(&store, &index, &MigrateOptions::default());
//! println!("{} merged, {} skipped", report.merged(), report.skipped());
//! # Ok::<(), lbh_core::HistoryError>(())
//! ```

pub mod error;
pub mod level;
pub mod merge;
pub mod migrate;
pub mod series;
pub mod store;
pub mod time;
pub mod timeline;
pub mod types;

pub use error::{HistoryError, Result};
pub use level::{legacy_file_name, normalize_code, LevelDescriptor, LevelIndex};
pub use merge::merge_history;
pub use migrate::{migrate, migrate_level, LevelOutcome, LevelReport, MigrateOptions, MigrationReport};
pub use series::{
    axis_ticks, build_step_series, rank_filter, series_for_category, AxisTick, NamedSeries,
    PlayerSeries, SeriesSet, AXIS_STEPS, SECONDS_PER_DAY,
};
pub use store::{load_level_index, JsonStore, LegacyLookup};
pub use time::{normalize_history, normalize_history_in, parse_legacy_time, Zone};
pub use timeline::{create_timeline, Timeline, TimelineGroup};
pub use types::{CanonicalRecord, Category, HistoryEntry, LegacyEntry, LegacyHistory, Owner};

/// Get the version of lbh-core.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
