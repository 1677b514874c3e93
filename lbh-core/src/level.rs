//! Level index and legacy file location.
//!
//! The level index maps canonical level ids to human-readable codes such as
//! `01-05` or `02-03c`. Legacy files are named after the code with leading
//! zeros stripped, e.g. `oldest_data_1-5.json`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HistoryError, Result};

/// `<world>-<level>` with an optional trailing challenge marker.
static LEVEL_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)-(\d+)(c?)$").unwrap());

/// Prefix of every legacy history file name.
pub const LEGACY_FILE_PREFIX: &str = "oldest_data_";

/// One row of the level index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub code: String,
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LevelDescriptor {
    pub fn new(code: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            id: id.into(),
            extra: Map::new(),
        }
    }

    /// Display name of the level, when the index carries one.
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }
}

/// Ordered list of known levels.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelIndex {
    levels: Vec<LevelDescriptor>,
}

impl LevelIndex {
    pub fn new(levels: Vec<LevelDescriptor>) -> Self {
        Self { levels }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDescriptor> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Find a level by canonical id.
    pub fn get(&self, id: &str) -> Option<&LevelDescriptor> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// Like [`LevelIndex::get`], failing with `UnknownLevelId`.
    pub fn require(&self, id: &str) -> Result<&LevelDescriptor> {
        self.get(id).ok_or_else(|| HistoryError::UnknownLevelId { id: id.to_string() })
    }
}

/// Strip leading zeros from both numbers of a level code, keeping `c`.
///
/// `01-05` becomes `1-5` and `02-03c` becomes `2-3c`.
pub fn normalize_code(code: &str) -> Result<String> {
    let invalid = || HistoryError::InvalidLevelCode {
        code: code.to_string(),
    };
    let caps = LEVEL_CODE.captures(code.trim()).ok_or_else(invalid)?;
    let world: u64 = caps[1].parse().map_err(|_| invalid())?;
    let level: u64 = caps[2].parse().map_err(|_| invalid())?;
    Ok(format!("{}-{}{}", world, level, &caps[3]))
}

/// Legacy file name for a normalized code.
pub fn legacy_file_name_for_code(code: &str) -> Result<String> {
    Ok(format!("{}{}.json", LEGACY_FILE_PREFIX, normalize_code(code)?))
}

/// Resolve the legacy file name for a canonical level id.
pub fn legacy_file_name(index: &LevelIndex, id: &str) -> Result<String> {
    legacy_file_name_for_code(&index.require(id)?.code)
}
