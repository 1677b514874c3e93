//! JSON store adapter: the level index, legacy files and canonical records.
//!
//! Every read and write is a whole-file operation. Nothing here locks; two
//! processes writing the same level id race and the last writer wins.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HistoryError, Result};
use crate::level::{legacy_file_name, LevelIndex};
use crate::types::{CanonicalRecord, LegacyHistory};

/// Outcome of looking for a level's legacy file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LegacyLookup {
    Found(PathBuf),
    /// The expected path, which does not exist.
    NotFound(PathBuf),
}

impl LegacyLookup {
    pub fn path(&self) -> &Path {
        match self {
            LegacyLookup::Found(path) | LegacyLookup::NotFound(path) => path,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LegacyLookup::Found(_))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| HistoryError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| HistoryError::json(path, e))
}

/// Load the level index from a JSON array of `{code, id, ...}`.
pub fn load_level_index(path: &Path) -> Result<LevelIndex> {
    let index: LevelIndex = read_json(path)?;
    tracing::debug!("Loaded {} levels from {:?}", index.len(), path);
    Ok(index)
}

/// A directory holding `<id>.json` canonical records next to
/// `oldest_data_<code>.json` legacy files.
#[derive(Clone, Debug)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn canonical_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", id))
    }

    /// Resolve the legacy file for `id` and report whether it exists.
    pub fn locate_legacy(&self, index: &LevelIndex, id: &str) -> Result<LegacyLookup> {
        let path = self.data_dir.join(legacy_file_name(index, id)?);
        if path.is_file() {
            Ok(LegacyLookup::Found(path))
        } else {
            Ok(LegacyLookup::NotFound(path))
        }
    }

    pub fn read_legacy(&self, path: &Path) -> Result<LegacyHistory<String>> {
        read_json(path)
    }

    pub fn read_canonical(&self, id: &str) -> Result<CanonicalRecord> {
        read_json(&self.canonical_path(id))
    }

    /// Overwrite the canonical record for `id`.
    pub fn write_canonical(&self, id: &str, record: &CanonicalRecord) -> Result<()> {
        let path = self.canonical_path(id);
        let content = serde_json::to_string(record).map_err(|e| HistoryError::json(&path, e))?;
        fs::write(&path, content).map_err(|e| HistoryError::io(&path, e))?;
        tracing::debug!("Wrote canonical record {:?}", path);
        Ok(())
    }
}
