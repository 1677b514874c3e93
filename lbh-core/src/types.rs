//! Data model shared by the migrator and the series builder.
//!
//! Field names follow the on-disk store (`top_history`, `owner.display_name`).
//! Anything the core does not interpret is carried through `extra` maps so a
//! read-modify-write cycle never drops data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{HistoryError, Result};

/// JSON key holding a category's ordered history inside a canonical record.
pub const TOP_HISTORY_KEY: &str = "top_history";

/// Scoring category of a leaderboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Unrestricted runs.
    #[default]
    Any,
    /// Runs where nothing broke.
    Unbroken,
}

impl Category {
    /// Both categories, in store order.
    pub const ALL: [Category; 2] = [Category::Any, Category::Unbroken];

    /// Key of this category in legacy and canonical documents.
    pub fn key(self) -> &'static str {
        match self {
            Category::Any => "any",
            Category::Unbroken => "unbroken",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" => Ok(Category::Any),
            "unbroken" => Ok(Category::Unbroken),
            _ => Err(format!("Unknown category: '{}'", s)),
        }
    }
}

/// Which side of a merge a document came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    Legacy,
    Canonical,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Legacy => f.write_str("legacy"),
            DocumentKind::Canonical => f.write_str("canonical"),
        }
    }
}

/// The player owning a leaderboard entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub display_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Owner {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            extra: Map::new(),
        }
    }
}

/// One observed leaderboard sample for one player at one point in time.
///
/// `T` is the time representation: `String` for legacy documents,
/// epoch seconds (`i64`) everywhere else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry<T = i64> {
    pub owner: Owner,
    pub time: T,
    /// Kept as a JSON number so integer scores round-trip unchanged.
    pub value: Number,
    pub rank: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A history entry as stored in a legacy document.
pub type LegacyEntry = HistoryEntry<String>;

impl<T> HistoryEntry<T> {
    pub fn new(name: impl Into<String>, time: T, value: impl Into<Number>, rank: u32) -> Self {
        Self {
            owner: Owner::new(name),
            time,
            value: value.into(),
            rank,
            extra: Map::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.owner.display_name
    }

    pub fn value_f64(&self) -> f64 {
        self.value.as_f64().unwrap_or(f64::NAN)
    }

    /// Whether the entry was flagged as cheated by the leaderboard feed.
    pub fn is_cheated(&self) -> bool {
        self.extra
            .get("cheated")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Replace the time, keeping every other field.
    pub fn with_time<U>(self, time: U) -> HistoryEntry<U> {
        HistoryEntry {
            owner: self.owner,
            time,
            value: self.value,
            rank: self.rank,
            extra: self.extra,
        }
    }
}

/// A legacy per-level-code history document.
///
/// Both categories are optional on read; their absence is reported by the
/// merger, not by deserialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyHistory<T = String> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any: Option<Vec<HistoryEntry<T>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unbroken: Option<Vec<HistoryEntry<T>>>,
}

impl<T> LegacyHistory<T> {
    pub fn category(&self, category: Category) -> Option<&[HistoryEntry<T>]> {
        match category {
            Category::Any => self.any.as_deref(),
            Category::Unbroken => self.unbroken.as_deref(),
        }
    }
}

/// The per-level-id document that is the system of record.
///
/// Only `<category>.top_history` is ever interpreted; the rest of the object
/// is opaque and serialized back in the key order it was read in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalRecord(Map<String, Value>);

impl CanonicalRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// Whether the record has an object to hold `category`'s history.
    pub fn has_category(&self, category: Category) -> bool {
        matches!(self.0.get(category.key()), Some(Value::Object(_)))
    }

    /// Decode a category's history. A missing `top_history` reads as empty.
    pub fn top_history(&self, category: Category) -> Result<Vec<HistoryEntry>> {
        let board = match self.0.get(category.key()) {
            Some(Value::Object(board)) => board,
            _ => {
                return Err(HistoryError::MissingCategory {
                    category,
                    document: DocumentKind::Canonical,
                })
            }
        };
        match board.get(TOP_HISTORY_KEY) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(history) => serde_json::from_value(history.clone())
                .map_err(|source| HistoryError::InvalidHistory { category, source }),
        }
    }

    /// Replace a category's history wholesale.
    pub fn set_top_history(&mut self, category: Category, history: &[HistoryEntry]) -> Result<()> {
        let encoded = serde_json::to_value(history)
            .map_err(|source| HistoryError::InvalidHistory { category, source })?;
        match self.0.get_mut(category.key()) {
            Some(Value::Object(board)) => {
                board.insert(TOP_HISTORY_KEY.to_string(), encoded);
                Ok(())
            }
            _ => Err(HistoryError::MissingCategory {
                category,
                document: DocumentKind::Canonical,
            }),
        }
    }
}
