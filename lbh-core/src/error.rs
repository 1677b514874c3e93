//! Error types for lbh-core.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{Category, DocumentKind};

/// Result type alias for lbh-core operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Errors that can occur while migrating or analysing leaderboard history.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// A legacy `time` string did not parse as `DD/MM/YYYY-HH:MM`.
    #[error("Malformed timestamp '{value}': {reason}")]
    MalformedTimestamp {
        /// The offending time string.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The level id is not present in the level index.
    #[error("Unknown level id: {id}")]
    UnknownLevelId {
        /// Canonical level id that was looked up.
        id: String,
    },

    /// A level code in the index is not `<world>-<level>[c]`.
    #[error("Invalid level code '{code}' (expected <world>-<level>[c])")]
    InvalidLevelCode {
        /// The code as written in the index.
        code: String,
    },

    /// A document lacks the `any` or `unbroken` category.
    #[error("{document} document is missing the '{category}' category")]
    MissingCategory {
        /// Which category was absent.
        category: Category,
        /// Which side of the merge it was absent from.
        document: DocumentKind,
    },

    /// A canonical `top_history` array does not decode as history entries.
    #[error("Invalid '{category}' top_history: {source}")]
    InvalidHistory {
        category: Category,
        #[source]
        source: serde_json::Error,
    },

    /// No rank-1 holders were found, so there is nothing to plot.
    #[error("Empty series set: no rank-1 holders in history")]
    EmptySeriesSet,

    /// Filesystem error on a store file.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error on a store file.
    #[error("JSON error in {}: {source}", path.display())]
    Json {
        /// File being decoded or encoded.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl HistoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HistoryError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        HistoryError::Json {
            path: path.into(),
            source,
        }
    }
}
