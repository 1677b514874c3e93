//! Wholesale replacement of canonical history with migrated legacy history.

use crate::error::{HistoryError, Result};
use crate::types::{CanonicalRecord, Category, DocumentKind, LegacyHistory};

/// Replace `any.top_history` and `unbroken.top_history` of `record` with the
/// two categories of a normalized legacy document.
///
/// This is a full replacement: whatever history the record held before is
/// discarded. Entries are neither deduplicated nor reordered. On error the
/// record is consumed and dropped; nothing has been written, so the stored
/// file is unchanged and the caller must not write anything for this level.
pub fn merge_history(
    mut record: CanonicalRecord,
    legacy: &LegacyHistory<i64>,
) -> Result<CanonicalRecord> {
    for category in Category::ALL {
        if legacy.category(category).is_none() {
            return Err(HistoryError::MissingCategory {
                category,
                document: DocumentKind::Legacy,
            });
        }
        if !record.has_category(category) {
            return Err(HistoryError::MissingCategory {
                category,
                document: DocumentKind::Canonical,
            });
        }
    }

    for category in Category::ALL {
        let history = legacy.category(category).unwrap_or_default();
        record.set_top_history(category, history)?;
        tracing::debug!("Replaced {} history with {} entries", category, history.len());
    }

    Ok(record)
}
