//! Record progression: the moments at which the best score improved.
//!
//! Scores are budgets, so lower is better. Entries flagged as cheated are
//! ignored.

use serde::Serialize;

use crate::types::HistoryEntry;

/// Entries sharing one timestamp that matched or beat the running best.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineGroup {
    pub time: i64,
    /// The group tied the previous best rather than beating it.
    pub is_tie_breaker: bool,
    /// Entries at this time that achieved the group's best value.
    pub entries: Vec<HistoryEntry>,
}

impl TimelineGroup {
    pub fn value(&self) -> Option<f64> {
        self.entries.first().map(HistoryEntry::value_f64)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Timeline {
    pub groups: Vec<TimelineGroup>,
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Build the record timeline of a history.
///
/// Groups worse than the running best are dropped; groups that tie it are
/// kept only when `include_ties` is set.
pub fn create_timeline(history: &[HistoryEntry], include_ties: bool) -> Timeline {
    let mut sorted: Vec<&HistoryEntry> = history.iter().filter(|e| !e.is_cheated()).collect();
    sorted.sort_by_key(|e| e.time);

    let mut timeline = Timeline::default();
    let mut best = f64::INFINITY;

    for bracket in sorted.chunk_by(|a, b| a.time == b.time) {
        let lowest = bracket
            .iter()
            .map(|e| e.value_f64())
            .fold(f64::INFINITY, f64::min);

        if lowest > best {
            continue;
        }
        let is_tie_breaker = lowest == best;
        if is_tie_breaker && !include_ties {
            continue;
        }

        timeline.groups.push(TimelineGroup {
            time: bracket[0].time,
            is_tie_breaker,
            entries: bracket
                .iter()
                .filter(|e| e.value_f64() == lowest)
                .map(|e| (*e).clone())
                .collect(),
        });
        best = lowest;
    }

    timeline
}
