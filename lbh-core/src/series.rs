//! Per-player step series reconstructed from a rank-ordered history.
//!
//! The pipeline is [`rank_filter`] → [`build_step_series`] → [`axis_ticks`]:
//! players are selected first (anyone who ever held rank 1), series are built
//! only for them, and the x axis is split into equal steps labelled with
//! "days ago".

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::error::{HistoryError, Result};
use crate::types::{CanonicalRecord, Category, HistoryEntry};

/// Number of equal steps the time axis is divided into.
pub const AXIS_STEPS: usize = 5;

pub const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

/// Distinct names that ever appear at rank 1, in first-occurrence order.
pub fn rank_filter<T>(entries: &[HistoryEntry<T>]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| entry.rank == 1)
        .filter(|entry| seen.insert(entry.display_name()))
        .map(|entry| entry.display_name().to_string())
        .collect()
}

/// A right-continuous step function for one player.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PlayerSeries {
    pub times: Vec<i64>,
    pub values: Vec<f64>,
}

impl PlayerSeries {
    /// Record an observation.
    ///
    /// When the series already has a point, the previous value is repeated at
    /// `time` first so the line holds flat until the instant of change.
    pub fn observe(&mut self, time: i64, value: f64) {
        if let Some(&previous) = self.values.last() {
            self.times.push(time);
            self.values.push(previous);
        }
        self.times.push(time);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }
}

/// A player's series, tagged with the player's display name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    #[serde(flatten)]
    pub series: PlayerSeries,
}

/// All series for one history, in selection order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SeriesSet {
    players: Vec<NamedSeries>,
}

impl SeriesSet {
    pub fn iter(&self) -> impl Iterator<Item = &NamedSeries> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PlayerSeries> {
        self.players
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.series)
    }

    /// Earliest and latest time over every point of every series.
    pub fn time_bounds(&self) -> Option<(i64, i64)> {
        let mut times = self.players.iter().flat_map(|p| p.series.times.iter().copied());
        let first = times.next()?;
        Some(times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }

    /// Smallest and largest value over every point of every series.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut values = self.players.iter().flat_map(|p| p.series.values.iter().copied());
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Build one series per selected name from the full history.
///
/// Every entry is visited in order; entries of unselected players are
/// ignored. Duplicate names in `selected` are collapsed to their first slot.
pub fn build_step_series(entries: &[HistoryEntry], selected: &[String]) -> SeriesSet {
    let mut players: Vec<NamedSeries> = Vec::with_capacity(selected.len());
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(selected.len());

    for name in selected {
        if slots.contains_key(name.as_str()) {
            continue;
        }
        slots.insert(name.as_str(), players.len());
        players.push(NamedSeries {
            name: name.clone(),
            series: PlayerSeries::default(),
        });
    }

    for entry in entries {
        if let Some(&slot) = slots.get(entry.display_name()) {
            players[slot].series.observe(entry.time, entry.value_f64());
        }
    }

    SeriesSet { players }
}

/// Select rank-1 holders of a category and build their series.
pub fn series_for_category(record: &CanonicalRecord, category: Category) -> Result<SeriesSet> {
    let history = record.top_history(category)?;
    let selected = rank_filter(&history);
    tracing::debug!(
        "{} history: {} entries, {} rank-1 holders",
        category,
        history.len(),
        selected.len()
    );
    Ok(build_step_series(&history, &selected))
}

/// A tick on the time axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AxisTick {
    /// Epoch seconds of the step boundary (may be fractional).
    pub time: f64,
    /// Whole days between the boundary's day and today's day.
    pub days_ago: i64,
}

/// Split the time domain into [`AXIS_STEPS`] equal steps, labelled relative
/// to `now` (epoch seconds). Returns `AXIS_STEPS + 1` ticks.
pub fn axis_ticks(series: &SeriesSet, now: i64) -> Result<Vec<AxisTick>> {
    let (min_time, max_time) = series.time_bounds().ok_or(HistoryError::EmptySeriesSet)?;

    let today = now.div_euclid(SECONDS_PER_DAY);
    let step = (max_time - min_time) as f64 / AXIS_STEPS as f64;

    Ok((0..=AXIS_STEPS)
        .map(|i| {
            let time = min_time as f64 + i as f64 * step;
            let day = (time / SECONDS_PER_DAY as f64).floor() as i64;
            AxisTick {
                time,
                days_ago: today - day,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, time: i64, value: i64, rank: u32) -> HistoryEntry {
        HistoryEntry::new(name, time, value, rank)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rank_filter_first_occurrence_order() {
        let history = vec![
            entry("A", 1, 10, 1),
            entry("B", 2, 11, 2),
            entry("A", 3, 12, 2),
            entry("B", 4, 9, 1),
        ];
        assert_eq!(rank_filter(&history), names(&["A", "B"]));
    }

    #[test]
    fn test_rank_filter_excludes_never_first() {
        let history = vec![entry("A", 1, 10, 1), entry("C", 2, 11, 2), entry("A", 3, 9, 1)];
        assert_eq!(rank_filter(&history), names(&["A"]));
        assert!(rank_filter::<i64>(&[]).is_empty());
    }

    #[test]
    fn test_step_series_single_observation() {
        let set = build_step_series(&[entry("P", 10, 5, 1)], &names(&["P"]));
        let p = set.get("P").unwrap();
        assert_eq!(p.times, vec![10]);
        assert_eq!(p.values, vec![5.0]);
    }

    #[test]
    fn test_step_series_holds_flat_before_jump() {
        let history = vec![entry("P", 10, 5, 1), entry("P", 20, 7, 1)];
        let set = build_step_series(&history, &names(&["P"]));
        let p = set.get("P").unwrap();
        assert_eq!(p.times, vec![10, 20, 20]);
        assert_eq!(p.values, vec![5.0, 5.0, 7.0]);
    }

    #[test]
    fn test_step_series_same_timestamp_doubles_each_time() {
        let history = vec![
            entry("P", 10, 5, 1),
            entry("P", 20, 6, 1),
            entry("P", 20, 7, 1),
        ];
        let set = build_step_series(&history, &names(&["P"]));
        let p = set.get("P").unwrap();
        assert_eq!(p.times, vec![10, 20, 20, 20, 20]);
        assert_eq!(p.values, vec![5.0, 5.0, 6.0, 6.0, 7.0]);
        assert_eq!(p.times.len(), p.values.len());
    }

    #[test]
    fn test_step_series_only_selected_players() {
        let history = vec![
            entry("A", 10, 5, 1),
            entry("X", 15, 4, 2),
            entry("B", 20, 3, 1),
            entry("A", 30, 2, 2),
        ];
        let selected = rank_filter(&history);
        let set = build_step_series(&history, &selected);

        assert_eq!(set.len(), 2);
        assert!(set.get("X").is_none());
        let order: Vec<&str> = set.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
        // A's rank-2 observation still extends A's line.
        assert_eq!(set.get("A").unwrap().times, vec![10, 30, 30]);
        for p in set.iter() {
            assert!(p.series.times.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_duplicate_selection_collapses() {
        let set = build_step_series(&[entry("A", 1, 1, 1)], &names(&["A", "A"]));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_axis_ticks_equal_steps() {
        let history = vec![entry("A", 0, 5, 1), entry("B", 500_000, 3, 1)];
        let set = build_step_series(&history, &rank_filter(&history));
        let now = 10 * SECONDS_PER_DAY;
        let ticks = axis_ticks(&set, now).unwrap();

        assert_eq!(ticks.len(), AXIS_STEPS + 1);
        for (i, tick) in ticks.iter().enumerate() {
            assert_eq!(tick.time, i as f64 * 100_000.0);
        }
        assert_eq!(ticks[0].days_ago, 10);
        // 500000 s is day 5 (432000..518400).
        assert_eq!(ticks[5].days_ago, 5);
        // 100000 s is day 1.
        assert_eq!(ticks[1].days_ago, 9);
    }

    #[test]
    fn test_axis_ticks_empty_set() {
        let err = axis_ticks(&SeriesSet::default(), 0).unwrap_err();
        assert!(matches!(err, HistoryError::EmptySeriesSet));
    }

    #[test]
    fn test_axis_ticks_single_instant() {
        let set = build_step_series(&[entry("A", 86_400, 1, 1)], &names(&["A"]));
        let ticks = axis_ticks(&set, 3 * SECONDS_PER_DAY).unwrap();
        assert_eq!(ticks.len(), AXIS_STEPS + 1);
        assert!(ticks.iter().all(|t| t.time == 86_400.0 && t.days_ago == 2));
    }

    #[test]
    fn test_bounds() {
        let history = vec![entry("A", 50, 9, 1), entry("B", 20, 3, 1), entry("A", 80, 4, 1)];
        let set = build_step_series(&history, &rank_filter(&history));
        assert_eq!(set.time_bounds(), Some((20, 80)));
        assert_eq!(set.value_bounds(), Some((3.0, 9.0)));
        assert_eq!(SeriesSet::default().time_bounds(), None);
    }
}
