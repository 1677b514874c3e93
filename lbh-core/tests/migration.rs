//! Migration integration tests.
//!
//! Builds a small store in a temp directory and runs the full
//! locate → read → normalize → merge → write pipeline over it.

use lbh_core::{
    load_level_index, migrate, series_for_category, Category, HistoryError, JsonStore,
    LevelOutcome, MigrateOptions, Zone,
};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

// ============================================================================
// Fixtures
// ============================================================================

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string(value).unwrap()).expect("Failed to write fixture");
}

fn canonical(id: &str) -> Value {
    json!({
        "id": id,
        "any": {"top1000": [{"rank": 1, "value": 700}], "top_history": []},
        "unbroken": {"top1000": [], "top_history": []},
        "metadata": {"leaderboard_entry_count": 42}
    })
}

/// Three levels: one with a full legacy file, one with no legacy file and one
/// whose legacy file lacks the `unbroken` category.
fn setup_store() -> (TempDir, JsonStore, std::path::PathBuf) {
    let dir = tempdir().expect("Failed to create temp dir");
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();

    let index_path = dir.path().join("campaign_levels.json");
    write_json(
        &index_path,
        &json!([
            {"code": "01-05", "id": "mAp2V", "name": "Five"},
            {"code": "01-06", "id": "noOld"},
            {"code": "02-03c", "id": "brokE"}
        ]),
    );

    for id in ["mAp2V", "noOld", "brokE"] {
        write_json(&data.join(format!("{}.json", id)), &canonical(id));
    }

    write_json(
        &data.join("oldest_data_1-5.json"),
        &json!({
            "any": [
                {"owner": {"display_name": "alice"}, "time": "01/02/2023-00:00", "value": 900, "rank": 1},
                {"owner": {"display_name": "bob"}, "time": "02/02/2023-12:30", "value": 950, "rank": 2},
                {"owner": {"display_name": "bob"}, "time": "03/02/2023-08:00", "value": 850, "rank": 1}
            ],
            "unbroken": [
                {"owner": {"display_name": "carol"}, "time": "01/02/2023-00:00", "value": 1200, "rank": 1}
            ]
        }),
    );
    write_json(
        &data.join("oldest_data_2-3c.json"),
        &json!({"any": []}),
    );

    let store = JsonStore::new(&data);
    (dir, store, index_path)
}

fn utc_options() -> MigrateOptions {
    MigrateOptions {
        zone: Zone::Utc,
        ..Default::default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_migrate_merges_skips_and_fails_independently() {
    let (_dir, store, index_path) = setup_store();
    let index = load_level_index(&index_path).unwrap();
    let untouched_before = fs::read(store.canonical_path("brokE")).unwrap();

    let report = migrate(&store, &index, &utc_options());

    assert_eq!(report.levels.len(), 3);
    assert_eq!(report.merged(), 1);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failed(), 1);

    assert_eq!(
        report.levels[0].outcome,
        LevelOutcome::Merged {
            any: 3,
            unbroken: 1,
            written: true
        }
    );
    assert!(matches!(report.levels[1].outcome, LevelOutcome::Skipped { .. }));
    match &report.levels[2].outcome {
        LevelOutcome::Failed { reason } => assert!(reason.contains("unbroken")),
        other => panic!("expected failure, got {:?}", other),
    }

    // The failing level's canonical file is byte-for-byte unchanged.
    assert_eq!(fs::read(store.canonical_path("brokE")).unwrap(), untouched_before);
}

#[test]
fn test_migrated_record_contents() {
    let (_dir, store, index_path) = setup_store();
    let index = load_level_index(&index_path).unwrap();
    migrate(&store, &index, &utc_options());

    let record = store.read_canonical("mAp2V").unwrap();
    let any = record.top_history(Category::Any).unwrap();
    let times: Vec<i64> = any.iter().map(|e| e.time).collect();
    assert_eq!(times, vec![1_675_209_600, 1_675_341_000, 1_675_411_200]);

    // Fields outside top_history survive.
    let fields = record.fields();
    assert_eq!(fields["metadata"], json!({"leaderboard_entry_count": 42}));
    assert_eq!(fields["any"]["top1000"], json!([{"rank": 1, "value": 700}]));
    let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "any", "unbroken", "metadata"]);
}

#[test]
fn test_migrate_is_idempotent_on_disk() {
    let (_dir, store, index_path) = setup_store();
    let index = load_level_index(&index_path).unwrap();

    migrate(&store, &index, &utc_options());
    let first = fs::read_to_string(store.canonical_path("mAp2V")).unwrap();
    migrate(&store, &index, &utc_options());
    let second = fs::read_to_string(store.canonical_path("mAp2V")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_dry_run_writes_nothing() {
    let (_dir, store, index_path) = setup_store();
    let index = load_level_index(&index_path).unwrap();
    let before = fs::read(store.canonical_path("mAp2V")).unwrap();

    let options = MigrateOptions {
        dry_run: true,
        ..utc_options()
    };
    let report = migrate(&store, &index, &options);

    assert!(report.dry_run);
    assert!(matches!(
        report.levels[0].outcome,
        LevelOutcome::Merged { written: false, .. }
    ));
    assert_eq!(fs::read(store.canonical_path("mAp2V")).unwrap(), before);
}

#[test]
fn test_only_selected_levels_and_unknown_ids() {
    let (_dir, store, index_path) = setup_store();
    let index = load_level_index(&index_path).unwrap();

    let options = MigrateOptions {
        only: Some(vec!["nope".to_string(), "mAp2V".to_string()]),
        ..utc_options()
    };
    let report = migrate(&store, &index, &options);

    assert_eq!(report.levels.len(), 2);
    assert_eq!(report.levels[0].id, "nope");
    assert!(report.levels[0].code.is_none());
    assert!(matches!(report.levels[0].outcome, LevelOutcome::Failed { .. }));
    assert_eq!(report.merged(), 1);
}

#[test]
fn test_malformed_timestamp_fails_only_that_level() {
    let (_dir, store, index_path) = setup_store();
    let index = load_level_index(&index_path).unwrap();
    write_json(
        &store.data_dir().join("oldest_data_1-6.json"),
        &json!({
            "any": [{"owner": {"display_name": "x"}, "time": "2023-02-01", "value": 1, "rank": 1}],
            "unbroken": []
        }),
    );

    let report = migrate(&store, &index, &utc_options());
    assert_eq!(report.merged(), 1);
    match &report.levels[1].outcome {
        LevelOutcome::Failed { reason } => assert!(reason.contains("Malformed timestamp")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_series_from_migrated_record() {
    let (_dir, store, index_path) = setup_store();
    let index = load_level_index(&index_path).unwrap();
    migrate(&store, &index, &utc_options());

    let record = store.read_canonical("mAp2V").unwrap();
    let series = series_for_category(&record, Category::Any).unwrap();

    let names: Vec<&str> = series.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob"]);
    let bob = series.get("bob").unwrap();
    assert_eq!(bob.times, vec![1_675_341_000, 1_675_411_200, 1_675_411_200]);
    assert_eq!(bob.values, vec![950.0, 950.0, 850.0]);

    let empty = store.read_canonical("noOld").unwrap();
    let set = series_for_category(&empty, Category::Any).unwrap();
    assert!(matches!(
        lbh_core::axis_ticks(&set, 0),
        Err(HistoryError::EmptySeriesSet)
    ));
}
