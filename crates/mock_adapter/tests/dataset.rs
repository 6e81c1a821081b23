use mock_adapter::{MockDataset, MockDatabase};
use serde_json::json;
use test_utils::{row, user_rows, TEST_SHARD};

#[test]
fn dataset_enumerates_fetch_program_rows() {
    let db = MockDatabase::new();
    db.set_fetch(user_rows(3));

    let ds = MockDataset::new(&db, "SELECT * FROM users");
    let rows = ds.all().expect("rows should resolve");

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], row(&[("id", json!(1)), ("name", json!("user_1"))]));
    // The all-records shape replays on every enumeration.
    assert_eq!(ds.all().unwrap().len(), 3);
}

#[test]
fn columns_are_inferred_from_the_first_fetched_row() {
    let db = MockDatabase::new();
    // Mixed sequence: consumed one entry per fetch.
    db.set_fetch(json!([
        {"id": 1, "name": "a"},
        [{"id": 2, "name": "b"}, {"id": 3, "name": "c"}]
    ]));

    let mut ds = MockDataset::new(&db, "SELECT * FROM t");

    // Inference consumes the sequence's first entry...
    assert_eq!(ds.columns().unwrap(), vec!["id", "name"]);
    // ...so enumeration starts at the second.
    let rows = ds.all().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["id"], json!(3));

    // Cached: no further fetches happen for columns.
    assert_eq!(ds.columns().unwrap(), vec!["id", "name"]);
    assert!(ds.all().unwrap().is_empty());
}

#[test]
fn explicit_columns_do_not_touch_the_fetch_program() {
    let db = MockDatabase::new();
    db.set_fetch(json!([{"id": 1}, [{"id": 2}]]));

    let mut ds = MockDataset::new(&db, "SELECT id FROM t").with_columns(["id"]);

    assert_eq!(ds.columns().unwrap(), vec!["id"]);
    // First fetch still sees the sequence's first entry.
    let rows = ds.all().unwrap();
    assert_eq!(rows[0]["id"], json!(1));
}

#[test]
fn datasets_route_to_their_shard() {
    let db = MockDatabase::new();
    db.set_fetch(json!({"id": 1}));

    let ds = MockDataset::new(&db, "SELECT * FROM t").with_shard(TEST_SHARD);
    let mut seen = 0;
    ds.each_row(|_| seen += 1).unwrap();

    assert_eq!(seen, 1);
    assert_eq!(db.drain_log(), vec!["SELECT * FROM t -- read_only"]);
}

#[test]
fn empty_fetch_program_yields_no_rows_and_no_columns() {
    let db = MockDatabase::new();
    let mut ds = MockDataset::new(&db, "SELECT * FROM empty");

    assert!(ds.all().unwrap().is_empty());
    assert!(ds.columns().unwrap().is_empty());
}
