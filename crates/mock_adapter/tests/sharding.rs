use common::config::read_profile;
use common::ConnectOptions;
use mock_adapter::{MockDatabase, MockOptions};
use std::sync::Arc;
use test_utils::{write_connections_yaml, TEST_SHARD};

#[test]
fn non_default_shard_is_tagged_after_the_host() {
    let db = MockDatabase::with_options(MockOptions::new().host("h"));

    db.execute_on("SELECT 1", TEST_SHARD).unwrap();
    db.execute("SELECT 2").unwrap();

    assert_eq!(
        db.drain_log(),
        vec!["SELECT 1 -- h -- read_only", "SELECT 2 -- h"]
    );
}

#[test]
fn shard_overrides_replace_the_global_host() {
    let db = MockDatabase::with_options(
        MockOptions::new()
            .host("primary")
            .shard(TEST_SHARD, ConnectOptions::with_host("replica")),
    );

    let conn = db.connect(TEST_SHARD);
    assert_eq!(conn.options().host.as_deref(), Some("replica"));

    db.execute_on("SELECT 1", TEST_SHARD).unwrap();
    assert_eq!(db.drain_log(), vec!["SELECT 1 -- replica -- read_only"]);
}

#[test]
fn pool_hands_out_one_connection_per_shard() {
    let db = MockDatabase::new();

    let first = db.connect(TEST_SHARD);
    let second = db.connect(TEST_SHARD);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(db.pool().size(), 1);

    db.execute("SELECT 1").unwrap();
    assert_eq!(db.pool().size(), 2);
}

#[test]
fn connection_execute_routes_through_its_engine() {
    let db = MockDatabase::new();
    let conn = db.connect(TEST_SHARD);

    conn.execute("SELECT 1").unwrap();

    assert_eq!(db.drain_log(), vec!["SELECT 1 -- read_only"]);
}

#[test]
fn connection_that_outlives_its_database_reports_an_error() {
    let conn = {
        let db = MockDatabase::new();
        db.connect(TEST_SHARD)
    };

    let err = conn.execute("SELECT 1").unwrap_err();
    assert!(err.to_string().contains("database error"));
    assert!(conn.database().is_err());
}

#[test]
fn profile_file_drives_shard_topology() {
    let (_dir, path) = write_connections_yaml(
        r#"
test:
  host: primary
  shards:
    read_only:
      host: replica
"#,
    );

    let profile = read_profile(&path, "test").expect("profile should load");
    let db = MockDatabase::from_profile(&profile);

    db.execute("SELECT 1").unwrap();
    db.execute_on("SELECT 2", TEST_SHARD).unwrap();

    assert_eq!(
        db.drain_log(),
        vec!["SELECT 1 -- primary", "SELECT 2 -- replica -- read_only"]
    );
}

#[test]
fn shard_programs_are_engine_wide() {
    // Programs belong to the engine, not to a shard: executions on any shard
    // consume the same sequence.
    let db = MockDatabase::new();
    db.set_num_rows(serde_json::json!([1, 2]));

    assert_eq!(db.execute_dui_on("UPDATE t", TEST_SHARD).unwrap(), 1);
    assert_eq!(db.execute_dui("UPDATE t").unwrap(), 2);
    assert_eq!(db.execute_dui_on("UPDATE t", TEST_SHARD).unwrap(), 0);
}
