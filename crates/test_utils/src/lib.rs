use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
pub const TEST_SHARD: &str = "read_only";

static TRACING: Lazy<()> = Lazy::new(logging::init_logger);

/// Install the workspace subscriber once for the whole test binary.
pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}

/// Build a row-record from column/value pairs, preserving column order.
pub fn row(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// `n` user rows shaped like `{"id": 1, "name": "user_1"}`, as a JSON array.
pub fn user_rows(n: usize) -> Value {
    Value::Array(
        (1..=n)
            .map(|i| {
                let mut record = Map::new();
                record.insert("id".into(), Value::from(i as i64));
                record.insert("name".into(), Value::from(format!("user_{i}")));
                Value::Object(record)
            })
            .collect(),
    )
}

/// Write a `connections.yml` with the given contents into a scratch dir.
/// Keep the returned `TempDir` alive for as long as the path is used.
pub fn write_connections_yaml(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("connections.yml");
    let mut file = fs::File::create(&path).expect("create connections.yml");
    file.write_all(contents.as_bytes())
        .expect("write connections.yml");
    (dir, path)
}
