//! A scriptable, stateful stand-in for a real database adapter.
//!
//! Data-access code is pointed at a [`MockDatabase`] instead of a live
//! backend; tests script what each execution should produce by configuring
//! response [`Program`]s for rows, affected-row counts and generated
//! identifiers, or an [`ErrorSpec`] to simulate failures. Every executed
//! query is recorded, annotated with its routing metadata, in a drainable
//! [`QueryLog`].
//!
//! ```
//! use mock_adapter::{MockDatabase, MockOptions};
//! use serde_json::json;
//!
//! let db = MockDatabase::with_options(MockOptions::new().host("primary"));
//! db.set_num_rows(json!([1, 2]));
//!
//! assert_eq!(db.execute_dui("DELETE FROM a").unwrap(), 1);
//! assert_eq!(db.execute_dui("DELETE FROM b").unwrap(), 2);
//! assert_eq!(db.execute_dui("DELETE FROM c").unwrap(), 0);
//! assert_eq!(
//!     db.drain_log()[0],
//!     "DELETE FROM a -- primary"
//! );
//! ```

pub mod connection;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod extension;
pub mod log;
pub mod pool;
pub mod program;

mod fetch;
mod identity;

pub use connection::{MockConnection, ShardId};
pub use dataset::MockDataset;
pub use engine::{MockDatabase, MockOptions};
pub use error::{
    BoxError, ConfiguredError, DatabaseError, ErrorSpec, FailureKind, ProgramError,
};
pub use extension::DatabaseExtension;
pub use log::QueryLog;
pub use pool::ShardedPool;
pub use program::Program;

/// One simulated result row: an ordered mapping from column name to value.
pub type Row = serde_json::Map<String, serde_json::Value>;
