use crate::engine::{EngineShared, MockDatabase};
use crate::error::DatabaseError;
use common::ConnectOptions;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Weak;

/// Logical partition selector routing an execution to one of the simulated
/// backends.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShardId {
    #[default]
    Default,
    Named(String),
}

impl ShardId {
    pub fn named(name: impl Into<String>) -> Self {
        ShardId::Named(name.into())
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ShardId::Default)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ShardId::Default => "default",
            ShardId::Named(name) => name,
        }
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ShardId {
    fn from(name: &str) -> Self {
        if name == "default" {
            ShardId::Default
        } else {
            ShardId::Named(name.to_owned())
        }
    }
}

impl From<String> for ShardId {
    fn from(name: String) -> Self {
        ShardId::from(name.as_str())
    }
}

/// One logical connection, bound to a shard and carrying the options
/// resolved for it.
///
/// The engine reference is non-owning: the pool owns connection lifetimes,
/// and a connection that outlives its database reports a database error
/// rather than keeping the engine alive.
#[derive(Debug)]
pub struct MockConnection {
    db: Weak<EngineShared>,
    shard: ShardId,
    opts: ConnectOptions,
    // Held by the pool for the duration of every execution on this shard.
    pub(crate) busy: Mutex<()>,
}

impl MockConnection {
    pub(crate) fn bind(db: Weak<EngineShared>, shard: ShardId, opts: ConnectOptions) -> Self {
        Self {
            db,
            shard,
            opts,
            busy: Mutex::new(()),
        }
    }

    pub fn shard(&self) -> &ShardId {
        &self.shard
    }

    pub fn options(&self) -> &ConnectOptions {
        &self.opts
    }

    pub fn database(&self) -> Result<MockDatabase, DatabaseError> {
        self.db.upgrade().map(MockDatabase::from_shared).ok_or_else(|| {
            DatabaseError::msg(format!(
                "connection for shard '{}' outlived its database",
                self.shard
            ))
        })
    }

    /// Pure delegation to the owning engine's execution entry point.
    pub fn execute(&self, sql: &str) -> Result<(), DatabaseError> {
        self.database()?.execute_on(sql, self.shard.clone())
    }
}
