use crate::connection::{MockConnection, ShardId};
use crate::engine::MockDatabase;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Connection pool collaborator: one connection per shard, created on first
/// access and owned here until the engine goes away.
///
/// [`ShardedPool::with_connection`] is the mutual-exclusion boundary every
/// execution runs inside; callers get the shard's connection for the
/// duration of the closure and release is guaranteed on exit.
#[derive(Debug, Default)]
pub struct ShardedPool {
    conns: Mutex<HashMap<ShardId, Arc<MockConnection>>>,
}

impl ShardedPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of connections created so far.
    pub fn size(&self) -> usize {
        self.conns.lock().len()
    }

    pub(crate) fn checkout(&self, db: &MockDatabase, shard: &ShardId) -> Arc<MockConnection> {
        let mut conns = self.conns.lock();
        conns
            .entry(shard.clone())
            .or_insert_with(|| Arc::new(db.new_connection(shard)))
            .clone()
    }

    /// Run `f` against the shard's connection while holding that shard's
    /// lock. The closure must not re-enter the pool for the same shard.
    pub fn with_connection<R>(
        &self,
        db: &MockDatabase,
        shard: &ShardId,
        f: impl FnOnce(&MockConnection) -> R,
    ) -> R {
        let conn = self.checkout(db, shard);
        let _guard = conn.busy.lock();
        f(&conn)
    }
}
