use crate::connection::{MockConnection, ShardId};
use crate::error::DatabaseError;
use crate::extension::DatabaseExtension;
use crate::fetch;
use crate::identity::{self, AutoId};
use crate::log::QueryLog;
use crate::pool::ShardedPool;
use crate::program::Program;
use crate::Row;
use common::{ConnectOptions, MockProfile};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Construction options for a [`MockDatabase`].
#[derive(Default)]
pub struct MockOptions {
    connect: ConnectOptions,
    shards: HashMap<String, ConnectOptions>,
    fetch: Option<Program>,
    auto_id: Option<Program>,
    num_rows: Option<Program>,
    extension: Option<Arc<dyn DatabaseExtension>>,
    log_buffer: Option<QueryLog>,
}

impl MockOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(mut self, options: ConnectOptions) -> Self {
        self.connect = options;
        self
    }

    /// Shorthand for setting only the global host option.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.connect.host = Some(host.into());
        self
    }

    /// Option overrides for one named shard.
    pub fn shard(mut self, name: impl Into<String>, options: ConnectOptions) -> Self {
        self.shards.insert(name.into(), options);
        self
    }

    pub fn fetch(mut self, program: impl Into<Program>) -> Self {
        self.fetch = Some(program.into());
        self
    }

    pub fn auto_id(mut self, program: impl Into<Program>) -> Self {
        self.auto_id = Some(program.into());
        self
    }

    pub fn num_rows(mut self, program: impl Into<Program>) -> Self {
        self.num_rows = Some(program.into());
        self
    }

    pub fn extension(mut self, extension: Arc<dyn DatabaseExtension>) -> Self {
        self.extension = Some(extension);
        self
    }

    /// Use the caller's buffer as the query log backing store.
    pub fn log_buffer(mut self, log: QueryLog) -> Self {
        self.log_buffer = Some(log);
        self
    }
}

pub(crate) struct Programs {
    pub(crate) fetch: Program,
    pub(crate) auto_id: AutoId,
    pub(crate) num_rows: Program,
}

pub(crate) struct EngineShared {
    connect: ConnectOptions,
    shard_opts: HashMap<String, ConnectOptions>,
    extension: Option<Arc<dyn DatabaseExtension>>,
    log: QueryLog,
    programs: Mutex<Programs>,
    pool: ShardedPool,
}

/// The mock engine: owns the three response programs, the query log and the
/// sharded connection pool, and funnels every execution through one path.
///
/// Handles are cheap clones of one shared engine; program state is never
/// shared between separately constructed engines.
#[derive(Clone)]
pub struct MockDatabase {
    shared: Arc<EngineShared>,
}

impl Default for MockDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::with_options(MockOptions::default())
    }

    pub fn with_options(opts: MockOptions) -> Self {
        let shared = EngineShared {
            connect: opts.connect,
            shard_opts: opts.shards,
            extension: opts.extension,
            log: opts.log_buffer.unwrap_or_default(),
            programs: Mutex::new(Programs {
                fetch: opts.fetch.unwrap_or_default(),
                auto_id: AutoId::configure(opts.auto_id.unwrap_or_default()),
                num_rows: opts.num_rows.unwrap_or_default(),
            }),
            pool: ShardedPool::new(),
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Build an engine from a loaded connection profile.
    pub fn from_profile(profile: &MockProfile) -> Self {
        let mut opts = MockOptions::new().connect(profile.options.clone());
        for (name, overrides) in &profile.shards {
            opts = opts.shard(name.clone(), overrides.clone());
        }
        Self::with_options(opts)
    }

    pub(crate) fn from_shared(shared: Arc<EngineShared>) -> Self {
        Self { shared }
    }

    /* ---------- program configuration ---------- */

    /// Replace the fetch program. Shapes are validated lazily, at the first
    /// resolution that cannot interpret them.
    pub fn set_fetch(&self, program: impl Into<Program>) {
        self.shared.programs.lock().fetch = program.into();
    }

    /// Replace the identifier program. A plain integer starts a counter.
    pub fn set_auto_id(&self, program: impl Into<Program>) {
        self.shared.programs.lock().auto_id = AutoId::configure(program.into());
    }

    /// Replace the row-count program.
    pub fn set_num_rows(&self, program: impl Into<Program>) {
        self.shared.programs.lock().num_rows = program.into();
    }

    /* ---------- connections ---------- */

    /// The pooled connection for `shard`, created on first access.
    pub fn connect(&self, shard: impl Into<ShardId>) -> Arc<MockConnection> {
        let shard = shard.into();
        debug!(shard = %shard, "checkout mock connection");
        self.shared.pool.checkout(self, &shard)
    }

    pub fn pool(&self) -> &ShardedPool {
        &self.shared.pool
    }

    pub(crate) fn new_connection(&self, shard: &ShardId) -> MockConnection {
        let opts = self.shard_options(shard);
        MockConnection::bind(Arc::downgrade(&self.shared), shard.clone(), opts)
    }

    fn shard_options(&self, shard: &ShardId) -> ConnectOptions {
        match shard {
            ShardId::Default => self.shared.connect.clone(),
            ShardId::Named(name) => match self.shared.shard_opts.get(name) {
                Some(overrides) => self.shared.connect.merge(overrides),
                None => self.shared.connect.clone(),
            },
        }
    }

    /* ---------- execution ---------- */

    /// Execute a plain statement: annotate, log, no result value.
    pub fn execute(&self, sql: &str) -> Result<(), DatabaseError> {
        self.execute_on(sql, ShardId::Default)
    }

    pub fn execute_on(&self, sql: &str, shard: impl Into<ShardId>) -> Result<(), DatabaseError> {
        self.run(sql, &shard.into(), |_, _| Ok(()))
    }

    /// Execute a data-changing statement, resolving the affected-row count.
    pub fn execute_dui(&self, sql: &str) -> Result<i64, DatabaseError> {
        self.execute_dui_on(sql, ShardId::Default)
    }

    pub fn execute_dui_on(&self, sql: &str, shard: impl Into<ShardId>) -> Result<i64, DatabaseError> {
        self.run(sql, &shard.into(), |programs, sql| {
            identity::count_rows(&mut programs.num_rows, sql)
        })
    }

    /// Execute an insert, resolving the generated identifier (if any).
    pub fn execute_insert(&self, sql: &str) -> Result<Option<i64>, DatabaseError> {
        self.execute_insert_on(sql, ShardId::Default)
    }

    pub fn execute_insert_on(
        &self,
        sql: &str,
        shard: impl Into<ShardId>,
    ) -> Result<Option<i64>, DatabaseError> {
        self.run(sql, &shard.into(), |programs, sql| programs.auto_id.next(sql))
    }

    /// Stream the rows the fetch program resolves for `sql` to `emit`.
    pub fn fetch_rows(&self, sql: &str, emit: impl FnMut(Row)) -> Result<(), DatabaseError> {
        self.fetch_rows_on(sql, ShardId::Default, emit)
    }

    pub fn fetch_rows_on(
        &self,
        sql: &str,
        shard: impl Into<ShardId>,
        mut emit: impl FnMut(Row),
    ) -> Result<(), DatabaseError> {
        self.run(sql, &shard.into(), |programs, sql| {
            fetch::feed(&mut programs.fetch, sql, &mut emit)
        })
    }

    /// Collect the resolved rows for `sql` into a vector.
    pub fn rows(&self, sql: &str) -> Result<Vec<Row>, DatabaseError> {
        self.rows_on(sql, ShardId::Default)
    }

    pub fn rows_on(&self, sql: &str, shard: impl Into<ShardId>) -> Result<Vec<Row>, DatabaseError> {
        let mut rows = Vec::new();
        self.fetch_rows_on(sql, shard, |row| rows.push(row))?;
        Ok(rows)
    }

    /// The shared execution path: acquire the shard's connection, annotate,
    /// log, then resolve. Any resolution error crosses the boundary as a
    /// [`DatabaseError`] with the original as its source.
    fn run<T>(
        &self,
        sql: &str,
        shard: &ShardId,
        resolve: impl FnOnce(&mut Programs, &str) -> Result<T, crate::error::ProgramError>,
    ) -> Result<T, DatabaseError> {
        self.shared.pool.with_connection(self, shard, |conn| {
            let sql = annotate(sql, conn);
            debug!(query = %sql, shard = %conn.shard(), "execute");
            self.shared.log.append(sql.as_str());
            if let Some(extension) = &self.shared.extension {
                extension.on_query(&sql);
            }
            let mut programs = self.shared.programs.lock();
            resolve(&mut programs, &sql).map_err(DatabaseError::wrap)
        })
    }

    /* ---------- log & capabilities ---------- */

    /// Everything logged since the last drain, in submission order.
    pub fn drain_log(&self) -> Vec<String> {
        self.shared.log.drain()
    }

    /// A handle onto the engine's log buffer.
    pub fn query_log(&self) -> QueryLog {
        self.shared.log.clone()
    }

    /// Savepoint support is a fixed capability of the mock, not state.
    pub fn supports_savepoints(&self) -> bool {
        true
    }
}

/// Suffix the query with routing metadata: the resolved host option when one
/// is configured, and the shard token for non-default shards. Callables and
/// the log both observe the annotated text.
fn annotate(sql: &str, conn: &MockConnection) -> String {
    let mut out = String::from(sql);
    if let Some(host) = conn.options().host.as_deref() {
        out.push_str(" -- ");
        out.push_str(host);
    }
    if let ShardId::Named(name) = conn.shard() {
        out.push_str(" -- ");
        out.push_str(name);
    }
    out
}
