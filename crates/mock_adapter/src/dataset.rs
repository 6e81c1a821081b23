use crate::connection::ShardId;
use crate::engine::MockDatabase;
use crate::error::DatabaseError;
use crate::Row;

/// Query-building collaborator over a [`MockDatabase`].
///
/// Enumerating rows delegates straight to the engine's row-fetch path. The
/// column list can be set explicitly; otherwise it is computed from the
/// first fetched row (which consumes one fetch resolution) and cached.
#[derive(Clone)]
pub struct MockDataset {
    db: MockDatabase,
    sql: String,
    shard: ShardId,
    columns: Option<Vec<String>>,
}

impl MockDataset {
    pub fn new(db: &MockDatabase, sql: impl Into<String>) -> Self {
        Self {
            db: db.clone(),
            sql: sql.into(),
            shard: ShardId::Default,
            columns: None,
        }
    }

    pub fn with_shard(mut self, shard: impl Into<ShardId>) -> Self {
        self.shard = shard.into();
        self
    }

    /// Pin the column list instead of inferring it from fetched rows.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn shard(&self) -> &ShardId {
        &self.shard
    }

    /// Stream each resolved row to `emit`.
    pub fn each_row(&self, emit: impl FnMut(Row)) -> Result<(), DatabaseError> {
        self.db.fetch_rows_on(&self.sql, self.shard.clone(), emit)
    }

    /// All rows of one fetch resolution.
    pub fn all(&self) -> Result<Vec<Row>, DatabaseError> {
        self.db.rows_on(&self.sql, self.shard.clone())
    }

    /// The first row of one fetch resolution, if any.
    pub fn first(&self) -> Result<Option<Row>, DatabaseError> {
        Ok(self.all()?.into_iter().next())
    }

    /// The column names: the explicit override when set, otherwise the keys
    /// of the first fetched row. The inferred list is cached.
    pub fn columns(&mut self) -> Result<Vec<String>, DatabaseError> {
        if let Some(columns) = &self.columns {
            return Ok(columns.clone());
        }
        let columns: Vec<String> = self
            .first()?
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        self.columns = Some(columns.clone());
        Ok(columns)
    }
}
