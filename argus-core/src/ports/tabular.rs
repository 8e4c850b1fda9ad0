// argus-core/src/ports/tabular.rs

use crate::error::ArgusError;
use async_trait::async_trait;

/// A table addressable for sampling. `database` is the schema/catalog
/// name in the backend's terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub database: String,
    pub table: String,
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.database, self.table)
    }
}

/// A bounded row sample. `rows[i][j]` is the string form of column `j`
/// in row `i`; NULL cells are `None`.
#[derive(Debug, Clone, Default)]
pub struct TableSample {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Queryable tabular backend (relational database or similar).
/// Implementations exclude their dialect's system schemas from
/// enumeration.
#[async_trait]
pub trait TabularSource: Send + Sync {
    async fn list_tables(&self) -> Result<Vec<TableRef>, ArgusError>;

    /// Reads up to `limit` rows with all columns as text.
    async fn sample_rows(&self, table: &TableRef, limit: usize) -> Result<TableSample, ArgusError>;
}
