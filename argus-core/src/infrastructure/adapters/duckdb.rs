// argus-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{Config, Connection, params};
use sqlparser::ast::Statement;
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;
use std::sync::{Arc, Mutex};

// Hexagonal imports
use crate::domain::error::DomainError;
use crate::error::ArgusError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::tabular::{TableRef, TableSample, TabularSource};

/// Schemas never enumerated for scanning.
const SYSTEM_SCHEMAS: [&str; 2] = ["information_schema", "pg_catalog"];

pub struct DuckDbSource {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbSource {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, ArgusError> {
        self.conn.lock().map_err(|_| {
            ArgusError::Infrastructure(InfrastructureError::Io(std::io::Error::other(
                "DuckDB Mutex Poisoned",
            )))
        })
    }

    /// Executes an ad-hoc sampling query. Only a single SELECT statement
    /// is permitted; anything else is rejected before touching the engine.
    pub fn ad_hoc(&self, sql: &str) -> Result<TableSample, ArgusError> {
        ensure_read_only(sql)?;
        let conn = self.lock()?;
        read_sample(&conn, sql)
    }

    /// Raw DDL/DML hatch for tests and fixtures.
    pub fn execute(&self, sql: &str) -> Result<(), ArgusError> {
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(to_db_err)?;
        Ok(())
    }
}

#[async_trait]
impl TabularSource for DuckDbSource {
    async fn list_tables(&self) -> Result<Vec<TableRef>, ArgusError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT table_schema, table_name FROM information_schema.tables \
                 WHERE table_type = 'BASE TABLE' ORDER BY table_schema, table_name",
            )
            .map_err(to_db_err)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(TableRef {
                    database: row.get(0)?,
                    table: row.get(1)?,
                })
            })
            .map_err(to_db_err)?;

        let mut tables = Vec::new();
        for row in rows {
            let table = row.map_err(to_db_err)?;
            if !SYSTEM_SCHEMAS.contains(&table.database.as_str()) {
                tables.push(table);
            }
        }
        Ok(tables)
    }

    async fn sample_rows(&self, table: &TableRef, limit: usize) -> Result<TableSample, ArgusError> {
        let conn = self.lock()?;

        // Column names first, then everything cast to VARCHAR so the
        // classifier sees the same string form regardless of column type.
        let mut stmt = conn
            .prepare(
                "SELECT column_name FROM information_schema.columns \
                 WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
            )
            .map_err(to_db_err)?;
        let columns: Vec<String> = stmt
            .query_map(params![table.database, table.table], |row| row.get(0))
            .map_err(to_db_err)?
            .collect::<Result<_, _>>()
            .map_err(to_db_err)?;

        if columns.is_empty() {
            return Err(ArgusError::Domain(DomainError::not_found(
                "table",
                &table.to_string(),
            )));
        }

        let select_list = columns
            .iter()
            .map(|c| {
                let quoted = quote_ident(c);
                format!("CAST({quoted} AS VARCHAR) AS {quoted}")
            })
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {} FROM {}.{} LIMIT {}",
            select_list,
            quote_ident(&table.database),
            quote_ident(&table.table),
            limit
        );

        let mut sample = read_sample(&conn, &sql)?;
        sample.columns = columns;
        Ok(sample)
    }
}

fn read_sample(conn: &Connection, sql: &str) -> Result<TableSample, ArgusError> {
    let mut stmt = conn.prepare(sql).map_err(to_db_err)?;
    let mut rows = stmt.query([]).map_err(to_db_err)?;

    let mut sample = TableSample::default();

    // Column metadata is only available once the statement has executed.
    if let Some(statement) = rows.as_ref() {
        sample.columns = statement
            .column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
    }

    while let Some(row) = rows.next().map_err(to_db_err)? {
        let mut cells = Vec::with_capacity(sample.columns.len());
        for idx in 0..sample.columns.len() {
            let cell: Option<String> = row.get(idx).map_err(to_db_err)?;
            cells.push(cell);
        }
        sample.rows.push(cells);
    }

    Ok(sample)
}

/// Rejects anything that is not exactly one SELECT statement.
fn ensure_read_only(sql: &str) -> Result<(), ArgusError> {
    let statements = Parser::parse_sql(&DuckDbDialect {}, sql)
        .map_err(|e| ArgusError::Domain(DomainError::MalformedInput(e.to_string())))?;

    match statements.as_slice() {
        [Statement::Query(_)] => Ok(()),
        [] => Err(ArgusError::Domain(DomainError::MalformedInput(
            "empty query".to_string(),
        ))),
        _ => Err(ArgusError::Domain(DomainError::MalformedInput(
            "only a single SELECT statement is permitted".to_string(),
        ))),
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn to_db_err(e: duckdb::Error) -> ArgusError {
    ArgusError::Infrastructure(InfrastructureError::Database(DatabaseError::DuckDb(e)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn seeded() -> Result<DuckDbSource> {
        let source = DuckDbSource::new(":memory:")?;
        source.execute(
            "CREATE TABLE customers (id INTEGER, email VARCHAR, phone VARCHAR);
             INSERT INTO customers VALUES
               (1, 'john.doe@example.com', '9876543210'),
               (2, NULL, NULL);",
        )?;
        Ok(source)
    }

    #[tokio::test]
    async fn test_list_tables_excludes_system_schemas() -> Result<()> {
        let source = seeded()?;
        let tables = source.list_tables().await?;
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].table, "customers");
        assert!(!SYSTEM_SCHEMAS.contains(&tables[0].database.as_str()));
        Ok(())
    }

    #[tokio::test]
    async fn test_sample_rows_as_text() -> Result<()> {
        let source = seeded()?;
        let tables = source.list_tables().await?;
        let sample = source.sample_rows(&tables[0], 500).await?;

        assert_eq!(sample.columns, vec!["id", "email", "phone"]);
        assert_eq!(sample.rows.len(), 2);
        assert_eq!(sample.rows[0][0].as_deref(), Some("1"));
        assert_eq!(sample.rows[0][1].as_deref(), Some("john.doe@example.com"));
        assert_eq!(sample.rows[1][1], None);
        Ok(())
    }

    #[tokio::test]
    async fn test_ad_hoc_rejects_writes() -> Result<()> {
        let source = seeded()?;
        assert!(source.ad_hoc("DELETE FROM customers").is_err());
        assert!(source.ad_hoc("SELECT 1; SELECT 2").is_err());
        let sample = source.ad_hoc("SELECT email FROM customers WHERE id = 1")?;
        assert_eq!(sample.rows.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_table_is_not_found() -> Result<()> {
        let source = seeded()?;
        let missing = TableRef {
            database: "main".to_string(),
            table: "nope".to_string(),
        };
        assert!(source.sample_rows(&missing, 10).await.is_err());
        Ok(())
    }
}
