//! DuckDB backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Connection, Executor, Transaction};
use std::path::Path;
use sw_core::Engine;

/// Direct connection to a DuckDB database
pub struct DuckDbConnection {
    conn: duckdb::Connection,
}

impl DuckDbConnection {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn = duckdb::Connection::open_in_memory()
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = duckdb::Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }
}

fn execute_on(conn: &duckdb::Connection, sql: &str) -> DbResult<usize> {
    conn.execute(sql, []).map_err(DbError::from)
}

fn execute_batch_on(conn: &duckdb::Connection, sql: &str) -> DbResult<()> {
    conn.execute_batch(sql).map_err(DbError::from)
}

fn query_version_rows_on(conn: &duckdb::Connection, sql: &str) -> DbResult<Vec<(i64, bool)>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, bool>(1)?)))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

impl Executor for DuckDbConnection {
    fn execute(&self, sql: &str) -> DbResult<usize> {
        execute_on(&self.conn, sql)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        execute_batch_on(&self.conn, sql)
    }

    fn query_version_rows(&self, sql: &str) -> DbResult<Vec<(i64, bool)>> {
        query_version_rows_on(&self.conn, sql)
    }
}

impl Connection for DuckDbConnection {
    fn engine(&self) -> Engine {
        Engine::DuckDb
    }

    fn begin(&mut self) -> DbResult<Box<dyn Transaction + '_>> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(Box::new(DuckDbTransaction { tx }))
    }

    fn as_executor(&self) -> &dyn Executor {
        self
    }
}

/// Open DuckDB transaction
pub struct DuckDbTransaction<'conn> {
    tx: duckdb::Transaction<'conn>,
}

impl Executor for DuckDbTransaction<'_> {
    fn execute(&self, sql: &str) -> DbResult<usize> {
        execute_on(&self.tx, sql)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        execute_batch_on(&self.tx, sql)
    }

    fn query_version_rows(&self, sql: &str) -> DbResult<Vec<(i64, bool)>> {
        query_version_rows_on(&self.tx, sql)
    }
}

impl Transaction for DuckDbTransaction<'_> {
    fn commit(self: Box<Self>) -> DbResult<()> {
        self.tx
            .commit()
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    fn rollback(self: Box<Self>) -> DbResult<()> {
        self.tx
            .rollback()
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }

    fn as_executor(&self) -> &dyn Executor {
        self
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
