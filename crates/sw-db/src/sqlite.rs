//! SQLite backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Connection, Executor, Transaction};
use rusqlite::Connection as RawConnection;
use std::path::Path;
use sw_core::Engine;

/// Direct connection to a SQLite database
pub struct SqliteConnection {
    conn: RawConnection,
}

impl SqliteConnection {
    /// Create a new in-memory SQLite connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            RawConnection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open (or create) a SQLite database file
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = RawConnection::open(path)
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

fn query_version_rows_on(conn: &RawConnection, sql: &str) -> DbResult<Vec<(i64, bool)>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, bool>(1)?)))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
}

impl Executor for SqliteConnection {
    fn execute(&self, sql: &str) -> DbResult<usize> {
        Ok(self.conn.execute(sql, [])?)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        Ok(self.conn.execute_batch(sql)?)
    }

    fn query_version_rows(&self, sql: &str) -> DbResult<Vec<(i64, bool)>> {
        query_version_rows_on(&self.conn, sql)
    }
}

impl Connection for SqliteConnection {
    fn engine(&self) -> Engine {
        Engine::Sqlite
    }

    fn begin(&mut self) -> DbResult<Box<dyn Transaction + '_>> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(Box::new(SqliteTransaction { tx }))
    }

    fn as_executor(&self) -> &dyn Executor {
        self
    }
}

/// Open SQLite transaction
pub struct SqliteTransaction<'conn> {
    tx: rusqlite::Transaction<'conn>,
}

impl Executor for SqliteTransaction<'_> {
    fn execute(&self, sql: &str) -> DbResult<usize> {
        Ok(self.tx.execute(sql, [])?)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        Ok(self.tx.execute_batch(sql)?)
    }

    fn query_version_rows(&self, sql: &str) -> DbResult<Vec<(i64, bool)>> {
        query_version_rows_on(&self.tx, sql)
    }
}

impl Transaction for SqliteTransaction<'_> {
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
