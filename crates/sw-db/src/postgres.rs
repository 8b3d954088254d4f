//! PostgreSQL backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Connection, Executor, Transaction};
use postgres::{Client, GenericClient, NoTls};
use std::cell::RefCell;
use sw_core::Engine;

/// Direct connection to a PostgreSQL server
pub struct PostgresConnection {
    client: RefCell<Client>,
}

impl PostgresConnection {
    /// Connect using a libpq-style connection string or a `postgres://` URL
    pub fn new(dsn: &str) -> DbResult<Self> {
        let client =
            Client::connect(dsn, NoTls).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            client: RefCell::new(client),
        })
    }
}

fn execute_on(client: &mut impl GenericClient, sql: &str) -> DbResult<usize> {
    let rows = client.execute(sql, &[])?;
    usize::try_from(rows).map_err(|e| DbError::ExecutionError(e.to_string()))
}

fn query_version_rows_on(client: &mut impl GenericClient, sql: &str) -> DbResult<Vec<(i64, bool)>> {
    let mut out = Vec::new();
    for row in client.query(sql, &[])? {
        let version: i64 = row.try_get(0)?;
        let dirty: bool = row.try_get(1)?;
        out.push((version, dirty));
    }
    Ok(out)
}

impl Executor for PostgresConnection {
    fn execute(&self, sql: &str) -> DbResult<usize> {
        execute_on(&mut *self.client.borrow_mut(), sql)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        Ok(self.client.borrow_mut().batch_execute(sql)?)
    }

    fn query_version_rows(&self, sql: &str) -> DbResult<Vec<(i64, bool)>> {
        query_version_rows_on(&mut *self.client.borrow_mut(), sql)
    }
}

impl Connection for PostgresConnection {
    fn engine(&self) -> Engine {
        Engine::Postgres
    }

    fn begin(&mut self) -> DbResult<Box<dyn Transaction + '_>> {
        let tx = self
            .client
            .get_mut()
            .transaction()
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        Ok(Box::new(PostgresTransaction {
            tx: RefCell::new(tx),
        }))
    }

    fn as_executor(&self) -> &dyn Executor {
        self
    }
}

/// Open PostgreSQL transaction
pub struct PostgresTransaction<'conn> {
    tx: RefCell<postgres::Transaction<'conn>>,
}

impl Executor for PostgresTransaction<'_> {
    fn execute(&self, sql: &str) -> DbResult<usize> {
        execute_on(&mut *self.tx.borrow_mut(), sql)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        Ok(self.tx.borrow_mut().batch_execute(sql)?)
    }

    fn query_version_rows(&self, sql: &str) -> DbResult<Vec<(i64, bool)>> {
        query_version_rows_on(&mut *self.tx.borrow_mut(), sql)
    }
}

impl Transaction for PostgresTransaction<'_> {
    fn commit(self: Box<Self>) -> DbResult<()> {
        self.tx
            .into_inner()
            .commit()
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    fn rollback(self: Box<Self>) -> DbResult<()> {
        self.tx
            .into_inner()
            .rollback()
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }

    fn as_executor(&self) -> &dyn Executor {
        self
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
