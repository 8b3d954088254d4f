//! Execution capability traits

use crate::error::DbResult;
use sw_core::Engine;

/// Something that can run SQL against a database.
///
/// Implemented both by plain connections and by open transactions, so code
/// written against `&dyn Executor` runs unchanged in either mode.
pub trait Executor {
    /// Execute a single statement, returning the number of affected rows
    fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute a script that may contain several statements, as one unit
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query whose first two columns are an integer and a boolean,
    /// returning every row
    fn query_version_rows(&self, sql: &str) -> DbResult<Vec<(i64, bool)>>;
}

/// A direct database connection
pub trait Connection: Executor {
    /// Engine this connection talks to
    fn engine(&self) -> Engine;

    /// Open a transaction. Dropping it without calling
    /// [`Transaction::commit`] rolls it back.
    fn begin(&mut self) -> DbResult<Box<dyn Transaction + '_>>;

    /// View this connection as a plain executor
    fn as_executor(&self) -> &dyn Executor;
}

/// A transaction scoped to a borrowed [`Connection`]
pub trait Transaction: Executor {
    /// Commit all work done inside the transaction
    fn commit(self: Box<Self>) -> DbResult<()>;

    /// Discard all work done inside the transaction
    fn rollback(self: Box<Self>) -> DbResult<()>;

    /// View this transaction as a plain executor
    fn as_executor(&self) -> &dyn Executor;
}
