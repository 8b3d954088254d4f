//! Error types for sw-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Transaction management error (D004)
    #[error("[D004] Transaction failed: {0}")]
    TransactionError(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants, so the message
        // is the only thing to classify on. "Table with name .. already
        // exists" must stay an execution error.
        let msg = err.to_string();
        let names_table = msg.contains("Table with name") || msg.contains("Table or view with name");
        if (names_table && msg.contains("does not exist"))
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        let msg = err.to_string();
        if msg.contains("no such table") {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}

impl From<postgres::Error> for DbError {
    fn from(err: postgres::Error) -> Self {
        if err.code() == Some(&postgres::error::SqlState::UNDEFINED_TABLE) {
            DbError::TableNotFound(err.to_string())
        } else {
            DbError::ExecutionError(err.to_string())
        }
    }
}

/// MySQL server error code for a missing table
const ER_NO_SUCH_TABLE: u16 = 1146;

impl From<mysql::Error> for DbError {
    fn from(err: mysql::Error) -> Self {
        match &err {
            mysql::Error::MySqlError(e) if e.code == ER_NO_SUCH_TABLE => {
                DbError::TableNotFound(err.to_string())
            }
            _ => DbError::ExecutionError(err.to_string()),
        }
    }
}
