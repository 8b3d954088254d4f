//! Open a connection for a configured engine

use crate::duckdb::DuckDbConnection;
use crate::error::DbResult;
use crate::mysql::MySqlConnection;
use crate::postgres::PostgresConnection;
use crate::sqlite::SqliteConnection;
use crate::traits::Connection;
use sw_core::Engine;

/// Open a direct connection to `dsn` using the driver for `engine`.
pub fn connect(engine: Engine, dsn: &str) -> DbResult<Box<dyn Connection>> {
    log::debug!("Connecting to {engine} database");
    match engine {
        Engine::DuckDb => Ok(Box::new(DuckDbConnection::new(dsn)?)),
        Engine::Sqlite => Ok(Box::new(SqliteConnection::new(dsn)?)),
        Engine::Postgres => Ok(Box::new(PostgresConnection::new(dsn)?)),
        Engine::MySql => Ok(Box::new(MySqlConnection::new(dsn)?)),
    }
}
