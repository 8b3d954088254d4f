//! sw-db - Database abstraction layer for Stepwise
//!
//! This crate provides the `Executor` capability shared by plain connections
//! and open transactions, the `with_session` helper that picks between them,
//! and DuckDB, SQLite, PostgreSQL and MySQL implementations.

pub mod connect;
pub mod duckdb;
pub mod error;
pub mod mysql;
pub mod postgres;
pub mod session;
pub mod sqlite;
pub mod traits;

pub use self::duckdb::{DuckDbConnection, DuckDbTransaction};
pub use self::mysql::{MySqlConnection, MySqlTransaction};
pub use self::postgres::{PostgresConnection, PostgresTransaction};
pub use connect::connect;
pub use error::{DbError, DbResult};
pub use session::with_session;
pub use sqlite::{SqliteConnection, SqliteTransaction};
pub use traits::{Connection, Executor, Transaction};
