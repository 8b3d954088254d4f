//! Error types for sw-runner

use sw_core::CoreError;
use sw_db::DbError;
use thiserror::Error;

/// State store and apply engine errors
#[derive(Error, Debug)]
pub enum RunnerError {
    /// R001: The state table could not be created or seeded
    #[error("[R001] Failed to create state table '{table}': {source}")]
    StateInit { table: String, source: DbError },

    /// R002: The state table is missing, empty, or holds unusable rows
    #[error("[R002] Failed to read state from '{table}': {reason}")]
    StateUnreadable { table: String, reason: String },

    /// R003: The state row could not be updated
    #[error("[R003] Failed to write state to '{table}': {source}")]
    StateWrite { table: String, source: DbError },

    /// R004: An update touched a number of rows other than one
    #[error("[R004] State table '{table}' must hold exactly one row, update affected {rows}")]
    StateCorrupt { table: String, rows: usize },

    /// R005: The previous run's outcome is unknown
    #[error("[R005] State in '{table}' is dirty at version {version}, will not migrate. Repair the database by hand, then reset the state")]
    DirtyState { table: String, version: u64 },

    /// R006: A migration script failed
    ///
    /// `completed` counts the migrations that succeeded earlier in the same
    /// run; in transactional mode their effects were rolled back.
    #[error("[R006] Failed to execute migration {name:?} (version {version}) after {completed} succeeded in this run: {source}")]
    Execution {
        name: String,
        version: u64,
        completed: usize,
        source: DbError,
    },

    /// Database error outside a specific state or migration step
    #[error(transparent)]
    Db(#[from] DbError),

    /// Core error (loading, configuration)
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
