//! Persisted `(version, dirty)` state record

use crate::error::{RunnerError, RunnerResult};
use serde::Serialize;
use std::fmt;
use sw_core::StateTable;
use sw_db::{DbError, Executor};

/// Migration progress stored in the state table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct State {
    /// Version of the last migration that completed; 0 when none has
    pub version: u64,

    /// True while a migration's outcome is unknown
    pub dirty: bool,
}

impl State {
    /// Clean state at `version`
    pub fn clean(version: u64) -> Self {
        Self {
            version,
            dirty: false,
        }
    }
}

/// Renders as `<version>` or `<version> (dirty)`.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dirty {
            write!(f, "{} (dirty)", self.version)
        } else {
            write!(f, "{}", self.version)
        }
    }
}

/// Reads and writes the single state row in an operator-chosen table.
///
/// Every operation goes through the [`Executor`] it is handed, so the same
/// store works on a plain connection or inside a transaction.
#[derive(Debug, Clone)]
pub struct StateStore {
    table: StateTable,
}

impl StateStore {
    /// Store backed by `table`
    pub fn new(table: StateTable) -> Self {
        Self { table }
    }

    /// Name of the backing table
    pub fn table(&self) -> &StateTable {
        &self.table
    }

    /// Create the state table and seed it with `(0, false)`.
    ///
    /// Fails if the table already exists; the engine's error is passed through.
    pub fn initialize(&self, exec: &dyn Executor) -> RunnerResult<()> {
        let create = format!(
            "CREATE TABLE {} (version BIGINT NOT NULL, dirty BOOLEAN NOT NULL)",
            self.table
        );
        let seed = format!("INSERT INTO {} VALUES (0, false)", self.table);

        for sql in [create, seed] {
            exec.execute(&sql).map_err(|e| RunnerError::StateInit {
                table: self.table.to_string(),
                source: e,
            })?;
        }
        log::info!("Initialized state table {}", self.table);
        Ok(())
    }

    /// Read the current state. The table must hold exactly one row.
    pub fn read(&self, exec: &dyn Executor) -> RunnerResult<State> {
        let rows = exec
            .query_version_rows(&format!("SELECT version, dirty FROM {}", self.table))
            .map_err(|e| match e {
                DbError::TableNotFound(_) => self.unreadable("table does not exist".to_string()),
                other => self.unreadable(other.to_string()),
            })?;

        let (version, dirty) = match rows.as_slice() {
            [row] => *row,
            [] => return Err(self.unreadable("table is empty".to_string())),
            more => {
                return Err(self.unreadable(format!(
                    "expected exactly one row, found {}",
                    more.len()
                )))
            }
        };
        let version = u64::try_from(version)
            .map_err(|_| self.unreadable(format!("negative version {version}")))?;

        let state = State { version, dirty };
        log::debug!("Read state {state} from {}", self.table);
        Ok(state)
    }

    /// Overwrite the state row unconditionally.
    ///
    /// The update has no WHERE clause; it must touch exactly one row.
    pub fn write(&self, exec: &dyn Executor, state: State) -> RunnerResult<()> {
        let sql = format!(
            "UPDATE {} SET version = {}, dirty = {}",
            self.table, state.version, state.dirty
        );
        let rows = exec.execute(&sql).map_err(|e| RunnerError::StateWrite {
            table: self.table.to_string(),
            source: e,
        })?;
        if rows != 1 {
            return Err(RunnerError::StateCorrupt {
                table: self.table.to_string(),
                rows,
            });
        }
        log::debug!("Wrote state {state} to {}", self.table);
        Ok(())
    }

    fn unreadable(&self, reason: String) -> RunnerError {
        RunnerError::StateUnreadable {
            table: self.table.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
