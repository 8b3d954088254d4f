//! Apply engine: advance the persisted state through pending migrations.
//!
//! Every script execution is bracketed by two state writes. Before the script
//! runs the state is marked dirty at the last good version; after it succeeds
//! the state moves to the script's version and is marked clean. A failure
//! therefore leaves the state dirty at exactly the boundary between the last
//! known-good version and the first unknown one.

use crate::error::{RunnerError, RunnerResult};
use crate::state::{State, StateStore};
use sw_core::{Migration, MigrationSet};
use sw_db::{with_session, Connection, Executor};

/// Whether pending migrations are executed or only listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// List pending migrations without executing or writing anything
    #[default]
    DryRun,
    /// Execute pending migrations and advance the state
    Force,
}

/// Outcome of a successful [`Migrator::apply`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Mode the run used
    pub mode: ApplyMode,

    /// State read at the start of the run
    pub initial: State,

    /// State at the end of the run (equal to `initial` for dry runs)
    pub current: State,

    /// Names of the migrations applied, or that would be applied in a dry run
    pub migrations: Vec<String>,
}

impl ApplyReport {
    /// Number of migrations applied (or pending, for a dry run)
    pub fn count(&self) -> usize {
        self.migrations.len()
    }

    /// Number of migrations actually executed; always 0 for a dry run
    pub fn applied(&self) -> usize {
        match self.mode {
            ApplyMode::DryRun => 0,
            ApplyMode::Force => self.migrations.len(),
        }
    }
}

/// Applies a [`MigrationSet`] to the database tracked by a [`StateStore`]
pub struct Migrator<'a> {
    migrations: &'a MigrationSet,
    store: &'a StateStore,
}

impl<'a> Migrator<'a> {
    /// Create a migrator for `migrations` tracked in `store`
    pub fn new(migrations: &'a MigrationSet, store: &'a StateStore) -> Self {
        Self { migrations, store }
    }

    /// Run the full apply algorithm on `conn`.
    ///
    /// When `transactional` is set, the state read and every pending migration
    /// run inside one transaction that is committed only if all of them
    /// succeed. `on_start` is called with each migration before it runs (or,
    /// in a dry run, as it is listed).
    pub fn apply(
        &self,
        conn: &mut dyn Connection,
        transactional: bool,
        mode: ApplyMode,
        on_start: &mut dyn FnMut(&Migration),
    ) -> RunnerResult<ApplyReport> {
        with_session(conn, transactional, |exec| self.apply_with(exec, mode, on_start))
    }

    /// Run the apply algorithm against an already-chosen executor.
    pub fn apply_with(
        &self,
        exec: &dyn Executor,
        mode: ApplyMode,
        on_start: &mut dyn FnMut(&Migration),
    ) -> RunnerResult<ApplyReport> {
        let initial = self.store.read(exec)?;
        if initial.dirty {
            return Err(RunnerError::DirtyState {
                table: self.store.table().to_string(),
                version: initial.version,
            });
        }

        let pending = self.migrations.pending_after(initial.version);
        log::info!(
            "{} pending migrations after version {}",
            pending.len(),
            initial.version
        );

        let mut report = ApplyReport {
            mode,
            initial,
            current: initial,
            migrations: Vec::with_capacity(pending.len()),
        };

        for migration in pending {
            on_start(migration);

            if mode == ApplyMode::Force {
                let completed = report.migrations.len();
                report.current = self.apply_one(exec, report.current, migration, completed)?;
            }
            report.migrations.push(migration.name.clone());
        }

        Ok(report)
    }

    /// Execute a single migration between its dirty and clean state writes.
    fn apply_one(
        &self,
        exec: &dyn Executor,
        current: State,
        migration: &Migration,
        completed: usize,
    ) -> RunnerResult<State> {
        self.store.write(
            exec,
            State {
                version: current.version,
                dirty: true,
            },
        )?;

        log::debug!("Executing {} (version {})", migration.name, migration.version);
        exec.execute_batch(&migration.script)
            .map_err(|e| RunnerError::Execution {
                name: migration.name.clone(),
                version: migration.version,
                completed,
                source: e,
            })?;

        let next = State::clean(migration.version);
        self.store.write(exec, next)?;
        log::info!("Applied {}", migration.name);
        Ok(next)
    }
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
