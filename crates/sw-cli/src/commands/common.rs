//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sw_db::{connect, with_session, Connection, Executor};
use sw_runner::{RunnerResult, StateStore};

use crate::settings::Target;

/// Open the single connection a command uses.
pub(crate) fn open(target: &Target) -> Result<Box<dyn Connection>> {
    connect(target.engine, &target.dsn)
        .with_context(|| format!("Failed to connect to {} database", target.engine))
}

/// Run `body` against the target's state store in one session.
pub(crate) fn in_session<T>(
    target: &Target,
    body: impl FnOnce(&StateStore, &dyn Executor) -> RunnerResult<T>,
) -> Result<T> {
    let mut conn = open(target)?;
    let store = StateStore::new(target.state_table.clone());
    let value = with_session(conn.as_mut(), target.transactional, |exec| body(&store, exec))?;
    Ok(value)
}
