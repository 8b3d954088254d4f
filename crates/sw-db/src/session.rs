//! Run a unit of work either directly on a connection or inside one transaction.

use crate::error::DbError;
use crate::traits::{Connection, Executor};
use std::fmt::Display;

/// Execute `body` against `conn`, wrapped in a `BEGIN` / `COMMIT` when
/// `transactional` is set.
///
/// In transactional mode any error from `body` rolls the whole transaction
/// back before being returned. The body's error is always the one returned;
/// a failed rollback (for example because the script already ended the
/// transaction itself) is logged.
pub fn with_session<T, E, F>(conn: &mut dyn Connection, transactional: bool, body: F) -> Result<T, E>
where
    E: From<DbError> + Display,
    F: FnOnce(&dyn Executor) -> Result<T, E>,
{
    if !transactional {
        log::debug!("Running without a transaction on {}", conn.engine());
        return body(conn.as_executor());
    }

    log::debug!("Opening transaction on {}", conn.engine());
    let tx = conn.begin()?;
    match body(tx.as_executor()) {
        Ok(value) => {
            tx.commit()?;
            log::debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            match tx.rollback() {
                Ok(()) => log::info!("Transaction rolled back"),
                Err(rollback_err) => log::error!("{rollback_err} (after: {err})"),
            }
            Err(err)
        }
    }
}
