//! Reset command implementation

use anyhow::{Context, Result};
use sw_runner::State;

use crate::cli::{GlobalArgs, ResetArgs};
use crate::commands::common::in_session;
use crate::settings::Settings;

/// Execute the reset command
pub(crate) fn execute(args: &ResetArgs, global: &GlobalArgs) -> Result<()> {
    let target = Settings::resolve(global)?.target()?;
    let state = State {
        version: args.version,
        dirty: args.dirty,
    };

    in_session(&target, |store, exec| store.write(exec, state)).context("Failed to reset state")?;
    log::info!("State reset to {state}");
    Ok(())
}
