//! Init command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::in_session;
use crate::settings::Settings;

/// Execute the init command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let target = Settings::resolve(global)?.target()?;
    in_session(&target, |store, exec| store.initialize(exec))
        .context("Failed to initialize state")
}
