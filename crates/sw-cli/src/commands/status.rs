//! Status command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::in_session;
use crate::settings::Settings;

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let target = Settings::resolve(global)?.target()?;
    let state = in_session(&target, |store, exec| store.read(exec)).context("Failed to get status")?;

    match args.output {
        StatusOutput::Text => println!("{state}"),
        StatusOutput::Json => println!("{}", serde_json::to_string(&state)?),
    }
    Ok(())
}
