//! Validate command implementation

use anyhow::{Context, Result};
use sw_core::MigrationSet;

use crate::cli::GlobalArgs;
use crate::settings::Settings;

/// Execute the validate command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let settings = Settings::resolve(global)?;
    let migrations =
        MigrationSet::load(&settings.migrations).context("Failed to load migrations")?;

    for migration in migrations.iter() {
        log::debug!(
            "{} (version {}, {} bytes)",
            migration.name,
            migration.version,
            migration.script.len()
        );
    }
    if let Some(latest) = migrations.latest_version() {
        log::debug!("Latest migration version is {latest}");
    }
    println!("{} migrations OK", migrations.len());
    Ok(())
}
