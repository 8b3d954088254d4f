//! Migrate command implementation

use anyhow::{Context, Result};
use sw_core::MigrationSet;
use sw_runner::{ApplyMode, Migrator, StateStore};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::open;
use crate::settings::Settings;

/// Execute the migrate command
pub(crate) fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let settings = Settings::resolve(global)?;
    let target = settings.target()?;

    let mode = if args.force {
        ApplyMode::Force
    } else {
        eprintln!("running in dry-run mode because '--force' was not provided");
        ApplyMode::DryRun
    };

    let migrations =
        MigrationSet::load(&settings.migrations).context("Failed to load migrations")?;
    let store = StateStore::new(target.state_table.clone());
    let mut conn = open(&target)?;

    let report = Migrator::new(&migrations, &store)
        .apply(conn.as_mut(), target.transactional, mode, &mut |m| {
            println!("{}", m.name)
        })
        .context("Failed to migrate")?;

    log::info!(
        "{} of {} pending migrations applied, state is now {}",
        report.applied(),
        report.count(),
        report.current
    );
    Ok(())
}
