//! Resolved settings for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use sw_core::{Config, CoreError, Engine, StateTable, TransactionPolicy, TxMode};

use crate::cli::GlobalArgs;

/// Settings merged from flags, environment variables, and the config file.
///
/// clap already applies flag-over-environment precedence, so a value present
/// in [`GlobalArgs`] always wins over the config file.
#[derive(Debug)]
pub(crate) struct Settings {
    /// Directory containing migration SQL files
    pub migrations: PathBuf,

    engine: Option<Engine>,
    dsn: Option<String>,
    state_table: Option<StateTable>,
    run_in_transaction: TxMode,
    policy: TransactionPolicy,
}

/// Everything a database command needs to open its session
#[derive(Debug, Clone)]
pub(crate) struct Target {
    pub engine: Engine,
    pub dsn: String,
    pub state_table: StateTable,
    pub transactional: bool,
}

impl Settings {
    /// Load the config file (explicit or discovered) and merge it under `args`.
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => Config::load(path).context("Failed to load configuration file")?,
            None => Config::discover(Path::new("."))
                .context("Failed to load project configuration")?
                .unwrap_or_default(),
        };
        Self::merge(args, config)
    }

    /// Merge `args` over `config` and check the settings every command needs.
    pub fn merge(args: &GlobalArgs, config: Config) -> Result<Self> {
        let policy = config.transaction_policy();
        let engine = args.engine.or(config.engine);
        let config_dsn = engine.map_or_else(|| config.dsn.clone(), |e| config.dsn_for(e));
        let migrations = args
            .migrations
            .clone()
            .or(config.migrations)
            .ok_or_else(|| missing("migrations", "-m/--migrations"))?;

        Ok(Self {
            migrations,
            engine,
            dsn: args.dsn.clone().or(config_dsn),
            state_table: args.state_table.clone().or(config.state_table),
            run_in_transaction: args
                .run_in_transaction
                .or(config.run_in_transaction)
                .unwrap_or_default(),
            policy,
        })
    }

    /// Database settings; fails if any of them is unset.
    pub fn target(&self) -> Result<Target> {
        let engine = self.engine.ok_or_else(|| missing("engine", "-e/--engine"))?;
        let dsn = self.dsn.clone().ok_or_else(|| missing("dsn", "-d/--dsn"))?;
        let state_table = self
            .state_table
            .clone()
            .ok_or_else(|| missing("state_table", "-s/--state-table"))?;
        let transactional = self.policy.resolve(self.run_in_transaction, engine);

        log::debug!(
            "Target {engine}, state table {state_table}, run_in_transaction={} ({})",
            self.run_in_transaction,
            if transactional { "transactional" } else { "direct" }
        );
        Ok(Target {
            engine,
            dsn,
            state_table,
            transactional,
        })
    }
}

fn missing(key: &str, flag: &str) -> anyhow::Error {
    CoreError::ConfigInvalid {
        message: format!("{flag} is required (or set '{key}' in the config file)"),
    }
    .into()
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
