//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use sw_core::migration::MAX_VERSION;
use sw_core::{Engine, StateTable, TxMode};

/// Stepwise - ordered, state-tracked SQL migrations
#[derive(Parser, Debug)]
#[command(name = "sw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands.
///
/// Anything left unset here falls back to the project config file.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Database engine (duckdb, sqlite, postgres, mysql)
    #[arg(short, long, global = true, env = "SW_ENGINE")]
    pub engine: Option<Engine>,

    /// Database connection string
    #[arg(short, long, global = true, env = "SW_DSN")]
    pub dsn: Option<String>,

    /// Table that records migration state, optionally schema-qualified
    #[arg(short, long, global = true, env = "SW_STATE_TABLE")]
    pub state_table: Option<StateTable>,

    /// Directory containing migration SQL files
    #[arg(short, long, global = true, env = "SW_MIGRATIONS")]
    pub migrations: Option<PathBuf>,

    /// Run in one transaction: auto, always, or never
    #[arg(short = 't', long, global = true, env = "SW_RUN_IN_TRANSACTION")]
    pub run_in_transaction: Option<TxMode>,

    /// Path to a config file (default: stepwise.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the migrations directory is well-formed
    Validate,

    /// Create the state table and seed it at version 0
    Init,

    /// Print the current version and dirty flag
    Status(StatusArgs),

    /// Overwrite the recorded state (manual repair)
    Reset(ResetArgs),

    /// Apply pending migrations (dry run unless --force)
    Migrate(MigrateArgs),
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// `<version>` or `<version> (dirty)`
    Text,
    /// JSON object with version and dirty fields
    Json,
}

/// Arguments for the reset command
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Version to record
    #[arg(value_parser = clap::value_parser!(u64).range(..=MAX_VERSION))]
    pub version: u64,

    /// Record the state as dirty
    #[arg(long)]
    pub dirty: bool,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Execute migrations instead of listing them
    #[arg(short, long)]
    pub force: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
