//! Stepwise CLI - ordered, state-tracked SQL migrations

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod settings;

use cli::Cli;
use commands::{init, migrate, reset, status, validate};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        cli::Commands::Validate => validate::execute(&cli.global),
        cli::Commands::Init => init::execute(&cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::Reset(args) => reset::execute(args, &cli.global),
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global),
    }
}
