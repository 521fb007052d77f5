//! accrual: operator CLI for the borrow-token interest oracle.
//!
//! Inspect period rates, replay compound accrual against a configured pool,
//! and compute simple-model debts.

mod commands;
mod config;

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Command;
use crate::config::CliConfig;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Config file [default: $ACCRUAL_CONFIG, else devnet defaults]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("accrual={}", config.logging.log_level).parse()?),
        )
        .init();

    cli.command.run(&config)
}
