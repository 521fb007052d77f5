//! Subcommand handlers.

mod debt;
mod rate;
mod simulate;

use clap::Subcommand;

use crate::config::CliConfig;

#[derive(Subcommand)]
pub enum Command {
    /// Period rate at a utilization
    Rate(rate::RateCmd),

    /// Replay compound accrual against the configured pool
    Simulate(simulate::SimulateCmd),

    /// Amount owed on a simple-model loan
    Debt(debt::DebtCmd),
}

impl Command {
    pub fn run(self, config: &CliConfig) -> anyhow::Result<()> {
        match self {
            Command::Rate(cmd) => cmd.run(config),
            Command::Simulate(cmd) => cmd.run(config),
            Command::Debt(cmd) => cmd.run(),
        }
    }
}
