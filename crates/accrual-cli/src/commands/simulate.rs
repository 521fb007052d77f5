use accrual_oracle::store::RegisterStore;
use accrual_types::register::ValueRegister;
use accrual_types::{BORROW_TOKEN_DENOMINATION, U256};
use clap::Parser;

use crate::config::CliConfig;

#[derive(Parser)]
pub struct SimulateCmd {
    /// Number of one-period transitions to replay
    #[arg(long, default_value_t = 1)]
    periods: u64,
}

impl SimulateCmd {
    pub fn run(self, config: &CliConfig) -> anyhow::Result<()> {
        let refs = config.reference_inputs();
        let token = config.oracle.interest_token;

        let mut store = RegisterStore::new(config.oracle.clone());
        store.mint(ValueRegister::compound(
            config.oracle.register_identity(),
            config.register.carried_value,
            U256::from(BORROW_TOKEN_DENOMINATION),
            config.register.start_height,
        )?)?;
        print_register(store.get(&token)?)?;

        for _ in 0..self.periods {
            let current = store.get(&token)?;
            let version = current.version;
            let height = current.last_update_height().unwrap_or_default();
            let committed =
                store.advance(&token, version, &refs, height, config.register.execution_fee)?;
            print_register(committed)?;
        }
        Ok(())
    }
}

fn print_register(register: &ValueRegister) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(register)?);
    Ok(())
}
