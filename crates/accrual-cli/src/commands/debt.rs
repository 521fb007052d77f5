use accrual_rate::fixed::FixedRateModel;
use clap::Parser;

#[derive(Parser)]
pub struct DebtCmd {
    /// Borrowed principal
    #[arg(long)]
    principal: u128,

    /// Annual rate scaled by 10^6 (150_000 = 15%)
    #[arg(long)]
    annual_rate: u64,

    /// Height at loan origination
    #[arg(long)]
    borrow_height: u64,

    /// Current block height
    #[arg(long)]
    current_height: u64,
}

impl DebtCmd {
    pub fn run(self) -> anyhow::Result<()> {
        let model = FixedRateModel::new(self.annual_rate)?;
        let (principal, from, to) = (self.principal, self.borrow_height, self.current_height);
        let interest = model.interest_since(principal, from, to)?;
        let owed = model.owed_amount(principal, from, to)?;

        let out = serde_json::json!({
            "principal": self.principal.to_string(),
            "annual_rate": self.annual_rate,
            "duration": self.current_height.saturating_sub(self.borrow_height),
            "interest": interest.to_string(),
            "owed": owed.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        Ok(())
    }
}
