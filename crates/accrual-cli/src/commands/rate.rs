use accrual_rate::polynomial::{annualized, PolynomialRateModel};
use accrual_types::coefficients::{CoefficientSet, Preset};
use clap::Parser;

use crate::config::CliConfig;

#[derive(Parser)]
pub struct RateCmd {
    /// Utilization scaled by 10^8 (100_000_000 = 100%)
    #[arg(long)]
    utilization: u64,

    /// Use a named preset instead of the configured coefficients
    #[arg(long)]
    preset: Option<Preset>,
}

impl RateCmd {
    pub fn run(self, config: &CliConfig) -> anyhow::Result<()> {
        let coefficients = self
            .preset
            .map(CoefficientSet::from_preset)
            .unwrap_or_else(|| config.parameters.coefficients());
        let rate = PolynomialRateModel::new(coefficients).compute_period_rate(self.utilization)?;

        tracing::debug!(utilization = self.utilization, rate, "period rate computed");
        let out = serde_json::json!({
            "utilization": self.utilization,
            "coefficients": coefficients,
            "period_rate": rate.to_string(),
            "annualized": annualized(rate).to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        Ok(())
    }
}
