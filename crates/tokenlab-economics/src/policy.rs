//! # Monetary Policy Scenarios
//!
//! Year-stepped supply projection under constant inflation and burn rates.
//!
//! ```text
//! minted_y   = supply_{y-1} × inflation
//! burned_y   = supply_{y-1} × burn
//! supply_y   = supply_{y-1} + minted_y − burned_y
//! price_y    = price_{y-1} / (1 + inflation − burn)     (only when the factor > 0)
//! ```
//!
//! Price reacts only through inverse supply elasticity; there is no demand
//! term. This compares policies against each other and is not a forecast.

use serde::{Deserialize, Serialize};
use tokenlab_core::{Result, TokenomicsError};
use tracing::{info, warn};

/// Annual monetary policy, all in percent
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicParams {
    pub inflation_rate_pct: f64,
    pub burn_rate_pct: f64,
    pub staking_reward_pct: f64,
}

impl Default for EconomicParams {
    fn default() -> Self {
        Self {
            inflation_rate_pct: 2.0,
            burn_rate_pct: 1.0,
            staking_reward_pct: 5.0,
        }
    }
}

impl EconomicParams {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("inflation rate", self.inflation_rate_pct),
            ("burn rate", self.burn_rate_pct),
            ("staking reward", self.staking_reward_pct),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(TokenomicsError::invalid(format!(
                    "{} must be a non-negative percentage, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Yearly supply multiplier `1 + inflation − burn`
    pub fn supply_change_factor(&self) -> f64 {
        1.0 + self.inflation_rate_pct / 100.0 - self.burn_rate_pct / 100.0
    }

    /// Staking reward net of dilution, in percent
    pub fn real_staking_yield_pct(&self) -> f64 {
        self.staking_reward_pct - self.inflation_rate_pct + self.burn_rate_pct
    }
}

/// One year of a policy projection
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyYear {
    pub year: u32,
    pub circulating_supply: f64,
    pub price_usd: f64,
    pub market_cap_usd: f64,
    /// Tokens minted during this year (0 for year 0)
    pub minted: f64,
    /// Tokens burned during this year (0 for year 0)
    pub burned: f64,
}

/// A complete policy scenario
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyScenario {
    pub total_supply: f64,
    pub initial_price: f64,
    /// Share of total supply circulating at year 0, in percent
    pub initial_circulating_pct: f64,
    pub params: EconomicParams,
    pub years: u32,
}

impl PolicyScenario {
    pub fn validate(&self) -> Result<()> {
        if !(self.total_supply >= 0.0) || !self.total_supply.is_finite() {
            return Err(TokenomicsError::invalid(format!(
                "total supply must be non-negative, got {}",
                self.total_supply
            )));
        }
        if !(self.initial_price > 0.0) || !self.initial_price.is_finite() {
            return Err(TokenomicsError::invalid(format!(
                "initial price must be positive, got {}",
                self.initial_price
            )));
        }
        if !(0.0..=100.0).contains(&self.initial_circulating_pct) {
            return Err(TokenomicsError::invalid(format!(
                "initial circulating percent must be within [0, 100], got {}",
                self.initial_circulating_pct
            )));
        }
        self.params.validate()
    }

    /// Year-by-year projection for years `0..=years`
    pub fn simulate(&self) -> Result<Vec<PolicyYear>> {
        self.validate()?;

        let inflation = self.params.inflation_rate_pct / 100.0;
        let burn = self.params.burn_rate_pct / 100.0;
        let supply_change_factor = self.params.supply_change_factor();
        if supply_change_factor <= 0.0 {
            warn!(
                supply_change_factor,
                "Burn outpaces supply; price held constant"
            );
        }

        let mut supply = self.total_supply * self.initial_circulating_pct / 100.0;
        let mut price = self.initial_price;
        let mut years = Vec::with_capacity(self.years as usize + 1);
        years.push(PolicyYear {
            year: 0,
            circulating_supply: supply,
            price_usd: price,
            market_cap_usd: supply * price,
            minted: 0.0,
            burned: 0.0,
        });

        for year in 1..=self.years {
            let minted = supply * inflation;
            let burned = supply * burn;
            supply = supply + minted - burned;
            if supply_change_factor > 0.0 {
                price /= supply_change_factor;
            }
            years.push(PolicyYear {
                year,
                circulating_supply: supply,
                price_usd: price,
                market_cap_usd: supply * price,
                minted,
                burned,
            });
        }

        Ok(years)
    }
}

/// Project supply and price under constant inflation and burn rates
pub fn simulate(
    total_supply: f64,
    initial_price: f64,
    initial_circulating_pct: f64,
    inflation_rate_pct: f64,
    burn_rate_pct: f64,
    years: u32,
) -> Result<Vec<PolicyYear>> {
    PolicyScenario {
        total_supply,
        initial_price,
        initial_circulating_pct,
        params: EconomicParams {
            inflation_rate_pct,
            burn_rate_pct,
            staking_reward_pct: 0.0,
        },
        years,
    }
    .simulate()
}

/// End state of a scenario in a comparison
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyOutcome {
    pub name: String,
    pub final_supply: f64,
    pub final_price: f64,
    pub final_market_cap: f64,
    /// Circulating supply change over the horizon, in percent
    pub supply_change_pct: f64,
    pub real_staking_yield_pct: f64,
    pub trajectory: Vec<PolicyYear>,
}

/// Run several named scenarios side by side
pub fn compare_scenarios(scenarios: &[(String, PolicyScenario)]) -> Result<Vec<PolicyOutcome>> {
    info!(count = scenarios.len(), "Comparing policy scenarios");

    scenarios
        .iter()
        .map(|(name, scenario)| {
            let trajectory = scenario.simulate()?;
            let (first, last) = match (trajectory.first(), trajectory.last()) {
                (Some(first), Some(last)) => (first, last),
                _ => return Err(TokenomicsError::invalid("empty policy trajectory")),
            };
            let supply_change_pct = if first.circulating_supply > 0.0 {
                (last.circulating_supply / first.circulating_supply - 1.0) * 100.0
            } else {
                0.0
            };
            Ok(PolicyOutcome {
                name: name.clone(),
                final_supply: last.circulating_supply,
                final_price: last.price_usd,
                final_market_cap: last.market_cap_usd,
                supply_change_pct,
                real_staking_yield_pct: scenario.params.real_staking_yield_pct(),
                trajectory,
            })
        })
        .collect()
}
