//! # Price Targets
//!
//! Point conversions between price, market cap and fully diluted valuation,
//! plus a linear price-impact estimate for trades against a liquidity pool.
//!
//! The impact estimate is `trade value / pool size`, a first-order
//! approximation; it does not follow a constant-product curve.

use crate::model::TokenomicsModel;
use crate::release::ReleaseProjector;
use serde::{Deserialize, Serialize};
use tokenlab_core::{Month, Result, TokenomicsError, TradeDirection, PRICE_FLOOR};

/// Anything that knows the circulating supply at a month
pub trait CirculatingSupplySource {
    fn circulating_supply_at(&self, month: Month) -> f64;
}

impl CirculatingSupplySource for TokenomicsModel {
    fn circulating_supply_at(&self, month: Month) -> f64 {
        self.calculate_released_tokens(month)
    }
}

impl CirculatingSupplySource for ReleaseProjector<'_> {
    fn circulating_supply_at(&self, month: Month) -> f64 {
        self.total_cumulative_released_at(month)
    }
}

/// Price implied by a market cap
pub fn price_from_market_cap(market_cap: f64, circulating_supply: f64) -> Result<f64> {
    if circulating_supply == 0.0 {
        return Err(TokenomicsError::DivisionByZero(
            "circulating supply is zero".to_string(),
        ));
    }
    Ok(market_cap / circulating_supply)
}

pub fn market_cap_from_price(price: f64, circulating_supply: f64) -> f64 {
    price * circulating_supply
}

/// Fully diluted valuation
pub fn fdv(price: f64, total_supply: f64) -> f64 {
    price * total_supply
}

/// Estimated effect of one trade
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceImpact {
    /// Trade value as a percentage of pool liquidity
    pub impact_pct: f64,
    /// Price after the trade, never below the price floor
    pub new_price: f64,
}

/// Linear price impact of trading `amount_tokens` against a pool of `liquidity_usd`
pub fn price_impact(
    amount_tokens: f64,
    current_price: f64,
    liquidity_usd: f64,
    direction: TradeDirection,
) -> Result<PriceImpact> {
    if !(liquidity_usd > 0.0) {
        return Err(TokenomicsError::DivisionByZero(format!(
            "liquidity pool must be positive, got {}",
            liquidity_usd
        )));
    }
    if !(amount_tokens >= 0.0) || !(current_price > 0.0) {
        return Err(TokenomicsError::invalid(
            "trade amount must be non-negative and price positive",
        ));
    }

    let impact_pct = amount_tokens * current_price / liquidity_usd * 100.0;
    let new_price =
        (current_price * (1.0 + direction.sign() * impact_pct / 100.0)).max(PRICE_FLOOR);
    Ok(PriceImpact {
        impact_pct,
        new_price,
    })
}

/// Valuation figures at one month
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceTargets {
    pub month: Month,
    pub price: f64,
    pub circulating_supply: f64,
    pub market_cap: f64,
    pub fdv: f64,
}

impl PriceTargets {
    /// Valuation at `price` using the supply circulating at `month`
    pub fn at<S>(source: &S, month: Month, price: f64, total_supply: f64) -> Self
    where
        S: CirculatingSupplySource + ?Sized,
    {
        let circulating_supply = source.circulating_supply_at(month);
        Self {
            month,
            price,
            circulating_supply,
            market_cap: market_cap_from_price(price, circulating_supply),
            fdv: fdv(price, total_supply),
        }
    }

    /// Price needed at `month` to reach `market_cap`
    pub fn price_for_market_cap<S>(source: &S, month: Month, market_cap: f64) -> Result<f64>
    where
        S: CirculatingSupplySource + ?Sized,
    {
        price_from_market_cap(market_cap, source.circulating_supply_at(month))
    }
}
