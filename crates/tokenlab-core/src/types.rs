//! Shared types produced by the simulators
//!
//! A [`SimulationTrajectory`] is an owned, immutable sequence of
//! [`TrajectoryPoint`]s. Each point carries the common price/supply/market-cap
//! fields plus a [`ModelDetail`] variant for the model that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Month index (0 = token generation event)
pub type Month = u32;

/// Day index for the day-level market simulator
pub type Day = u32;

/// Model-specific state captured at each step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum ModelDetail {
    /// Base model carries no extra state
    Basic,
    /// Utility model: user base and the token demand it generates
    Utility { users: f64, token_demand: f64 },
    /// Governance model: staking participation and the staked/liquid split
    Governance {
        staking_rate: f64,
        staked_tokens: f64,
        liquid_tokens: f64,
        /// Estimated rewards paid to stakers this month
        staking_rewards: f64,
    },
}

/// One month of a simulated trajectory
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub month: Month,
    pub price: f64,
    pub circulating_supply: f64,
    pub market_cap: f64,
    pub detail: ModelDetail,
}

/// Month-indexed price/supply trajectory
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationTrajectory {
    points: Vec<TrajectoryPoint>,
}

impl SimulationTrajectory {
    /// Build from points ordered by strictly increasing month
    pub fn from_points(points: Vec<TrajectoryPoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].month < w[1].month));
        Self { points }
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point for a given month, if simulated
    pub fn at(&self, month: Month) -> Option<&TrajectoryPoint> {
        self.points.get(month as usize).filter(|p| p.month == month)
    }

    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    /// Price series in month order
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Headline statistics; `None` for an empty trajectory
    pub fn summary(&self) -> Option<TrajectorySummary> {
        let first = self.points.first()?;
        let last = self.points.last()?;

        let mut min_price = f64::INFINITY;
        let mut max_price = f64::NEG_INFINITY;
        let mut peak = first.price;
        let mut max_drawdown = 0.0f64;

        for point in &self.points {
            min_price = min_price.min(point.price);
            max_price = max_price.max(point.price);
            peak = peak.max(point.price);
            if peak > 0.0 {
                max_drawdown = max_drawdown.max((peak - point.price) / peak * 100.0);
            }
        }

        Some(TrajectorySummary {
            initial_price: first.price,
            final_price: last.price,
            min_price,
            max_price,
            max_drawdown_pct: max_drawdown,
            final_circulating_supply: last.circulating_supply,
            final_market_cap: last.market_cap,
        })
    }
}

impl IntoIterator for SimulationTrajectory {
    type Item = TrajectoryPoint;
    type IntoIter = std::vec::IntoIter<TrajectoryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

/// Headline numbers of a trajectory
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub initial_price: f64,
    pub final_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    /// Largest peak-to-trough decline, percent of the peak
    pub max_drawdown_pct: f64,
    pub final_circulating_supply: f64,
    pub final_market_cap: f64,
}

impl TrajectorySummary {
    /// Total return from first to last point, in percent
    pub fn total_return_pct(&self) -> f64 {
        if self.initial_price > 0.0 {
            (self.final_price / self.initial_price - 1.0) * 100.0
        } else {
            0.0
        }
    }
}

/// Side of a trade against a liquidity pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl TradeDirection {
    /// +1 for buys, -1 for sells
    pub fn sign(&self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Sell => -1.0,
        }
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}
