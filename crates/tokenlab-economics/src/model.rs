//! # Tokenomics Models
//!
//! Month-stepped price simulation driven by vesting unlocks.
//!
//! | Model | Price driver per month |
//! |-------|------------------------|
//! | Basic | market factors × unlock pressure × noise |
//! | Utility | demand/supply ratio (capped) × noise |
//! | Governance | staking lock-up premium × noise |
//!
//! Each variant implements [`PriceModel`]; [`TokenomicsModel`] owns the
//! allocation and vesting tables and runs whichever variant its
//! [`ModelKind`] selects. A simulation is a single pass that returns the
//! whole [`SimulationTrajectory`] at once.

use crate::allocation::AllocationSet;
use crate::release::ReleaseProjector;
use crate::vesting::VestingSchedule;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokenlab_core::{
    ModelDetail, Month, RandomSource, Result, SeededRandom, SimulationTrajectory, TokenomicsError,
    TrajectoryPoint, PRICE_FLOOR,
};
use tracing::{debug, info};

/// Utility model parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UtilityParams {
    /// Users at month 0
    pub initial_users: f64,
    /// Monthly geometric user growth (0.05 = 5%)
    pub user_growth_rate: f64,
    /// Tokens each user needs to hold
    pub tokens_per_user: f64,
}

impl Default for UtilityParams {
    fn default() -> Self {
        Self {
            initial_users: 1_000.0,
            user_growth_rate: 0.05,
            tokens_per_user: 100.0,
        }
    }
}

/// Governance model parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Fraction of circulating supply staked at month 0
    pub initial_staking_rate: f64,
    /// Added to the staking rate every month
    pub staking_growth: f64,
    /// Annual staking reward as a fraction of staked tokens
    pub staking_apy: f64,
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            initial_staking_rate: 0.3,
            staking_growth: 0.01,
            staking_apy: 0.12,
        }
    }
}

/// Which price model a [`TokenomicsModel`] runs
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Basic,
    Utility(UtilityParams),
    Governance(GovernanceParams),
}

impl ModelKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Utility(_) => "utility",
            Self::Governance(_) => "governance",
        }
    }

    /// Reject parameters that make the model meaningless
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Basic => Ok(()),
            Self::Utility(p) => {
                if !(p.initial_users >= 0.0) || !p.initial_users.is_finite() {
                    return Err(TokenomicsError::invalid("initial users must be non-negative"));
                }
                if !(p.user_growth_rate > -1.0) || !p.user_growth_rate.is_finite() {
                    return Err(TokenomicsError::invalid("user growth rate must be above -100%"));
                }
                if !(p.tokens_per_user >= 0.0) || !p.tokens_per_user.is_finite() {
                    return Err(TokenomicsError::invalid("tokens per user must be non-negative"));
                }
                Ok(())
            }
            Self::Governance(p) => {
                if !(0.0..=1.0).contains(&p.initial_staking_rate) {
                    return Err(TokenomicsError::invalid("initial staking rate must be within [0, 1]"));
                }
                if !p.staking_growth.is_finite() {
                    return Err(TokenomicsError::invalid("staking growth must be finite"));
                }
                if !(p.staking_apy >= 0.0) || !p.staking_apy.is_finite() {
                    return Err(TokenomicsError::invalid("staking APY must be non-negative"));
                }
                Ok(())
            }
        }
    }
}

/// Tunable constants of the price models.
///
/// These are calibration knobs, not derived economics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Basic model multiplier applied in any month that unlocks new supply
    pub unlock_impact: f64,
    /// Utility model cap on the demand/supply ratio
    pub demand_ratio_cap: f64,
    /// Governance model cap on the staking rate
    pub staking_rate_cap: f64,
    /// Governance premium is `1 + staking_rate / staking_impact_divisor`
    pub staking_impact_divisor: f64,
    /// Lowest price a trajectory may report
    pub price_floor: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            unlock_impact: 0.98,
            demand_ratio_cap: 2.0,
            staking_rate_cap: 0.8,
            staking_impact_divisor: 10.0,
            price_floor: PRICE_FLOOR,
        }
    }
}

impl Calibration {
    fn floor(&self, month: Month, price: f64) -> f64 {
        if price >= self.price_floor {
            price
        } else {
            debug!(month, price, floor = self.price_floor, "Price clamped to floor");
            self.price_floor
        }
    }
}

/// Inputs of a month-stepped price simulation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Number of months after TGE to simulate
    pub months: Month,
    /// Price at month 0
    pub initial_price: f64,
    /// Half-width of the monthly uniform noise (0.1 = ±10%)
    pub volatility: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            months: 36,
            initial_price: 0.1,
            volatility: 0.1,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_price > 0.0) || !self.initial_price.is_finite() {
            return Err(TokenomicsError::invalid(format!(
                "initial price must be positive, got {}",
                self.initial_price
            )));
        }
        if !(self.volatility >= 0.0) || !self.volatility.is_finite() {
            return Err(TokenomicsError::invalid(format!(
                "volatility must be non-negative, got {}",
                self.volatility
            )));
        }
        Ok(())
    }
}

/// What a price model sees when stepping into `month`
#[derive(Clone, Copy, Debug)]
pub struct MonthStep {
    pub month: Month,
    pub previous_price: f64,
    /// Cumulative released supply at `month`
    pub released: f64,
    /// Cumulative released supply at `month - 1`
    pub previous_released: f64,
    pub volatility: f64,
}

impl MonthStep {
    /// True when this month unlocked new supply
    pub fn supply_grew(&self) -> bool {
        self.released > self.previous_released
    }
}

/// One price model variant
pub trait PriceModel {
    /// Model state reported at month 0
    fn initial_detail(&self, released: f64) -> ModelDetail;

    /// Advance one month; returns the unfloored price and the model state
    fn step(&mut self, step: &MonthStep, rng: &mut dyn RandomSource) -> (f64, ModelDetail);
}

fn random_impact(rng: &mut dyn RandomSource, volatility: f64) -> f64 {
    1.0 + rng.uniform(-volatility, volatility)
}

/// Market factors and unlock pressure
#[derive(Clone, Debug)]
pub struct BasicPriceModel {
    factor_impact: f64,
    unlock_impact: f64,
}

impl BasicPriceModel {
    pub fn new(market_factors: &IndexMap<String, f64>, calibration: &Calibration) -> Self {
        Self {
            factor_impact: market_factors.values().map(|impact| 1.0 + impact).product(),
            unlock_impact: calibration.unlock_impact,
        }
    }
}

impl PriceModel for BasicPriceModel {
    fn initial_detail(&self, _released: f64) -> ModelDetail {
        ModelDetail::Basic
    }

    fn step(&mut self, step: &MonthStep, rng: &mut dyn RandomSource) -> (f64, ModelDetail) {
        let supply_impact = if step.supply_grew() {
            self.unlock_impact
        } else {
            1.0
        };
        let price = step.previous_price
            * self.factor_impact
            * supply_impact
            * random_impact(rng, step.volatility);
        (price, ModelDetail::Basic)
    }
}

/// Demand from a growing user base against released supply
#[derive(Clone, Debug)]
pub struct UtilityPriceModel {
    users: f64,
    params: UtilityParams,
    demand_ratio_cap: f64,
}

impl UtilityPriceModel {
    pub fn new(params: &UtilityParams, calibration: &Calibration) -> Self {
        Self {
            users: params.initial_users,
            params: params.clone(),
            demand_ratio_cap: calibration.demand_ratio_cap,
        }
    }

    fn detail(&self) -> ModelDetail {
        ModelDetail::Utility {
            users: self.users,
            token_demand: self.users * self.params.tokens_per_user,
        }
    }
}

impl PriceModel for UtilityPriceModel {
    fn initial_detail(&self, _released: f64) -> ModelDetail {
        self.detail()
    }

    fn step(&mut self, step: &MonthStep, rng: &mut dyn RandomSource) -> (f64, ModelDetail) {
        self.users *= 1.0 + self.params.user_growth_rate;
        let demand = self.users * self.params.tokens_per_user;
        let ratio = (demand / step.released.max(1.0)).min(self.demand_ratio_cap);
        let price = step.previous_price * ratio * random_impact(rng, step.volatility);
        (price, self.detail())
    }
}

/// Staking lock-up premium
#[derive(Clone, Debug)]
pub struct GovernancePriceModel {
    staking_rate: f64,
    params: GovernanceParams,
    staking_rate_cap: f64,
    impact_divisor: f64,
}

impl GovernancePriceModel {
    pub fn new(params: &GovernanceParams, calibration: &Calibration) -> Self {
        Self {
            staking_rate: params.initial_staking_rate.min(calibration.staking_rate_cap),
            params: params.clone(),
            staking_rate_cap: calibration.staking_rate_cap,
            impact_divisor: calibration.staking_impact_divisor,
        }
    }

    fn detail(&self, released: f64) -> ModelDetail {
        let staked = released * self.staking_rate;
        ModelDetail::Governance {
            staking_rate: self.staking_rate,
            staked_tokens: staked,
            liquid_tokens: released - staked,
            staking_rewards: staked * self.params.staking_apy / 12.0,
        }
    }
}

impl PriceModel for GovernancePriceModel {
    fn initial_detail(&self, released: f64) -> ModelDetail {
        self.detail(released)
    }

    fn step(&mut self, step: &MonthStep, rng: &mut dyn RandomSource) -> (f64, ModelDetail) {
        self.staking_rate = (self.staking_rate + self.params.staking_growth)
            .min(self.staking_rate_cap)
            .max(0.0);
        let staking_impact = if self.impact_divisor > 0.0 {
            1.0 + self.staking_rate / self.impact_divisor
        } else {
            1.0
        };
        let price = step.previous_price * staking_impact * random_impact(rng, step.volatility);
        (price, self.detail(step.released))
    }
}

/// Token supply, allocation and vesting configuration plus the chosen price model
#[derive(Clone, Debug, PartialEq)]
pub struct TokenomicsModel {
    name: String,
    total_supply: f64,
    allocation: AllocationSet,
    vesting: BTreeMap<String, VestingSchedule>,
    kind: ModelKind,
    market_factors: IndexMap<String, f64>,
    calibration: Calibration,
}

impl TokenomicsModel {
    /// Basic model with an empty allocation
    pub fn new(total_supply: f64) -> Result<Self> {
        if !(total_supply >= 0.0) || !total_supply.is_finite() {
            return Err(TokenomicsError::invalid(format!(
                "total supply must be non-negative, got {}",
                total_supply
            )));
        }
        Ok(Self {
            name: "Untitled".to_string(),
            total_supply,
            allocation: AllocationSet::new(),
            vesting: BTreeMap::new(),
            kind: ModelKind::Basic,
            market_factors: IndexMap::new(),
            calibration: Calibration::default(),
        })
    }

    /// Same model with another price model
    pub fn with_kind(mut self, kind: ModelKind) -> Result<Self> {
        self.set_kind(kind)?;
        Ok(self)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_supply(&self) -> f64 {
        self.total_supply
    }

    pub fn allocation(&self) -> &AllocationSet {
        &self.allocation
    }

    pub fn vesting_schedules(&self) -> &BTreeMap<String, VestingSchedule> {
        &self.vesting
    }

    pub fn kind(&self) -> &ModelKind {
        &self.kind
    }

    pub fn market_factors(&self) -> &IndexMap<String, f64> {
        &self.market_factors
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn set_kind(&mut self, kind: ModelKind) -> Result<()> {
        kind.validate()?;
        self.kind = kind;
        Ok(())
    }

    pub fn set_calibration(&mut self, calibration: Calibration) -> Result<()> {
        if !(calibration.price_floor > 0.0) {
            return Err(TokenomicsError::invalid("price floor must be positive"));
        }
        self.calibration = calibration;
        Ok(())
    }

    /// Replace the allocation; percentages must sum to 100 ± 0.1.
    /// Schedules of categories that no longer exist are dropped.
    pub fn set_distribution(&mut self, allocation: AllocationSet) -> Result<()> {
        allocation.validate()?;
        self.vesting.retain(|category, _| allocation.contains(category));
        self.allocation = allocation;
        Ok(())
    }

    /// Attach a milestone schedule to an existing category
    pub fn set_vesting_schedule(
        &mut self,
        category: &str,
        schedule: VestingSchedule,
    ) -> Result<()> {
        if !self.allocation.contains(category) {
            return Err(TokenomicsError::UnknownCategory(category.to_string()));
        }
        schedule.validate(category)?;
        self.vesting.insert(category.to_string(), schedule);
        Ok(())
    }

    /// Drop a category's schedule, making it fully liquid at TGE
    pub fn remove_vesting_schedule(&mut self, category: &str) -> Option<VestingSchedule> {
        self.vesting.remove(category)
    }

    /// Add a category and rescale the allocation back to 100%
    pub fn add_category(&mut self, name: &str, percent: f64) -> Result<()> {
        self.allocation.add_category(name, percent)
    }

    /// Remove a category (and its schedule) and rescale the allocation
    pub fn remove_category(&mut self, name: &str) -> Result<()> {
        self.allocation.remove_category(name)?;
        self.vesting.remove(name);
        Ok(())
    }

    /// Named multiplicative factor for the basic model (0.05 = +5% per month)
    pub fn set_market_factor(&mut self, name: impl Into<String>, impact: f64) -> Result<()> {
        if !(impact > -1.0) || !impact.is_finite() {
            return Err(TokenomicsError::invalid(format!(
                "market factor impact must be above -100%, got {}",
                impact
            )));
        }
        self.market_factors.insert(name.into(), impact);
        Ok(())
    }

    pub fn clear_market_factors(&mut self) {
        self.market_factors.clear();
    }

    /// Release projector over this model's allocation and schedules
    pub fn projector(&self) -> ReleaseProjector<'_> {
        ReleaseProjector::new(self.total_supply, &self.allocation, &self.vesting)
    }

    /// Cumulative tokens released at `month` across all categories
    pub fn calculate_released_tokens(&self, month: Month) -> f64 {
        self.projector().total_cumulative_released_at(month)
    }

    /// Cumulative tokens released at `month` per category
    pub fn released_by_category(&self, month: Month) -> IndexMap<String, f64> {
        self.projector().cumulative_released_at(month)
    }

    /// Fresh price model for the configured kind
    pub fn price_model(&self) -> Box<dyn PriceModel> {
        match &self.kind {
            ModelKind::Basic => Box::new(BasicPriceModel::new(&self.market_factors, &self.calibration)),
            ModelKind::Utility(params) => {
                Box::new(UtilityPriceModel::new(params, &self.calibration))
            }
            ModelKind::Governance(params) => {
                Box::new(GovernancePriceModel::new(params, &self.calibration))
            }
        }
    }

    /// Simulate price, circulating supply and market cap for months `0..=params.months`
    pub fn simulate_token_price<R>(
        &self,
        params: &SimulationParams,
        rng: &mut R,
    ) -> Result<SimulationTrajectory>
    where
        R: RandomSource,
    {
        params.validate()?;

        info!(
            model = self.kind.name(),
            months = params.months,
            initial_price = params.initial_price,
            volatility = params.volatility,
            "Simulating token price"
        );

        let projector = self.projector();
        let mut price_model = self.price_model();
        let mut points = Vec::with_capacity(params.months as usize + 1);

        let mut previous_released = projector.total_cumulative_released_at(0);
        let mut previous_price = self.calibration.floor(0, params.initial_price);
        points.push(TrajectoryPoint {
            month: 0,
            price: previous_price,
            circulating_supply: previous_released,
            market_cap: previous_price * previous_released,
            detail: price_model.initial_detail(previous_released),
        });

        for month in 1..=params.months {
            let released = projector.total_cumulative_released_at(month);
            let step = MonthStep {
                month,
                previous_price,
                released,
                previous_released,
                volatility: params.volatility,
            };
            let (raw_price, detail) = price_model.step(&step, rng);
            let price = self.calibration.floor(month, raw_price);

            points.push(TrajectoryPoint {
                month,
                price,
                circulating_supply: released,
                market_cap: price * released,
                detail,
            });
            previous_price = price;
            previous_released = released;
        }

        let trajectory = SimulationTrajectory::from_points(points);
        if let Some(last) = trajectory.last() {
            info!(
                final_price = last.price,
                final_supply = last.circulating_supply,
                "Simulation completed"
            );
        }
        Ok(trajectory)
    }

    /// [`simulate_token_price`](Self::simulate_token_price) with a fresh seeded source
    pub fn simulate_seeded(
        &self,
        params: &SimulationParams,
        seed: u64,
    ) -> Result<SimulationTrajectory> {
        let mut rng = SeededRandom::new(seed);
        self.simulate_token_price(params, &mut rng)
    }
}
