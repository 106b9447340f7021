//! # TokenLab Economics - Token Release & Price Simulation
//!
//! Models for designing a token economy and projecting how it behaves.
//!
//! ## Components
//!
//! - **Allocation**: named percentage shares of total supply
//! - **Vesting**: cliff/linear/TGE calculator and milestone schedules
//! - **Release projection**: cumulative unlocked supply per category over time
//! - **Tokenomics models**: basic, utility and governance month-stepped price models
//! - **Policy scenarios**: year-stepped inflation/burn projections
//! - **Market simulator**: 30-day stochastic market with random events
//! - **Price targets**: price / market cap / FDV conversions and trade impact
//!
//! ## Simulation Flow
//!
//! ```text
//! ┌───────────────┐   ┌──────────────────┐   ┌─────────────────┐
//! │ AllocationSet │──►│ ReleaseProjector │──►│ TokenomicsModel │──► SimulationTrajectory
//! └───────────────┘   └──────────────────┘   │  + PriceModel   │
//!         ▲                     ▲            └─────────────────┘
//!         │                     │
//!   total supply      VestingSchedule per category
//! ```
//!
//! All randomness is injected through [`tokenlab_core::RandomSource`]; the
//! same configuration and seed always reproduce the same trajectory.
//!
//! None of the price dynamics are calibrated forecasts. They are illustrative
//! multiplicative random walks for comparing designs.

pub mod allocation;
pub mod config;
pub mod events;
pub mod market;
pub mod model;
pub mod policy;
pub mod pricing;
pub mod release;
pub mod vesting;

// Re-exports
pub use allocation::AllocationSet;
pub use config::{ModelSettings, TokenomicsConfig};
pub use events::{EventKind, MarketEvent, EVENT_CATALOG};
pub use market::{advance, MarketConfig, MarketSession, MarketSnapshot, MarketState, SessionStatus};
pub use model::{
    Calibration, GovernanceParams, ModelKind, PriceModel, SimulationParams, TokenomicsModel,
    UtilityParams,
};
pub use policy::{compare_scenarios, EconomicParams, PolicyOutcome, PolicyScenario, PolicyYear};
pub use pricing::{
    fdv, market_cap_from_price, price_from_market_cap, price_impact, CirculatingSupplySource,
    PriceImpact, PriceTargets,
};
pub use release::{ReleasePoint, ReleaseProjector};
pub use vesting::{compute_schedule, VestingEntry, VestingSchedule};

pub use tokenlab_core::prelude;
