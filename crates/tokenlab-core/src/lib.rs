//! # TokenLab Core
//!
//! Shared building blocks for the TokenLab tokenomics simulator:
//! - [`TokenomicsError`] - error taxonomy for configuration and simulation
//! - [`RandomSource`] - seedable randomness injected into every simulator
//! - [`SimulationTrajectory`] - the month-indexed output of the price models
//!
//! The simulators themselves live in `tokenlab-economics`.

pub mod error;
pub mod random;
pub mod types;

pub use error::*;
pub use random::*;
pub use types::*;

/// Numeric constants shared across simulators
pub mod constants {
    /// Allowed deviation from 100% when validating percentage tables
    pub const PERCENT_TOLERANCE: f64 = 0.1;

    /// Lowest price any simulator may report
    pub const PRICE_FLOOR: f64 = 0.01;
}

pub use constants::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::constants::*;
    pub use crate::error::{ErrorKind, Result, TokenomicsError};
    pub use crate::random::{RandomSource, SeededRandom};
    pub use crate::types::*;
}
