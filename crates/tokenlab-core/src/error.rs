//! Error types for tokenomics configuration and simulation

use thiserror::Error;

/// Result type alias for tokenomics operations
pub type Result<T> = std::result::Result<T, TokenomicsError>;

/// Broad class of a [`TokenomicsError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Percentages don't add up, or a category is unknown
    Validation,
    /// Out-of-range argument (negative supply, non-positive price, ...)
    InvalidParameter,
    /// Computation attempted on a state with no meaningful answer
    DegenerateState,
    /// Configuration document could not be read or written
    Serialization,
}

/// Errors that can occur while configuring or simulating a token economy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenomicsError {
    // === Validation ===
    /// Allocation percentages don't sum to 100
    #[error("Allocation percentages sum to {total:.2}%, expected 100%")]
    AllocationSum { total: f64 },

    /// Vesting milestones for a category don't sum to 100
    #[error("Vesting schedule for '{category}' sums to {total:.2}%, expected 100%")]
    VestingSum { category: String, total: f64 },

    /// Category is not part of the allocation
    #[error("Unknown allocation category: {0}")]
    UnknownCategory(String),

    /// Category already exists in the allocation
    #[error("Allocation category already exists: {0}")]
    DuplicateCategory(String),

    // === Parameters ===
    /// Argument outside its accepted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // === Degenerate state ===
    /// Rescale requested on an allocation whose percentages sum to zero
    #[error("Cannot rescale an allocation whose percentages sum to zero")]
    DegenerateAllocation,

    /// Conversion would divide by zero
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    // === Documents ===
    /// Config document failed to (de)serialize
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TokenomicsError {
    /// Shorthand for [`TokenomicsError::InvalidParameter`]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AllocationSum { .. }
            | Self::VestingSum { .. }
            | Self::UnknownCategory(_)
            | Self::DuplicateCategory(_) => ErrorKind::Validation,
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::DegenerateAllocation | Self::DivisionByZero(_) => ErrorKind::DegenerateState,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Numeric error code for presentation layers
    pub fn code(&self) -> u32 {
        match self {
            Self::AllocationSum { .. } => 1001,
            Self::VestingSum { .. } => 1002,
            Self::UnknownCategory(_) => 1003,
            Self::DuplicateCategory(_) => 1004,
            Self::InvalidParameter(_) => 2001,
            Self::DegenerateAllocation => 3001,
            Self::DivisionByZero(_) => 3002,
            Self::Serialization(_) => 4001,
        }
    }
}

impl From<serde_json::Error> for TokenomicsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for TokenomicsError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for TokenomicsError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
