//! Tokenomics configuration document
//!
//! Everything needed to rebuild a [`TokenomicsModel`] and replay its
//! simulations: supply, allocation, vesting, price model, policy parameters
//! and calibration. Round-trips through JSON and TOML.

use crate::allocation::AllocationSet;
use crate::market::MarketConfig;
use crate::model::{Calibration, ModelKind, SimulationParams, TokenomicsModel};
use crate::policy::EconomicParams;
use crate::vesting::VestingSchedule;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokenlab_core::Result;

/// Complete model configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenomicsConfig {
    /// Model identity and price model selection
    #[serde(default)]
    pub model: ModelSettings,

    /// Category → percentage of total supply
    #[serde(default)]
    pub allocation: AllocationSet,

    /// Category → milestone schedule
    #[serde(default)]
    pub vesting: BTreeMap<String, VestingSchedule>,

    /// Named multiplicative factors for the basic model
    #[serde(default)]
    pub market_factors: IndexMap<String, f64>,

    /// Monetary policy
    #[serde(default)]
    pub economics: EconomicParams,

    /// Default simulation inputs
    #[serde(default)]
    pub simulation: SimulationParams,

    /// Day-level market simulator settings
    #[serde(default)]
    pub market: MarketConfig,

    /// Price model constants
    #[serde(default)]
    pub calibration: Calibration,
}

/// Model identity and price model selection
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default = "default_total_supply")]
    pub total_supply: f64,

    #[serde(default)]
    pub kind: ModelKind,
}

fn default_model_name() -> String {
    "Untitled".to_string()
}

fn default_total_supply() -> f64 {
    1_000_000_000.0
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            total_supply: default_total_supply(),
            kind: ModelKind::default(),
        }
    }
}

impl Default for TokenomicsConfig {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            allocation: default_allocation(),
            vesting: BTreeMap::new(),
            market_factors: IndexMap::new(),
            economics: EconomicParams::default(),
            simulation: SimulationParams::default(),
            market: MarketConfig::default(),
            calibration: Calibration::default(),
        }
    }
}

/// Typical launch allocation
pub fn default_allocation() -> AllocationSet {
    AllocationSet::from_pairs([
        ("Team", 15.0),
        ("Investors", 20.0),
        ("Community", 35.0),
        ("Treasury", 20.0),
        ("Liquidity", 10.0),
    ])
}

impl TokenomicsConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Key-value document form
    pub fn to_document(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_document(document: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(document)?)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Build and validate the model this document describes
    pub fn build_model(&self) -> Result<TokenomicsModel> {
        TokenomicsModel::from_config(self)
    }
}

impl TokenomicsModel {
    /// Rebuild a model from a configuration document, validating every part
    pub fn from_config(config: &TokenomicsConfig) -> Result<Self> {
        let mut model = TokenomicsModel::new(config.model.total_supply)?
            .with_name(config.model.name.clone())
            .with_kind(config.model.kind.clone())?;
        model.set_calibration(config.calibration.clone())?;
        model.set_distribution(config.allocation.clone())?;
        for (category, schedule) in &config.vesting {
            model.set_vesting_schedule(category, schedule.clone())?;
        }
        for (name, impact) in &config.market_factors {
            model.set_market_factor(name.clone(), *impact)?;
        }
        Ok(model)
    }

    /// Configuration document for this model; non-model sections take defaults
    pub fn to_config(&self) -> TokenomicsConfig {
        TokenomicsConfig {
            model: ModelSettings {
                name: self.name().to_string(),
                total_supply: self.total_supply(),
                kind: self.kind().clone(),
            },
            allocation: self.allocation().clone(),
            vesting: self.vesting_schedules().clone(),
            market_factors: self.market_factors().clone(),
            calibration: self.calibration().clone(),
            ..TokenomicsConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GovernanceParams;
    use tokenlab_core::ErrorKind;

    fn governance_config() -> TokenomicsConfig {
        let mut config = TokenomicsConfig::default();
        config.model.name = "DAO launch".to_string();
        config.model.kind = ModelKind::Governance(GovernanceParams::default());
        config
            .vesting
            .insert("Team".to_string(), VestingSchedule::linear(12, 36, 0.0));
        config
            .vesting
            .insert("Investors".to_string(), VestingSchedule::new([(0, 10.0), (6, 40.0), (12, 50.0)]));
        config.market_factors.insert("adoption".to_string(), 0.02);
        config
    }

    #[test]
    fn test_default_config_builds() {
        let model = TokenomicsConfig::default().build_model().unwrap();
        assert!(model.allocation().is_valid());
        assert_eq!(model.calculate_released_tokens(0), 1_000_000_000.0);
    }

    #[test]
    fn test_json_round_trip_reproduces_simulation() {
        let original = governance_config().build_model().unwrap();
        let json = original.to_config().to_json().unwrap();
        let rebuilt = TokenomicsConfig::from_json(&json).unwrap().build_model().unwrap();

        assert_eq!(original, rebuilt);
        let params = SimulationParams::default();
        assert_eq!(
            original.simulate_seeded(&params, 77).unwrap(),
            rebuilt.simulate_seeded(&params, 77).unwrap()
        );
    }

    #[test]
    fn test_document_round_trip() {
        let config = governance_config();
        let document = config.to_document().unwrap();

        assert_eq!(document["model"]["kind"]["type"], "governance");
        assert_eq!(document["allocation"]["Team"], 15.0);
        assert_eq!(TokenomicsConfig::from_document(document).unwrap(), config);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = governance_config();
        let text = config.to_toml().unwrap();
        let parsed = TokenomicsConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = r#"
            [model]
            name = "Utility token"
            total_supply = 500000000.0

            [model.kind]
            type = "utility"
            initial_users = 5000.0
            user_growth_rate = 0.08
            tokens_per_user = 50.0

            [allocation]
            Community = 60.0
            Team = 40.0

            [vesting]
            Team = [{ month = 12, percent = 50.0 }, { month = 24, percent = 50.0 }]
        "#;
        let config = TokenomicsConfig::from_toml(text).unwrap();
        let model = config.build_model().unwrap();

        assert_eq!(model.kind().name(), "utility");
        assert_eq!(model.calculate_released_tokens(0), 300_000_000.0);
        assert_eq!(config.market, MarketConfig::default());
        assert_eq!(config.calibration, Calibration::default());
    }

    #[test]
    fn test_unsorted_vesting_document() {
        let text = r#"
            [model]
            total_supply = 1000.0

            [allocation]
            Team = 100.0

            [vesting]
            Team = [{ month = 24, percent = 50.0 }, { month = 12, percent = 50.0 }]
        "#;
        let model = TokenomicsConfig::from_toml(text).unwrap().build_model().unwrap();

        assert_eq!(model.calculate_released_tokens(11), 0.0);
        assert_eq!(model.calculate_released_tokens(12), 500.0);
        assert_eq!(model.calculate_released_tokens(18), 500.0);
        assert_eq!(model.calculate_released_tokens(24), 1000.0);
        assert_eq!(model.projector().fully_released_month(), 24);
    }

    #[test]
    fn test_invalid_document_rejected() {
        let mut config = TokenomicsConfig::default();
        config.allocation = AllocationSet::from_pairs([("Team", 10.0)]);
        assert_eq!(config.build_model().unwrap_err().kind(), ErrorKind::Validation);

        let err = TokenomicsConfig::from_json("{\"model\": {\"total_supply\": \"lots\"}}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);

        let err = TokenomicsConfig::from_json("{\"simulation\": {\"months\": -3, \"initial_price\": 1.0, \"volatility\": 0.1}}")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }
}
