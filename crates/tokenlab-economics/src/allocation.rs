//! # Token Allocation
//!
//! Named percentage allocations of the total supply.
//!
//! | Category | Share |
//! |----------|-------|
//! | Team | 20% |
//! | Investors | 15% |
//! | Community | 40% |
//! | Treasury | 25% |
//!
//! A set is *valid* when its percentages sum to 100 ± 0.1. Validation only
//! reports violations; the only operations that change percentages are
//! [`AllocationSet::rescale`] and the add/remove helpers built on it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokenlab_core::{Result, TokenomicsError, PERCENT_TOLERANCE};

/// Ordered map of category name to percentage of total supply
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationSet {
    shares: IndexMap<String, f64>,
}

impl AllocationSet {
    /// Empty allocation
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(category, percent)` pairs; later duplicates overwrite earlier ones
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            shares: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Sum of all percentages
    pub fn total_percent(&self) -> f64 {
        self.shares.values().sum()
    }

    /// Check that percentages are non-negative and sum to 100 ± tolerance
    pub fn validate(&self) -> Result<()> {
        if let Some((name, pct)) = self.shares.iter().find(|(_, p)| !(**p >= 0.0)) {
            return Err(TokenomicsError::invalid(format!(
                "allocation '{}' has invalid percentage {}",
                name, pct
            )));
        }
        let total = self.total_percent();
        if (total - 100.0).abs() > PERCENT_TOLERANCE {
            return Err(TokenomicsError::AllocationSum { total });
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Absolute token amount per category
    pub fn amounts(&self, total_supply: f64) -> IndexMap<String, f64> {
        self.shares
            .iter()
            .map(|(name, pct)| (name.clone(), total_supply * pct / 100.0))
            .collect()
    }

    /// Absolute token amount for one category
    pub fn amount_of(&self, category: &str, total_supply: f64) -> Option<f64> {
        self.shares.get(category).map(|pct| total_supply * pct / 100.0)
    }

    /// Multiply every percentage by `100 / current_sum`
    pub fn rescale(&mut self) -> Result<()> {
        let total = self.total_percent();
        if total == 0.0 {
            return Err(TokenomicsError::DegenerateAllocation);
        }
        let factor = 100.0 / total;
        for pct in self.shares.values_mut() {
            *pct *= factor;
        }
        Ok(())
    }

    /// Add a category and rescale the whole set back to 100%.
    /// On error the set is left unchanged.
    pub fn add_category(&mut self, name: impl Into<String>, percent: f64) -> Result<()> {
        let name = name.into();
        if !(0.0..=100.0).contains(&percent) {
            return Err(TokenomicsError::invalid(format!(
                "percentage for '{}' must be within [0, 100], got {}",
                name, percent
            )));
        }
        if self.shares.contains_key(&name) {
            return Err(TokenomicsError::DuplicateCategory(name));
        }
        let mut next = self.clone();
        next.shares.insert(name, percent);
        next.rescale()?;
        *self = next;
        Ok(())
    }

    /// Remove a category and rescale the remaining ones back to 100%.
    /// On error the set is left unchanged.
    pub fn remove_category(&mut self, name: &str) -> Result<f64> {
        let mut next = self.clone();
        let removed = next
            .shares
            .shift_remove(name)
            .ok_or_else(|| TokenomicsError::UnknownCategory(name.to_string()))?;
        next.rescale()?;
        *self = next;
        Ok(removed)
    }

    /// Overwrite a category's percentage without rescaling
    pub fn set_percent(&mut self, name: &str, percent: f64) -> Result<()> {
        match self.shares.get_mut(name) {
            Some(pct) => {
                *pct = percent;
                Ok(())
            }
            None => Err(TokenomicsError::UnknownCategory(name.to_string())),
        }
    }

    pub fn percent_of(&self, category: &str) -> Option<f64> {
        self.shares.get(category).copied()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.shares.contains_key(category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.shares.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.shares.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tokenlab_core::ErrorKind;

    fn sample() -> AllocationSet {
        AllocationSet::from_pairs([
            ("Team", 20.0),
            ("Investors", 15.0),
            ("Community", 40.0),
            ("Treasury", 25.0),
        ])
    }

    #[test]
    fn test_amounts() {
        let amounts = sample().amounts(1_000_000.0);
        assert_eq!(amounts["Team"], 200_000.0);
        assert_eq!(amounts["Community"], 400_000.0);
        assert_eq!(amounts.values().sum::<f64>(), 1_000_000.0);
    }

    #[test]
    fn test_validation() {
        assert!(sample().validate().is_ok());

        let short = AllocationSet::from_pairs([("Team", 50.0), ("Community", 45.0)]);
        match short.validate() {
            Err(TokenomicsError::AllocationSum { total }) => assert_eq!(total, 95.0),
            other => panic!("unexpected {:?}", other),
        }

        let within = AllocationSet::from_pairs([("A", 50.05), ("B", 50.0)]);
        assert!(within.is_valid());
    }

    #[test]
    fn test_validation_does_not_correct() {
        let set = AllocationSet::from_pairs([("A", 30.0), ("B", 30.0)]);
        assert!(set.validate().is_err());
        assert_eq!(set.total_percent(), 60.0);
    }

    #[test]
    fn test_add_category_rescales() {
        let mut set = sample();
        set.add_category("Advisors", 25.0).unwrap();

        assert!((set.total_percent() - 100.0).abs() < 1e-9);
        assert!((set.percent_of("Advisors").unwrap() - 20.0).abs() < 1e-9);
        assert!((set.percent_of("Team").unwrap() - 16.0).abs() < 1e-9);
        assert_eq!(set.categories().last(), Some("Advisors"));
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut set = sample();
        let err = set.add_category("Team", 10.0).unwrap_err();
        assert_eq!(err, TokenomicsError::DuplicateCategory("Team".into()));
        assert_eq!(set, sample());
    }

    #[test]
    fn test_remove_category_rescales() {
        let mut set = sample();
        let removed = set.remove_category("Community").unwrap();

        assert_eq!(removed, 40.0);
        assert!((set.total_percent() - 100.0).abs() < 1e-9);
        assert!((set.percent_of("Team").unwrap() - 20.0 / 0.6).abs() < 1e-9);
        assert!(!set.contains("Community"));
    }

    #[test]
    fn test_remove_unknown() {
        let mut set = sample();
        assert_eq!(
            set.remove_category("Marketing").unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_rescale_zero_sum() {
        let mut set = AllocationSet::from_pairs([("A", 0.0), ("B", 0.0)]);
        assert_eq!(set.rescale().unwrap_err(), TokenomicsError::DegenerateAllocation);

        let mut single = AllocationSet::from_pairs([("Only", 100.0)]);
        assert_eq!(
            single.remove_category("Only").unwrap_err().kind(),
            ErrorKind::DegenerateState
        );
        assert_eq!(single, AllocationSet::from_pairs([("Only", 100.0)]));
    }

    #[test]
    fn test_failed_add_leaves_set_unchanged() {
        let mut set = AllocationSet::from_pairs([("A", 0.0)]);
        assert_eq!(
            set.add_category("B", 0.0).unwrap_err(),
            TokenomicsError::DegenerateAllocation
        );
        assert!(!set.contains("B"));
        assert_eq!(set, AllocationSet::from_pairs([("A", 0.0)]));

        let mut empty = AllocationSet::new();
        assert!(empty.add_category("A", 0.0).is_err());
        assert!(empty.is_empty());
    }

    proptest! {
        #[test]
        fn prop_amounts_sum_to_supply(
            weights in prop::collection::vec(0.1f64..100.0, 1..12),
            supply in 1.0f64..1e12,
        ) {
            let mut set = AllocationSet::from_pairs(
                weights.iter().enumerate().map(|(i, w)| (format!("c{}", i), *w)),
            );
            set.rescale().unwrap();
            prop_assert!(set.is_valid());

            let total: f64 = set.amounts(supply).values().sum();
            prop_assert!((total - supply).abs() <= supply * 1e-9);
        }
    }
}
