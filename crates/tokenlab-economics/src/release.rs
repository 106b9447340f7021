//! # Release Projection
//!
//! Combines absolute allocations with per-category vesting milestones into
//! cumulative-released time series.
//!
//! - no schedule for a category: fully released from month 0
//! - before the first milestone: nothing released
//! - after the last milestone: value stays at the last milestone (no extrapolation)

use crate::allocation::AllocationSet;
use crate::vesting::VestingSchedule;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokenlab_core::Month;

/// Cumulative release across categories at one month
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReleasePoint {
    pub month: Month,
    pub by_category: IndexMap<String, f64>,
    pub total: f64,
}

/// Projects cumulative releases for an allocation and its vesting schedules
#[derive(Clone, Debug)]
pub struct ReleaseProjector<'a> {
    amounts: IndexMap<String, f64>,
    schedules: &'a BTreeMap<String, VestingSchedule>,
}

impl<'a> ReleaseProjector<'a> {
    pub fn new(
        total_supply: f64,
        allocation: &AllocationSet,
        schedules: &'a BTreeMap<String, VestingSchedule>,
    ) -> Self {
        Self {
            amounts: allocation.amounts(total_supply),
            schedules,
        }
    }

    /// Absolute allocation per category
    pub fn allocations(&self) -> &IndexMap<String, f64> {
        &self.amounts
    }

    fn released(&self, category: &str, amount: f64, month: Month) -> f64 {
        match self.schedules.get(category) {
            Some(schedule) => amount * schedule.cumulative_percent_at(month) / 100.0,
            None => amount,
        }
    }

    /// Cumulative tokens released per category at `month`
    pub fn cumulative_released_at(&self, month: Month) -> IndexMap<String, f64> {
        self.amounts
            .iter()
            .map(|(name, amount)| (name.clone(), self.released(name, *amount, month)))
            .collect()
    }

    /// Cumulative tokens released across all categories at `month`
    pub fn total_cumulative_released_at(&self, month: Month) -> f64 {
        self.amounts
            .iter()
            .map(|(name, amount)| self.released(name, *amount, month))
            .sum()
    }

    /// Release points for months `0..=months`
    pub fn project(&self, months: Month) -> Vec<ReleasePoint> {
        (0..=months)
            .map(|month| {
                let by_category = self.cumulative_released_at(month);
                let total = by_category.values().sum();
                ReleasePoint {
                    month,
                    by_category,
                    total,
                }
            })
            .collect()
    }

    /// Last month at which any category still unlocks tokens
    pub fn fully_released_month(&self) -> Month {
        self.amounts
            .keys()
            .filter_map(|name| self.schedules.get(name))
            .map(VestingSchedule::max_month)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn allocation() -> AllocationSet {
        AllocationSet::from_pairs([("Team", 20.0), ("Investors", 30.0), ("Community", 50.0)])
    }

    fn schedules() -> BTreeMap<String, VestingSchedule> {
        let mut schedules = BTreeMap::new();
        schedules.insert("Team".to_string(), VestingSchedule::linear(12, 24, 0.0));
        schedules.insert(
            "Investors".to_string(),
            VestingSchedule::new([(3, 25.0), (6, 25.0), (9, 50.0)]),
        );
        schedules
    }

    #[test]
    fn test_unscheduled_category_fully_released() {
        let schedules = schedules();
        let projector = ReleaseProjector::new(1_000_000.0, &allocation(), &schedules);

        for month in [0, 5, 100] {
            assert_eq!(projector.cumulative_released_at(month)["Community"], 500_000.0);
        }
    }

    #[test]
    fn test_late_schedule_starts_at_zero() {
        let schedules = schedules();
        let projector = ReleaseProjector::new(1_000_000.0, &allocation(), &schedules);

        let at_zero = projector.cumulative_released_at(0);
        assert_eq!(at_zero["Team"], 0.0);
        assert_eq!(at_zero["Investors"], 0.0);
        assert_eq!(projector.total_cumulative_released_at(0), 500_000.0);
    }

    #[test]
    fn test_sticky_after_last_milestone() {
        let schedules = schedules();
        let projector = ReleaseProjector::new(1_000_000.0, &allocation(), &schedules);

        assert_eq!(projector.cumulative_released_at(4)["Investors"], 75_000.0);
        assert_eq!(projector.cumulative_released_at(9)["Investors"], 300_000.0);
        assert_eq!(projector.cumulative_released_at(60)["Investors"], 300_000.0);
        assert!((projector.total_cumulative_released_at(36) - 1_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_project_series() {
        let schedules = schedules();
        let projector = ReleaseProjector::new(1_000_000.0, &allocation(), &schedules);
        let series = projector.project(40);

        assert_eq!(series.len(), 41);
        assert_eq!(series[0].month, 0);
        assert!(series.windows(2).all(|w| w[1].total >= w[0].total));
        assert_eq!(projector.fully_released_month(), 36);
    }

    proptest! {
        #[test]
        fn prop_schedule_monotone_and_complete(
            mut months in prop::collection::vec(0u32..120, 1..10),
            supply in 1.0f64..1e10,
        ) {
            months.sort_unstable();
            let share = 100.0 / months.len() as f64;
            let schedule = VestingSchedule::new(months.iter().map(|m| (*m, share)));
            let allocation = AllocationSet::from_pairs([("Team", 100.0)]);
            let mut schedules = BTreeMap::new();
            schedules.insert("Team".to_string(), schedule.clone());
            let projector = ReleaseProjector::new(supply, &allocation, &schedules);

            let mut previous = 0.0;
            for month in 0..=schedule.max_month() + 5 {
                let released = projector.total_cumulative_released_at(month);
                prop_assert!(released >= previous);
                previous = released;
            }
            let at_end = projector.total_cumulative_released_at(schedule.max_month());
            prop_assert!((at_end - supply).abs() <= supply * 1e-9);
        }
    }
}
