//! # Vesting
//!
//! Two views of the same idea:
//!
//! - [`compute_schedule`] turns a lump sum, a cliff, a linear vesting period
//!   and a TGE unlock into a month-by-month release table.
//! - [`VestingSchedule`] is a general milestone table of `(month, percent)`
//!   pairs, used per allocation category by the release projector. Milestones
//!   need not be contiguous or evenly spaced.
//!
//! ```text
//! tge=5%, cliff=6, vesting=24
//!
//! month 0      : 5% at TGE
//! months 1..6  : nothing (cliff)
//! months 7..30 : 95% / 24 each month
//! ```

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tokenlab_core::{Month, Result, TokenomicsError, PERCENT_TOLERANCE};

/// One row of a computed release table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VestingEntry {
    pub month: Month,
    /// `YYYY-MM` of the start date advanced by `month` months
    pub date_label: String,
    pub released_this_month: f64,
    pub cumulative_released: f64,
    pub percent_released: f64,
    pub still_locked: f64,
}

/// Compute a cliff + linear release table with an optional TGE unlock.
///
/// The table always starts with a month-0 (TGE) row and has
/// `1 + cliff_months + max(vesting_months, 1)` rows. With `vesting_months == 0`
/// the whole post-TGE remainder unlocks in one step right after the cliff.
pub fn compute_schedule(
    total_tokens: f64,
    cliff_months: Month,
    vesting_months: Month,
    tge_percent: f64,
    start_date: NaiveDate,
) -> Result<Vec<VestingEntry>> {
    if !total_tokens.is_finite() || total_tokens < 0.0 {
        return Err(TokenomicsError::invalid(format!(
            "total tokens must be a non-negative number, got {}",
            total_tokens
        )));
    }
    if !(0.0..=100.0).contains(&tge_percent) {
        return Err(TokenomicsError::invalid(format!(
            "TGE percent must be within [0, 100], got {}",
            tge_percent
        )));
    }

    let tge_release = total_tokens * tge_percent / 100.0;
    let remaining = total_tokens - tge_release;
    let steps = vesting_months.max(1);
    let monthly_release = remaining / steps as f64;
    let last_month = cliff_months + steps;

    let mut entries = Vec::with_capacity(last_month as usize + 1);
    let mut cumulative = tge_release;
    entries.push(entry(0, tge_release, cumulative, total_tokens, start_date));

    for month in 1..=last_month {
        let released = if month <= cliff_months {
            0.0
        } else if month == last_month {
            // Close out exactly so rounding never leaves dust locked
            total_tokens - cumulative
        } else {
            monthly_release
        };
        cumulative = if month == last_month {
            total_tokens
        } else {
            cumulative + released
        };
        entries.push(entry(month, released, cumulative, total_tokens, start_date));
    }

    Ok(entries)
}

fn entry(
    month: Month,
    released: f64,
    cumulative: f64,
    total: f64,
    start_date: NaiveDate,
) -> VestingEntry {
    let percent_released = if total > 0.0 {
        cumulative / total * 100.0
    } else {
        0.0
    };
    VestingEntry {
        month,
        date_label: month_label(start_date, month),
        released_this_month: released,
        cumulative_released: cumulative,
        percent_released,
        still_locked: total - cumulative,
    }
}

/// `YYYY-MM` label for `start` advanced by `month` calendar months
pub fn month_label(start: NaiveDate, month: Month) -> String {
    start
        .checked_add_months(Months::new(month))
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_else(|| format!("M+{}", month))
}

/// Percentage of a category unlocked at a given month
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VestingMilestone {
    pub month: Month,
    pub percent: f64,
}

/// Milestone release table for one allocation category
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<VestingMilestone>", into = "Vec<VestingMilestone>")]
pub struct VestingSchedule {
    milestones: Vec<VestingMilestone>,
}

impl From<Vec<VestingMilestone>> for VestingSchedule {
    fn from(mut milestones: Vec<VestingMilestone>) -> Self {
        milestones.sort_by_key(|m| m.month);
        Self { milestones }
    }
}

impl From<VestingSchedule> for Vec<VestingMilestone> {
    fn from(schedule: VestingSchedule) -> Self {
        schedule.milestones
    }
}

impl VestingSchedule {
    /// Build from `(month, percent)` pairs; entries are ordered by month
    pub fn new<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Month, f64)>,
    {
        pairs
            .into_iter()
            .map(|(month, percent)| VestingMilestone { month, percent })
            .collect::<Vec<_>>()
            .into()
    }

    /// Everything unlocked at TGE
    pub fn immediate() -> Self {
        Self::new([(0, 100.0)])
    }

    /// Milestone form of a TGE + cliff + linear schedule
    pub fn linear(cliff_months: Month, vesting_months: Month, tge_percent: f64) -> Self {
        let tge = tge_percent.clamp(0.0, 100.0);
        let steps = vesting_months.max(1);
        let monthly = (100.0 - tge) / steps as f64;

        let mut pairs = Vec::with_capacity(steps as usize + 1);
        if tge > 0.0 {
            pairs.push((0, tge));
        }
        if monthly > 0.0 {
            pairs.extend((cliff_months + 1..=cliff_months + steps).map(|m| (m, monthly)));
        }
        Self::new(pairs)
    }

    pub fn milestones(&self) -> &[VestingMilestone] {
        &self.milestones
    }

    /// Sum of all milestone percentages
    pub fn total_percent(&self) -> f64 {
        self.milestones.iter().map(|m| m.percent).sum()
    }

    /// Last month with a milestone (0 for an empty schedule)
    pub fn max_month(&self) -> Month {
        self.milestones.iter().map(|m| m.month).max().unwrap_or(0)
    }

    /// Cumulative percent unlocked at `month`; sticky past the last milestone
    pub fn cumulative_percent_at(&self, month: Month) -> f64 {
        self.milestones
            .iter()
            .filter(|m| m.month <= month)
            .map(|m| m.percent)
            .sum()
    }

    /// Check milestones are non-negative and sum to 100 ± tolerance
    pub fn validate(&self, category: &str) -> Result<()> {
        if let Some(bad) = self.milestones.iter().find(|m| !(m.percent >= 0.0)) {
            return Err(TokenomicsError::invalid(format!(
                "vesting milestone for '{}' at month {} has invalid percentage {}",
                category, bad.month, bad.percent
            )));
        }
        let total = self.total_percent();
        if (total - 100.0).abs() > PERCENT_TOLERANCE {
            return Err(TokenomicsError::VestingSum {
                category: category.to_string(),
                total,
            });
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }
}
