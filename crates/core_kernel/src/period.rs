//! Billing periods
//!
//! A billing period is a closed date range at day granularity. Both bounds
//! are inclusive: two periods overlap when each one's start is on or before
//! the other's end.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive day-granularity date range `[from, to]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl BillingPeriod {
    /// Creates a new billing period
    ///
    /// Bounds are taken as-is; an inverted range simply matches nothing.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Returns true if the date falls within the period, bounds inclusive
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Returns true if the two inclusive ranges intersect
    pub fn overlaps(&self, other: &BillingPeriod) -> bool {
        self.from <= other.to && self.to >= other.from
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_contains_is_inclusive_at_both_bounds() {
        let period = BillingPeriod::new(d(2026, 2, 1), d(2026, 2, 28));

        assert!(period.contains(d(2026, 2, 1)));
        assert!(period.contains(d(2026, 2, 28)));
        assert!(!period.contains(d(2026, 1, 31)));
        assert!(!period.contains(d(2026, 3, 1)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = BillingPeriod::new(d(2026, 2, 1), d(2026, 2, 28));
        let b = BillingPeriod::new(d(2026, 2, 20), d(2026, 3, 10));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_single_day_touching_counts_as_overlap() {
        let a = BillingPeriod::new(d(2026, 2, 1), d(2026, 2, 28));
        let b = BillingPeriod::new(d(2026, 2, 28), d(2026, 3, 31));

        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_disjoint_periods_do_not_overlap() {
        let a = BillingPeriod::new(d(2026, 2, 1), d(2026, 2, 28));
        let b = BillingPeriod::new(d(2026, 3, 1), d(2026, 3, 31));

        assert!(!a.overlaps(&b));
    }
}
