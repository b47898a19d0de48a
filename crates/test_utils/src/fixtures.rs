//! Test Fixtures
//!
//! Pre-built values for common test scenarios so individual tests only
//! spell out what they actually care about.

use chrono::NaiveDate;
use core_kernel::{BillingPeriod, TaxRate};
use rust_decimal_macros::dec;

/// Date fixtures
pub struct DateFixtures;

impl DateFixtures {
    /// A date safely inside [`PeriodFixtures::february_2026`]
    pub fn mid_february() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 10).expect("valid date")
    }

    /// A date outside [`PeriodFixtures::february_2026`]
    pub fn mid_march() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date")
    }
}

/// Billing period fixtures
pub struct PeriodFixtures;

impl PeriodFixtures {
    /// The default test billing period, all of February 2026
    pub fn february_2026() -> BillingPeriod {
        BillingPeriod::new(
            NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2026, 2, 28).expect("valid date"),
        )
    }

    /// The following period, March 2026
    pub fn march_2026() -> BillingPeriod {
        BillingPeriod::new(
            NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2026, 3, 31).expect("valid date"),
        )
    }
}

/// Tax rate fixtures
pub struct TaxFixtures;

impl TaxFixtures {
    /// The default rate used across the tests, 15%
    pub fn fifteen_percent() -> TaxRate {
        TaxRate::new(dec!(0.15)).expect("valid rate")
    }

    /// A rate that produces rounding residue on most amounts, 7.25%
    pub fn awkward_rate() -> TaxRate {
        TaxRate::new(dec!(0.0725)).expect("valid rate")
    }

    /// Zero tax
    pub fn zero() -> TaxRate {
        TaxRate::new(dec!(0)).expect("valid rate")
    }
}
