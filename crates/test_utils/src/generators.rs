//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Duration, NaiveDate};
use core_kernel::{BillingPeriod, TaxRate};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating valid positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating signed amounts in minor units
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    -1_000_000_000i64..1_000_000_000i64
}

/// Strategy for generating valid tax rates in `[0, 1]` at basis-point
/// granularity
pub fn tax_rate_strategy() -> impl Strategy<Value = TaxRate> {
    (0u32..=10_000u32).prop_map(|bp| {
        TaxRate::new(Decimal::new(bp as i64, 4)).expect("basis points are in range")
    })
}

/// Strategy for generating valid lowercase currency codes
pub fn currency_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("usd".to_string()),
        Just("eur".to_string()),
        Just("gbp".to_string()),
        Just("jpy".to_string()),
        Just("aud".to_string()),
    ]
}

/// Strategy for generating billing periods up to a quarter long in 2026
pub fn billing_period_strategy() -> impl Strategy<Value = BillingPeriod> {
    (0i64..330i64, 1i64..90i64).prop_map(|(start_offset, len)| {
        let from = NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date")
            + Duration::days(start_offset);
        BillingPeriod::new(from, from + Duration::days(len - 1))
    })
}

/// Strategy for generating a date inside the given period
pub fn date_in_period_strategy(period: BillingPeriod) -> impl Strategy<Value = NaiveDate> {
    let span = (period.to - period.from).num_days();
    (0i64..=span).prop_map(move |offset| period.from + Duration::days(offset))
}
