//! Tax arithmetic tests for core_kernel

use core_kernel::TaxRate;
use rust_decimal_macros::dec;

#[test]
fn tax_on_reference_subtotal() {
    // 1500 minor units at 15% is exactly 225
    let rate = TaxRate::new(dec!(0.15)).unwrap();
    assert_eq!(rate.tax_on_minor(1500), 225);
}

#[test]
fn tax_on_individual_lines_matches_aggregate_when_exact() {
    let rate = TaxRate::new(dec!(0.15)).unwrap();
    assert_eq!(rate.tax_on_minor(1000), 150);
    assert_eq!(rate.tax_on_minor(500), 75);
    assert_eq!(rate.tax_on_minor(1000) + rate.tax_on_minor(500), rate.tax_on_minor(1500));
}

#[test]
fn independent_line_rounding_can_diverge_from_aggregate() {
    // 3 x 333 at 7.25%: each line rounds to 24 (24.1425), the aggregate
    // 999 * 0.0725 = 72.4275 rounds to 72. No divergence here, but at
    // amounts 333/333/335 the aggregate is 1001 * 0.0725 = 72.5725 -> 73
    // while the lines give 24 + 24 + 24.2875->24 = 72.
    let rate = TaxRate::new(dec!(0.0725)).unwrap();

    let lines = [333i64, 333, 335];
    let line_sum: i64 = lines.iter().map(|&a| rate.tax_on_minor(a)).sum();
    let aggregate = rate.tax_on_minor(lines.iter().sum());

    assert_eq!(line_sum, 72);
    assert_eq!(aggregate, 73);
}

#[test]
fn midpoint_rounds_away_from_zero_not_to_even() {
    let rate = TaxRate::new(dec!(0.5)).unwrap();
    // 0.5 * 5 = 2.5: banker's rounding would give 2
    assert_eq!(rate.tax_on_minor(5), 3);
    assert_eq!(rate.tax_on_minor(-5), -3);
}

#[test]
fn zero_rate_yields_zero_tax() {
    let rate = TaxRate::new(dec!(0)).unwrap();
    assert_eq!(rate.tax_on_minor(123_456), 0);
}

#[test]
fn full_rate_yields_full_amount() {
    let rate = TaxRate::new(dec!(1)).unwrap();
    assert_eq!(rate.tax_on_minor(123_456), 123_456);
}
