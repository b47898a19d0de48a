//! Currency and tax-rate types with exact minor-unit arithmetic
//!
//! All monetary amounts in the system are `i64` integers in minor currency
//! units (e.g. cents). The only decimal arithmetic is the tax rate, carried
//! as an arbitrary-precision [`rust_decimal::Decimal`] and applied with
//! round-half-up. Binary floating point never enters the money path.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur validating monetary inputs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Invalid tax rate: {0} (must be a decimal in [0, 1])")]
    InvalidTaxRate(String),
}

/// A three-letter lowercase currency code
///
/// The system stores currencies as free-form lowercase codes rather than a
/// closed enum; invoices only require that all charges they aggregate share
/// one code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Creates a currency from a code, normalizing to lowercase
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidCurrency` unless the code is exactly
    /// three ASCII letters.
    pub fn new(code: impl AsRef<str>) -> Result<Self, MoneyError> {
        let code = code.as_ref();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(MoneyError::InvalidCurrency(code.to_string()));
        }
        Ok(Self(code.to_ascii_lowercase()))
    }

    /// US dollars, the system default
    pub fn usd() -> Self {
        Self("usd".to_string())
    }

    /// Returns the lowercase code
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A tax rate as an arbitrary-precision decimal in `[0, 1]`
///
/// Tax is computed as `round_half_up(amount * rate)`: ties round away from
/// zero (1.5 becomes 2, -1.5 becomes -2), never banker's rounding. Both the
/// invoice-level tax and every line's tax use this same function, so totals
/// are reproducible bit-for-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Creates a tax rate from a decimal value
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidTaxRate` if the value is outside `[0, 1]`.
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value.is_sign_negative() || value > Decimal::ONE {
            return Err(MoneyError::InvalidTaxRate(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Computes tax on an amount in minor units, rounding half up
    pub fn tax_on_minor(&self, amount: i64) -> i64 {
        let tax = Decimal::from(amount) * self.0;
        let rounded = tax.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        // |rate| <= 1, so |tax| <= |amount| and always fits in i64
        rounded.to_i64().expect("rounded tax fits in i64")
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaxRate {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value =
            Decimal::from_str(s).map_err(|_| MoneyError::InvalidTaxRate(s.to_string()))?;
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_normalizes_to_lowercase() {
        let c = Currency::new("USD").unwrap();
        assert_eq!(c.code(), "usd");
    }

    #[test]
    fn test_currency_rejects_bad_codes() {
        assert!(Currency::new("us").is_err());
        assert!(Currency::new("dollars").is_err());
        assert!(Currency::new("u5d").is_err());
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        let rate = TaxRate::new(dec!(0.1)).unwrap();
        assert_eq!(rate.tax_on_minor(5), 1);
        assert_eq!(rate.tax_on_minor(4), 0);
        assert_eq!(rate.tax_on_minor(-5), -1);
    }

    #[test]
    fn test_tax_rate_bounds() {
        assert!(TaxRate::new(dec!(0)).is_ok());
        assert!(TaxRate::new(dec!(1)).is_ok());
        assert!(TaxRate::new(dec!(1.01)).is_err());
        assert!(TaxRate::new(dec!(-0.1)).is_err());
    }

    #[test]
    fn test_tax_rate_parse() {
        let rate: TaxRate = "0.15".parse().unwrap();
        assert_eq!(rate.as_decimal(), dec!(0.15));
        assert_eq!(rate.to_string(), "0.15");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    proptest! {
        #[test]
        fn tax_never_exceeds_amount(
            amount in -1_000_000_000i64..1_000_000_000i64,
            rate_bp in 0u32..=10_000u32
        ) {
            let rate = TaxRate::new(Decimal::new(rate_bp as i64, 4)).unwrap();
            let tax = rate.tax_on_minor(amount);
            prop_assert!(tax.unsigned_abs() <= amount.unsigned_abs());
        }

        #[test]
        fn tax_sign_follows_amount(amount in -1_000_000i64..1_000_000i64) {
            let rate = TaxRate::new(dec!(0.15)).unwrap();
            let tax = rate.tax_on_minor(amount);
            prop_assert!(tax == 0 || (tax > 0) == (amount > 0));
        }
    }
}
