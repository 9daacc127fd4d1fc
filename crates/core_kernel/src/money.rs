//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point errors.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    EUR,
    USD,
    GBP,
    CHF,
    MXN,
    ARS,
    CLP,
    JPY,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY | Currency::CLP => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "€",
            Currency::USD => "$",
            Currency::GBP => "£",
            Currency::CHF => "CHF",
            Currency::MXN => "MX$",
            Currency::ARS => "AR$",
            Currency::CLP => "CLP$",
            Currency::JPY => "¥",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::CHF => "CHF",
            Currency::MXN => "MXN",
            Currency::ARS => "ARS",
            Currency::CLP => "CLP",
            Currency::JPY => "JPY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Amount overflow in {0}")]
    Overflow(&'static str),
}

/// A monetary amount with associated currency
///
/// Amounts are kept with 4 decimal places internally; document totals are
/// rounded to the configured precision by the caller through [`Money::round_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Creates Money from an integer amount in minor units (e.g., cents)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        let divisor = Decimal::new(10_i64.pow(currency.decimal_places()), 0);
        Self::new(Decimal::new(minor_units, 0) / divisor, currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Rounds to the currency's standard decimal places
    pub fn round_to_currency(&self) -> Self {
        self.round_to(self.currency.decimal_places())
    }

    /// Rounds half away from zero to `dp` decimal places
    ///
    /// This is the commercial rounding used for invoice and commission totals
    /// (2.345 becomes 2.35, -2.345 becomes -2.35).
    pub fn round_to(&self, dp: u32) -> Self {
        Self {
            amount: self
                .amount
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
            currency: self.currency,
        }
    }

    /// Checked addition; fails on currency mismatch or overflow
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(MoneyError::Overflow("addition"))?;
        Ok(Self::new(amount, self.currency))
    }

    /// Checked subtraction; fails on currency mismatch or overflow
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(MoneyError::Overflow("subtraction"))?;
        Ok(Self::new(amount, self.currency))
    }

    /// Sums a sequence of amounts, all of which must be in `currency`
    pub fn checked_sum<'a, I>(items: I, currency: Currency) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        items
            .into_iter()
            .try_fold(Money::zero(currency), |acc, item| acc.checked_add(item))
    }

    /// Returns `percentage`% of this amount without intermediate rounding
    ///
    /// The result is a raw decimal so that callers can sum several shares
    /// and round once at the end.
    pub fn percentage_share(&self, percentage: Decimal) -> Result<Decimal, MoneyError> {
        self.amount
            .checked_mul(percentage)
            .and_then(|product| product.checked_div(dec!(100)))
            .ok_or(MoneyError::Overflow("percentage share"))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::new(dec!(100.50), Currency::EUR);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.currency(), Currency::EUR);
    }

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050, Currency::EUR);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_round_to_is_half_away_from_zero() {
        let m = Money::new(dec!(2.345), Currency::EUR);
        assert_eq!(m.round_to(2).amount(), dec!(2.35));

        let negative = Money::new(dec!(-2.345), Currency::EUR);
        assert_eq!(negative.round_to(2).amount(), dec!(-2.35));
    }

    #[test]
    fn test_currency_mismatch() {
        let eur = Money::new(dec!(100.00), Currency::EUR);
        let usd = Money::new(dec!(100.00), Currency::USD);

        let result = eur.checked_add(&usd);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_percentage_share_keeps_full_precision() {
        let net = Money::new(dec!(33.33), Currency::EUR);
        assert_eq!(net.percentage_share(dec!(12.5)).unwrap(), dec!(4.166250));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn checked_sum_matches_decimal_sum(
            amounts in proptest::collection::vec(-1_000_000i64..1_000_000i64, 0..20)
        ) {
            let items: Vec<Money> = amounts
                .iter()
                .map(|a| Money::from_minor(*a, Currency::EUR))
                .collect();
            let total = Money::checked_sum(&items, Currency::EUR).unwrap();
            let expected: Decimal = items.iter().map(|m| m.amount()).sum();
            prop_assert_eq!(total.amount(), expected);
        }

        #[test]
        fn round_to_never_moves_more_than_half_unit(
            minor in -10_000_000i64..10_000_000i64,
            dp in 0u32..4u32
        ) {
            let money = Money::new(Decimal::new(minor, 4), Currency::EUR);
            let rounded = money.round_to(dp);
            let half_unit = Decimal::new(5, dp + 1);
            prop_assert!((rounded.amount() - money.amount()).abs() <= half_unit);
        }
    }
}
