//! Money value object for currency amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use super::Quantity;

/// A monetary amount.
///
/// Represented as a Decimal for precise financial calculations. The currency
/// travels separately (see `OrderFields::currency`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// One unit of currency.
    pub const ONE: Self = Self(Decimal::ONE);

    /// Largest representable amount, used as the most aggressive bid price.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Create a new Money value from a Decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money value from cents (integer).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a Money value from whole currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the inner Decimal value.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if this amount is positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Adds two amounts, saturating at the representable bounds.
    #[must_use]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Subtracts two amounts, saturating at the representable bounds.
    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Quantity> for Money {
    type Output = Self;

    fn mul(self, rhs: Quantity) -> Self::Output {
        Self(self.0.saturating_mul(rhs.amount()))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_display_uses_two_decimals() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "10.50");
        assert_eq!(format!("{}", Money::from_units(3)), "3.00");
    }

    #[test]
    fn money_ordering() {
        assert!(Money::from_cents(99) < Money::ONE);
        assert!(Money::ZERO < Money::MAX);
    }

    #[test]
    fn money_saturates_at_max() {
        assert_eq!(Money::MAX.saturating_add(Money::ONE), Money::MAX);
        assert!(Money::MAX.saturating_sub(Money::ONE) < Money::MAX);
    }

    #[test]
    fn money_times_quantity() {
        let notional = Money::new(dec!(12.5)) * Quantity::from_i64(4);
        assert_eq!(notional, Money::from_units(50));
    }

    #[test]
    fn money_serde_roundtrip() {
        let money = Money::new(dec!(101.25));
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, "\"101.25\"");
        let parsed: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, money);
    }
}
