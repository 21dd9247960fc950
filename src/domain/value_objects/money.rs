//! # Money
//!
//! Non-negative currency amounts in US dollars.
//!
//! All rate arithmetic goes through [`Money`] so that amounts stay exact
//! (no binary floating point) and are rounded to whole cents in exactly one
//! place.
//!
//! # Examples
//!
//! ```
//! use parcel_rates::domain::value_objects::money::Money;
//!
//! let base = Money::from_cents(413);
//! let surcharge = Money::from_cents(40);
//! let total = base.checked_add(surcharge).unwrap();
//! assert_eq!(total.to_string(), "$4.53");
//! ```

use crate::domain::errors::ValidationError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

/// A non-negative amount of money, rounded to cents.
///
/// # Invariants
///
/// - Never negative
/// - At most two decimal places
///
/// Deserialization goes through [`Money::from_decimal`], so negative input is
/// rejected and fractional cents are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates an amount from a whole number of cents.
    ///
    /// Negative inputs clamp to zero.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents.max(0), 2))
    }

    /// Creates an amount from a decimal, rounding to cents.
    ///
    /// Returns `None` for negative amounts.
    #[must_use]
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return None;
        }
        Some(Self(round_cents(amount)))
    }

    /// Returns the underlying decimal amount.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Adds two amounts, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Multiplies by a whole count, returning `None` on overflow.
    #[must_use]
    pub fn checked_mul_units(self, units: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(units)).map(Self)
    }
}

/// Rounds a decimal to two places, midpoint away from zero.
#[inline]
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl TryFrom<Decimal> for Money {
    type Error = ValidationError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(amount).ok_or_else(|| ValidationError::invalid_amount(amount))
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|m| m.0).sum())
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
