//! Amount type for monetary values stored in the Notion number property.
//!
//! Notion stores numbers as JSON floats. This module provides the `Amount` type which wraps
//! `Decimal` so that sums are computed exactly, and which reads and writes JSON numbers.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of decimal places reported for totals.
const CENTS: u32 = 2;

/// Represents an amount of money.
///
/// Serializes as a JSON number. Deserializes from a JSON number or from a numeric string, so
/// both `12.5` and `"12.50"` are accepted.
///
/// ```
/// # use shopping_ledger::model::Amount;
/// # use std::str::FromStr;
/// let total = Amount::from_str("10.00")
///     .unwrap()
///     .checked_add(Amount::from_str("5.5").unwrap())
///     .unwrap();
/// assert_eq!(total.rounded().to_string(), "15.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Converts a float as returned by Notion. Returns `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        Decimal::from_f64(value).map(Self)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Rounds to two decimal places using banker's rounding.
    pub fn rounded(&self) -> Self {
        Self(self.0.round_dp(CENTS))
    }

    /// Adds `rhs`, returning `None` if the result does not fit in a `Decimal`.
    pub fn checked_add(self, rhs: Amount) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        <Decimal as Deserialize<'de>>::deserialize(deserializer).map(Self)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}
