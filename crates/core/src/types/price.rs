//! Type-safe price representation using decimal arithmetic.
//!
//! All prices are in the restaurant's single currency (US dollars), so a
//! price is just a non-negative [`Decimal`] amount.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative price in dollars.
///
/// ## Examples
///
/// ```
/// use blue_flame_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(1250, 2)).unwrap();
/// assert_eq!(price.to_string(), "$12.50");
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The amount in dollars, at full precision.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_dollars(self.0))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

/// Format an amount as dollars with exactly two decimal places (e.g. `$25.20`).
///
/// Amounts with more than two places are rounded half away from zero.
#[must_use]
pub fn format_dollars(amount: Decimal) -> String {
    let cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${cents:.2}")
}
