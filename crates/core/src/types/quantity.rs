//! Cart line quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A cart line quantity, always at least one.
///
/// Requests below one are clamped rather than rejected: a line is never
/// removed by a quantity edit.
///
/// ```
/// use blue_flame_core::Quantity;
///
/// assert_eq!(Quantity::clamped(0).get(), 1);
/// assert_eq!(Quantity::clamped(-3).get(), 1);
/// assert_eq!(Quantity::clamped(4).get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// The minimum quantity.
    pub const ONE: Self = Self(1);

    /// Create a quantity from any integer, clamping into `1..=u32::MAX`.
    #[must_use]
    pub fn clamped(requested: i64) -> Self {
        let value = requested.clamp(1, i64::from(u32::MAX));
        Self(u32::try_from(value).unwrap_or(u32::MAX))
    }

    /// The quantity as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// One more, saturating at `u32::MAX`.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One fewer, never below one.
    #[must_use]
    pub const fn decremented(self) -> Self {
        if self.0 > 1 { Self(self.0 - 1) } else { Self::ONE }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = &'static str;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            Err("quantity must be at least 1")
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_large_values() {
        assert_eq!(Quantity::clamped(i64::MAX).get(), u32::MAX);
        assert_eq!(Quantity::clamped(i64::MIN).get(), 1);
    }

    #[test]
    fn test_increment_saturates() {
        assert_eq!(Quantity::clamped(i64::MAX).incremented().get(), u32::MAX);
        assert_eq!(Quantity::ONE.incremented().get(), 2);
    }

    #[test]
    fn test_decrement_floors_at_one() {
        assert_eq!(Quantity::ONE.decremented(), Quantity::ONE);
        assert_eq!(Quantity::clamped(3).decremented().get(), 2);
    }

    #[test]
    fn test_deserialize_zero_fails() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("2").unwrap().get(), 2);
    }
}
