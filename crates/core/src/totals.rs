//! Order total calculation.
//!
//! Tax is rounded to cents on its own before being added to the subtotal,
//! and the sum is rounded again. Rounding the sum alone can differ by a cent.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::cart::CartLine;
use crate::types::format_dollars;

/// Sales tax rate applied to every order (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Money totals for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OrderTotals {
    /// Sum of `price × quantity`, unrounded.
    pub subtotal: Decimal,
    /// `subtotal × TAX_RATE`, rounded to cents.
    pub tax: Decimal,
    /// `subtotal + tax`, rounded to cents.
    pub total: Decimal,
    /// Sum of all line quantities.
    pub item_count: u64,
}

impl OrderTotals {
    /// Compute totals for `lines`.
    #[must_use]
    pub fn calculate(lines: &[CartLine]) -> Self {
        let subtotal = lines
            .iter()
            .map(CartLine::line_total)
            .fold(Decimal::ZERO, saturating_add);
        let tax = round_cents(subtotal.checked_mul(TAX_RATE).unwrap_or(Decimal::MAX));
        let total = round_cents(saturating_add(subtotal, tax));
        let item_count = lines.iter().map(|line| u64::from(line.quantity.get())).sum();

        Self {
            subtotal,
            tax,
            total,
            item_count,
        }
    }

    /// Subtotal formatted for display.
    #[must_use]
    pub fn subtotal_display(&self) -> String {
        format_dollars(self.subtotal)
    }

    /// Tax formatted for display.
    #[must_use]
    pub fn tax_display(&self) -> String {
        format_dollars(self.tax)
    }

    /// Total formatted for display.
    #[must_use]
    pub fn total_display(&self) -> String {
        format_dollars(self.total)
    }
}

fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(Decimal::MAX)
}

fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{MenuItemId, Price, Quantity};

    fn line(id: &str, cents: i64, quantity: i64) -> CartLine {
        CartLine {
            id: MenuItemId::new(id),
            name: id.to_owned(),
            price: Price::from_cents(cents).unwrap(),
            quantity: Quantity::clamped(quantity),
        }
    }

    #[test]
    fn test_tax_rate_constant() {
        assert_eq!(TAX_RATE, Decimal::new(8, 2));
    }

    #[test]
    fn test_worked_example() {
        let totals = OrderTotals::calculate(&[line("a", 1000, 2), line("b", 333, 1)]);

        assert_eq!(totals.subtotal, Decimal::new(2333, 2));
        assert_eq!(totals.tax, Decimal::new(187, 2));
        assert_eq!(totals.total, Decimal::new(2520, 2));
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.total_display(), "$25.20");
    }

    #[test]
    fn test_empty_cart_is_zero() {
        let totals = OrderTotals::calculate(&[]);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
        assert_eq!(totals.subtotal_display(), "$0.00");
    }

    fn single(price: Decimal) -> OrderTotals {
        OrderTotals::calculate(&[CartLine {
            id: MenuItemId::new("x"),
            name: "x".into(),
            price: Price::new(price).unwrap(),
            quantity: Quantity::ONE,
        }])
    }

    #[test]
    fn test_tax_rounded_half_away_from_zero() {
        // 6.5625 * 0.08 = 0.525
        let totals = single(Decimal::new(65_625, 4));
        assert_eq!(totals.tax, Decimal::new(53, 2));
        assert_eq!(totals.total, Decimal::new(709, 2));
    }

    #[test]
    fn test_tax_rounded_before_adding() {
        // 0.0047 * 0.08 rounds to zero tax, so the total is round(0.0047).
        // Rounding the unrounded sum 0.005076 instead would yield 0.01.
        let totals = single(Decimal::new(47, 4));
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
        assert_eq!(totals.total_display(), "$0.00");
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let huge = CartLine {
            id: MenuItemId::new("gold"),
            name: "gold".into(),
            price: Price::new(Decimal::MAX).unwrap(),
            quantity: Quantity::clamped(5),
        };
        let totals = OrderTotals::calculate(&[huge.clone(), huge]);

        assert_eq!(totals.subtotal, Decimal::MAX);
        assert_eq!(totals.total, Decimal::MAX);
        assert_eq!(totals.item_count, 10);
    }

    #[test]
    fn test_subtotal_keeps_full_precision() {
        let totals = OrderTotals::calculate(&[line("a", 1, 3), line("b", 250, 1)]);
        assert_eq!(totals.subtotal, Decimal::new(253, 2));

        let precise = single(Decimal::new(1_005, 3));
        assert_eq!(precise.subtotal, Decimal::new(1_005, 3));
    }
}
