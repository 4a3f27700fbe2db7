//! Local cart state.
//!
//! A cart holds one line per distinct menu item, in the order items were
//! first added. Lines carry a snapshot of the item's name and price taken at
//! add time, so later catalog changes never reprice an existing line.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::menu::MenuItem;
use crate::totals::OrderTotals;
use crate::types::{MenuItemId, Price, Quantity};

/// One distinct menu item in the cart with its aggregated quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub id: MenuItemId,
    pub name: String,
    /// Price at the moment the item was first added.
    pub price: Price,
    pub quantity: Quantity,
}

impl CartLine {
    fn from_item(item: &MenuItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: Quantity::ONE,
        }
    }

    /// `price × quantity` at full precision, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price
            .amount()
            .checked_mul(Decimal::from(self.quantity.get()))
            .unwrap_or(Decimal::MAX)
    }
}

/// The cart for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in first-add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line for `id`, if the item is in the cart.
    #[must_use]
    pub fn line(&self, id: &MenuItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == *id)
    }

    fn line_mut(&mut self, id: &MenuItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id == *id)
    }

    /// Add one of `item`: bumps an existing line or appends a new one.
    pub fn add(&mut self, item: &MenuItem) {
        if let Some(line) = self.line_mut(&item.id) {
            line.quantity = line.quantity.incremented();
        } else {
            self.lines.push(CartLine::from_item(item));
        }
    }

    /// Set the quantity of the line for `id`, clamping below one to one.
    ///
    /// Returns `false` (and changes nothing) if no line matches.
    pub fn set_quantity(&mut self, id: &MenuItemId, quantity: i64) -> bool {
        self.line_mut(id).is_some_and(|line| {
            line.quantity = Quantity::clamped(quantity);
            true
        })
    }

    /// Raise the line for `id` by one. Returns `false` if no line matches.
    pub fn increment(&mut self, id: &MenuItemId) -> bool {
        self.line_mut(id).is_some_and(|line| {
            line.quantity = line.quantity.incremented();
            true
        })
    }

    /// Lower the line for `id` by one, never below one. Returns `false` if no
    /// line matches.
    pub fn decrement(&mut self, id: &MenuItemId) -> bool {
        self.line_mut(id).is_some_and(|line| {
            line.quantity = line.quantity.decremented();
            true
        })
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Subtotal, tax and total for the current lines.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        OrderTotals::calculate(&self.lines)
    }
}
