//! Read-only display data for front ends.
//!
//! Views are plain snapshots built from session state. Prices are
//! preformatted so renderers never touch decimals.

use blue_flame_core::{
    Cart, CartLine, CategoryFilter, CustomerDetails, MenuItem, format_dollars,
};
use serde::Serialize;

use crate::checkout::CheckoutState;

/// Placeholder shown in place of a missing dish image.
pub const NO_IMAGE_LABEL: &str = "No image";

/// Menu card display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub image: Option<String>,
}

impl MenuCardView {
    /// The image URL, or the placeholder label.
    #[must_use]
    pub fn image_or_placeholder(&self) -> &str {
        self.image.as_deref().unwrap_or(NO_IMAGE_LABEL)
    }
}

impl From<&MenuItem> for MenuCardView {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            price: item.price.to_string(),
            image: item.image.clone(),
        }
    }
}

/// What the menu area shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum MenuView {
    /// Nothing to show for the current selection.
    Loading,
    Items(Vec<MenuCardView>),
}

impl MenuView {
    pub(crate) fn from_items(items: &[&MenuItem]) -> Self {
        if items.is_empty() {
            Self::Loading
        } else {
            Self::Items(items.iter().copied().map(MenuCardView::from).collect())
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Cart item display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            quantity: line.quantity.get(),
            price: line.price.to_string(),
            line_price: format_dollars(line.line_total()),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = cart.totals();
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: totals.subtotal_display(),
            tax: totals.tax_display(),
            total: totals.total_display(),
            item_count: totals.item_count,
        }
    }
}

/// Everything a front end needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub categories: Vec<String>,
    pub selected_category: String,
    pub menu: MenuView,
    pub cart: CartView,
    pub customer: CustomerDetails,
    pub checkout_state: CheckoutState,
    /// Label for the checkout button.
    pub checkout_label: &'static str,
}

/// Label for the checkout button in `state`.
#[must_use]
pub const fn checkout_label(state: CheckoutState) -> &'static str {
    match state {
        CheckoutState::Idle => "Checkout",
        CheckoutState::Submitting => "Placing Order...",
    }
}

pub(crate) fn category_labels(categories: &[CategoryFilter]) -> Vec<String> {
    categories.iter().map(ToString::to_string).collect()
}
