//! Order wire types.
//!
//! [`OrderRequest`] is built from the cart at checkout time and never stored.
//! Prices are deliberately absent: the backend prices the order itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::customer::CustomerDetails;
use crate::types::{MenuItemId, format_dollars};

/// One requested line: which item and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_id: MenuItemId,
    pub quantity: u32,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.id.clone(),
            quantity: line.quantity.get(),
        }
    }
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_address: String,
    pub items: Vec<OrderItem>,
}

impl OrderRequest {
    /// Build a request from the cart lines (in cart order) and the customer.
    #[must_use]
    pub fn build(cart: &Cart, customer: &CustomerDetails) -> Self {
        Self {
            customer_name: customer.name.clone(),
            customer_email: customer.email.clone(),
            customer_address: customer.address.clone(),
            items: cart.lines().iter().map(OrderItem::from).collect(),
        }
    }
}

/// Successful order response.
///
/// Any JSON body confirms the order. `total` is read when it is a number or
/// a numeric string; the body is kept verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct OrderConfirmation {
    /// Total charged, as computed by the backend.
    pub total: Option<Decimal>,
    pub body: serde_json::Value,
}

impl OrderConfirmation {
    /// A confirmation carrying only `total`.
    #[must_use]
    pub fn with_total(total: Decimal) -> Self {
        Self {
            total: Some(total),
            body: serde_json::json!({ "total": total.to_string() }),
        }
    }

    /// Total formatted for display, if the backend sent one.
    #[must_use]
    pub fn total_display(&self) -> Option<String> {
        self.total.map(format_dollars)
    }
}

impl From<serde_json::Value> for OrderConfirmation {
    fn from(body: serde_json::Value) -> Self {
        let total = body
            .get("total")
            .cloned()
            .and_then(|total| serde_json::from_value::<Decimal>(total).ok());
        Self { total, body }
    }
}

/// Error body of a rejected request, e.g. `{"detail": "Item 9 not found"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The detail as displayable text.
    ///
    /// Strings are returned as-is; structured details (such as a list of
    /// validation errors) are rendered as compact JSON. Null, empty strings
    /// and a missing field all yield `None`.
    #[must_use]
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
