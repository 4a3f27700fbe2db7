//! Error taxonomy for the ordering engine.
//!
//! Every failure is handled at the boundary where it occurs: menu loading
//! swallows [`LoadError`] after logging it, and checkout hands
//! [`CheckoutError`] back to the presentation layer together with a
//! user-facing message. Nothing here is fatal to a session.

use blue_flame_core::{CustomerField, MenuItemId};
use reqwest::StatusCode;
use thiserror::Error;

use crate::backend::BackendError;

/// Menu fetch, seed, or refetch failed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The initial `GET /api/menu` failed.
    #[error("Failed to fetch menu: {0}")]
    Fetch(#[source] BackendError),

    /// `POST /api/menu/seed` never got an answer.
    #[error("Failed to seed empty menu: {0}")]
    Seed(#[source] BackendError),

    /// The `GET /api/menu` after seeding failed.
    #[error("Failed to refetch menu after seeding: {0}")]
    Refetch(#[source] BackendError),
}

/// Why a checkout did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A checkout is already being submitted.
    #[error("Checkout already in progress")]
    InProgress,

    /// The cart has no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// At least one delivery field is empty.
    #[error("Missing customer details: {}", format_fields(.missing))]
    IncompleteDetails { missing: Vec<CustomerField> },

    /// The backend refused the order.
    #[error("Order rejected ({status}): {}", .detail.as_deref().unwrap_or("(no detail)"))]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },

    /// The order request never completed.
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend accepted the request but its response was not JSON.
    #[error("Invalid order response: {0}")]
    InvalidResponse(String),
}

impl CheckoutError {
    /// The message shown to the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InProgress => "Placing order...".to_string(),
            Self::EmptyCart => "Add some items first".to_string(),
            Self::IncompleteDetails { .. } => "Enter your details".to_string(),
            Self::Rejected { status, detail } => {
                let reason = detail
                    .clone()
                    .unwrap_or_else(|| status.as_u16().to_string());
                format!("Failed to place order: {reason}")
            }
            Self::Transport(_) | Self::InvalidResponse(_) => {
                "Network error placing order".to_string()
            }
        }
    }

    /// Whether the failure was caught before any request was sent.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InProgress | Self::EmptyCart | Self::IncompleteDetails { .. }
        )
    }
}

impl From<BackendError> for CheckoutError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Status { status, detail } => Self::Rejected { status, detail },
            BackendError::Transport(msg) => Self::Transport(msg),
            BackendError::Decode(msg) => Self::InvalidResponse(msg),
        }
    }
}

/// Errors from session-level user actions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The item id is not on the loaded menu.
    #[error("Unknown menu item: {0}")]
    UnknownItem(MenuItemId),
}

fn format_fields(fields: &[CustomerField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
