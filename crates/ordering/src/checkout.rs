//! Checkout orchestration.
//!
//! ```text
//!        begin() ok              finish(_)
//! Idle ─────────────▶ Submitting ─────────▶ Idle
//!   ▲  begin() err                            │
//!   └─── (no change, nothing sent) ◀──────────┘
//! ```
//!
//! Only one checkout may be in flight. While `Submitting`, `begin` is
//! rejected with [`CheckoutError::InProgress`] rather than queued. Every
//! outcome returns the machine to `Idle`.

use blue_flame_core::{Cart, CustomerDetails, OrderConfirmation, OrderRequest};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::BackendError;
use crate::error::CheckoutError;

/// Where the checkout machine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
}

/// A validated order waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOrder {
    pub request: OrderRequest,
    /// Correlation id sent with the request.
    pub request_id: String,
}

/// A successfully placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOutcome {
    /// Total reported by the backend, if it sent one.
    pub total: Option<Decimal>,
    pub request_id: String,
    pub confirmation: OrderConfirmation,
}

impl CheckoutOutcome {
    /// The message shown to the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.confirmation.total_display() {
            Some(total) => format!("Order placed! Total {total}"),
            None => "Order placed!".to_string(),
        }
    }
}

/// The checkout state machine.
#[derive(Debug, Default)]
pub struct Checkout {
    state: CheckoutState,
}

impl Checkout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: CheckoutState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.state, CheckoutState::Submitting)
    }

    /// Force the machine back to `Idle`.
    pub const fn reset(&mut self) {
        self.state = CheckoutState::Idle;
    }

    /// Validate and move to `Submitting`.
    ///
    /// Checks run in order and stop at the first failure: a checkout already
    /// in flight, an empty cart, then any empty customer field. On failure
    /// the state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InProgress`], [`CheckoutError::EmptyCart`] or
    /// [`CheckoutError::IncompleteDetails`].
    pub fn begin(
        &mut self,
        cart: &Cart,
        customer: &CustomerDetails,
    ) -> Result<PendingOrder, CheckoutError> {
        if self.is_submitting() {
            return Err(CheckoutError::InProgress);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if !customer.is_complete() {
            return Err(CheckoutError::IncompleteDetails {
                missing: customer.missing_fields(),
            });
        }

        self.state = CheckoutState::Submitting;
        Ok(PendingOrder {
            request: OrderRequest::build(cart, customer),
            request_id: Uuid::new_v4().to_string(),
        })
    }

    /// Apply the backend's answer and return to `Idle`.
    ///
    /// On success the cart is cleared; on any failure it is left exactly as
    /// it was. Customer details are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Rejected`], [`CheckoutError::Transport`] or
    /// [`CheckoutError::InvalidResponse`] for the corresponding backend
    /// failure.
    pub fn finish(
        &mut self,
        pending: PendingOrder,
        result: Result<OrderConfirmation, BackendError>,
        cart: &mut Cart,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        self.state = CheckoutState::Idle;

        match result {
            Ok(confirmation) => {
                info!(
                    request_id = %pending.request_id,
                    total = ?confirmation.total,
                    "Order placed"
                );
                cart.clear();
                Ok(CheckoutOutcome {
                    total: confirmation.total,
                    request_id: pending.request_id,
                    confirmation,
                })
            }
            Err(e) => {
                warn!(request_id = %pending.request_id, error = %e, "Order failed");
                Err(CheckoutError::from(e))
            }
        }
    }
}
