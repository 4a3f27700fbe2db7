//! Blue Flame Ordering - The order-state engine.
//!
//! Reconciles the remote menu, the local cart, category filtering, quantity
//! edits and checkout submission into one consistent session.
//!
//! # Architecture
//!
//! ```text
//! MenuLoader ──▶ Menu ──(category)──▶ MenuView
//!                                       │ user action
//!                                       ▼
//!                  Backend ◀── Checkout ◀── Cart + CustomerDetails
//! ```
//!
//! All state lives in an [`OrderSession`]; front ends call its methods and
//! render from [`OrderSession::snapshot`]. The backend is reached only
//! through the [`Backend`] trait.
//!
//! # Modules
//!
//! - [`backend`] - `Backend` trait and the `reqwest` client
//! - [`loader`] - Fetch, seed-if-empty, refetch
//! - [`checkout`] - The `Idle`/`Submitting` state machine
//! - [`session`] - Owned session state and user actions
//! - [`views`] - Preformatted display snapshots
//! - [`config`] - Environment configuration
//! - [`error`] - Load, checkout and session errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod checkout;
pub mod config;
pub mod error;
pub mod loader;
pub mod session;
pub mod views;

#[cfg(test)]
mod testing;

pub use backend::{Backend, BackendError, HttpBackend};
pub use checkout::{Checkout, CheckoutOutcome, CheckoutState, PendingOrder};
pub use config::{ConfigError, OrderingConfig};
pub use error::{CheckoutError, LoadError, SessionError};
pub use loader::{LoadResult, MenuLoader};
pub use session::OrderSession;
pub use views::{CartItemView, CartView, MenuCardView, MenuView, SessionSnapshot};
