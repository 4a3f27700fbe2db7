//! Blue Flame Core - Shared types and order state.
//!
//! This crate provides the state every Blue Flame ordering component works
//! with:
//! - `ordering` - The order-state engine (menu loading, checkout)
//! - `cli` - Terminal front end for browsing the menu and ordering
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, and quantities
//! - [`menu`] - Menu catalog, categories, and filtering
//! - [`cart`] - Cart lines and quantity edits
//! - [`totals`] - Subtotal, tax, and total calculation
//! - [`customer`] - Delivery details form state
//! - [`order`] - Order request and response wire types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod customer;
pub mod menu;
pub mod order;
pub mod totals;
pub mod types;

pub use cart::{Cart, CartLine};
pub use customer::{CustomerDetails, CustomerField, CustomerFieldError};
pub use menu::{CategoryFilter, Menu, MenuItem};
pub use order::{ErrorBody, OrderConfirmation, OrderItem, OrderRequest};
pub use totals::{OrderTotals, TAX_RATE};
pub use types::*;
