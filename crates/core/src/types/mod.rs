//! Core types for Blue Flame Kitchen ordering.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod quantity;

pub use id::*;
pub use price::{Price, PriceError, format_dollars};
pub use quantity::Quantity;
