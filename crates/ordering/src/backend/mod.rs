//! Ordering backend client.
//!
//! # Endpoints
//!
//! - `GET  {base}/api/menu` - full catalog as a JSON array
//! - `POST {base}/api/menu/seed` - populate an empty catalog
//! - `POST {base}/api/orders` - place an order
//!
//! The engine talks to the backend only through the [`Backend`] trait, so
//! the loader and checkout logic can be driven by an in-memory fake in tests.

mod http;

pub use http::HttpBackend;

use std::future::Future;

use blue_flame_core::{MenuItem, OrderConfirmation, OrderRequest};
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never completed (connection refused, timeout, TLS...).
    #[error("HTTP error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{status}: {}", .detail.as_deref().unwrap_or("(no detail)"))]
    Status {
        status: StatusCode,
        /// The `detail` field of the error body, if any.
        detail: Option<String>,
    },

    /// A success response whose body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl BackendError {
    /// Whether the request never reached a response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// The HTTP API the engine consumes.
pub trait Backend {
    /// Fetch the full catalog.
    fn fetch_menu(&self) -> impl Future<Output = Result<Vec<MenuItem>, BackendError>> + Send;

    /// Ask the backend to populate an empty catalog.
    ///
    /// The response status and body are ignored; only a request that never
    /// got an answer is an error.
    fn seed_menu(&self) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Submit an order.
    ///
    /// `request_id` is a correlation id for logs on both sides.
    fn create_order(
        &self,
        order: &OrderRequest,
        request_id: &str,
    ) -> impl Future<Output = Result<OrderConfirmation, BackendError>> + Send;
}
