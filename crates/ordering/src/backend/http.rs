//! `reqwest` implementation of [`Backend`].

use std::sync::Arc;

use blue_flame_core::{ErrorBody, MenuItem, OrderConfirmation, OrderRequest};
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};

use super::{Backend, BackendError};
use crate::config::OrderingConfig;

/// Header carrying the per-checkout correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest slice of a response body included in logs.
const LOGGED_BODY_CHARS: usize = 500;

/// HTTP client for the ordering backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HttpBackend {
    inner: Arc<HttpBackendInner>,
}

struct HttpBackendInner {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpBackend {
    /// Create a client for the backend named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built (for
    /// example, when no TLS backend is available).
    pub fn new(config: &OrderingConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(HttpBackendInner {
                client,
                base_url: config.backend_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }
}

impl Backend for HttpBackend {
    #[instrument(skip(self))]
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, BackendError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("/api/menu"))
            .send()
            .await?;

        let items: Vec<MenuItem> = decode_success(response).await?;
        debug!(items = items.len(), "Fetched menu");
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn seed_menu(&self) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/api/menu/seed"))
            .send()
            .await?;

        // The refetch decides whether seeding worked; only transport errors stop the load.
        let status = response.status();
        if status.is_success() {
            debug!("Menu seeded");
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = %status,
                body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Seed returned non-success status"
            );
        }
        Ok(())
    }

    #[instrument(skip(self, order), fields(items = order.items.len()))]
    async fn create_order(
        &self,
        order: &OrderRequest,
        request_id: &str,
    ) -> Result<OrderConfirmation, BackendError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/api/orders"))
            .header(REQUEST_ID_HEADER, request_id)
            .json(order)
            .send()
            .await?;

        let confirmation: OrderConfirmation = decode_success(response).await?;
        debug!(total = ?confirmation.total, "Order accepted");
        Ok(confirmation)
    }
}

/// Turn a non-success response into [`BackendError::Status`], consuming it.
async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Get response body as text first for better error diagnostics
    let body = response.text().await.unwrap_or_default();
    error!(
        status = %status,
        body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
        "Backend returned non-success status"
    );

    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.detail_text());

    Err(BackendError::Status { status, detail })
}

/// Check the status, then decode the JSON body.
async fn decode_success<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let response = ensure_success(response).await?;
    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| {
        error!(
            error = %e,
            body = %body.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
            "Failed to parse backend response"
        );
        BackendError::Decode(e.to_string())
    })
}
