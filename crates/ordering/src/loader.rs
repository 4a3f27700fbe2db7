//! Startup menu loading.
//!
//! Fetches the catalog; if it comes back empty, asks the backend to seed it
//! and fetches exactly once more. Each step races a [`CancellationToken`] so
//! a torn-down session never receives a late result.

use std::future::Future;

use blue_flame_core::Menu;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::backend::{Backend, BackendError};
use crate::error::LoadError;

/// Result of a load attempt that was not cancelled.
pub type LoadResult = Result<Menu, LoadError>;

/// Runs the fetch → seed → refetch chain against a [`Backend`].
#[derive(Debug)]
pub struct MenuLoader<'a, B> {
    backend: &'a B,
    cancel: CancellationToken,
}

impl<'a, B: Backend> MenuLoader<'a, B> {
    #[must_use]
    pub const fn new(backend: &'a B, cancel: CancellationToken) -> Self {
        Self { backend, cancel }
    }

    /// Load the menu.
    ///
    /// Returns `None` if the token was cancelled before the chain finished;
    /// in that case no further requests are issued.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Option<LoadResult> {
        let items = match self.step(self.backend.fetch_menu()).await? {
            Ok(items) => items,
            Err(e) => return Some(Err(LoadError::Fetch(e))),
        };

        if !items.is_empty() {
            debug!(items = items.len(), "Menu loaded");
            return Some(Ok(Menu::new(items)));
        }

        info!("Menu is empty, seeding");
        if let Err(e) = self.step(self.backend.seed_menu()).await? {
            return Some(Err(LoadError::Seed(e)));
        }

        match self.step(self.backend.fetch_menu()).await? {
            Ok(items) => {
                debug!(items = items.len(), "Menu loaded after seeding");
                Some(Ok(Menu::new(items)))
            }
            Err(e) => Some(Err(LoadError::Refetch(e))),
        }
    }

    /// Await `request` unless the token fires first.
    async fn step<T>(
        &self,
        request: impl Future<Output = Result<T, BackendError>>,
    ) -> Option<Result<T, BackendError>> {
        if self.cancel.is_cancelled() {
            debug!("Menu load cancelled");
            return None;
        }

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                debug!("Menu load cancelled");
                None
            }
            result = request => Some(result),
        }
    }
}

/// Log a failed load. The menu stays as it was and no retry is scheduled.
pub(crate) fn log_load_failure(err: &LoadError) {
    warn!(error = %err, "Menu load failed; menu stays in loading state");
}
