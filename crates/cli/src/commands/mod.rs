//! Command implementations.

pub mod menu;
pub mod order;

use blue_flame_ordering::{Backend, OrderSession};
use thiserror::Error;

/// Failures specific to the terminal front end.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Menu is unavailable; check that the backend is running")]
    MenuUnavailable,

    #[error("Invalid item `{0}`: expected ID or ID:QTY with QTY >= 1")]
    InvalidItem(String),
}

/// Load the menu, failing if nothing could be loaded.
async fn load_menu<B: Backend>(session: &mut OrderSession<B>) -> Result<(), CommandError> {
    if session.load_menu().await && !session.menu().is_empty() {
        Ok(())
    } else {
        Err(CommandError::MenuUnavailable)
    }
}
