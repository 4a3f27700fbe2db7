//! The per-page ordering session.
//!
//! [`OrderSession`] owns every piece of engine state: the loaded menu, the
//! category selection, the cart, the customer form and the checkout state
//! machine. User actions are methods on the session and front ends render
//! from [`OrderSession::snapshot`].

use blue_flame_core::{
    Cart, CategoryFilter, CustomerDetails, CustomerField, Menu, MenuItemId, OrderConfirmation,
    OrderTotals,
};
use tokio_util::sync::CancellationToken;
use tracing::{Span, debug, info, instrument};

use crate::backend::{Backend, BackendError};
use crate::checkout::{Checkout, CheckoutOutcome, CheckoutState, PendingOrder};
use crate::error::{CheckoutError, SessionError};
use crate::loader::{MenuLoader, log_load_failure};
use crate::views::{CartView, MenuView, SessionSnapshot, category_labels, checkout_label};

/// All ordering state for one page lifetime.
///
/// Dropping the session cancels any menu load still in flight.
#[derive(Debug)]
pub struct OrderSession<B> {
    backend: B,
    menu: Menu,
    category: CategoryFilter,
    cart: Cart,
    customer: CustomerDetails,
    checkout: Checkout,
    cancel: CancellationToken,
}

impl<B: Backend> OrderSession<B> {
    /// Start an empty session. Call [`load_menu`](Self::load_menu) next.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            menu: Menu::default(),
            category: CategoryFilter::All,
            cart: Cart::new(),
            customer: CustomerDetails::default(),
            checkout: Checkout::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Token that aborts menu loading. Once cancelled, later loads do
    /// nothing.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// Fetch the menu, seeding the backend first if the catalog is empty.
    ///
    /// Returns `true` if a menu was applied. Failures are logged and leave
    /// the current menu as it was; a cancelled load writes nothing.
    #[instrument(skip(self))]
    pub async fn load_menu(&mut self) -> bool {
        let Some(result) = MenuLoader::new(&self.backend, self.cancel.clone())
            .load()
            .await
        else {
            return false;
        };

        match result {
            Ok(menu) => {
                info!(items = menu.len(), "Menu ready");
                self.menu = menu;
                if !self.menu.offers(&self.category) {
                    self.category = CategoryFilter::All;
                }
                true
            }
            Err(e) => {
                log_load_failure(&e);
                false
            }
        }
    }

    pub const fn menu(&self) -> &Menu {
        &self.menu
    }

    /// `All` followed by each distinct category in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryFilter> {
        self.menu.categories()
    }

    pub const fn selected_category(&self) -> &CategoryFilter {
        &self.category
    }

    /// Change the category filter.
    ///
    /// A category the menu does not offer resets the selection to `All`.
    pub fn select_category(&mut self, filter: CategoryFilter) -> &CategoryFilter {
        if self.menu.offers(&filter) {
            self.category = filter;
        } else {
            debug!(category = %filter, "Unknown category, showing all");
            self.category = CategoryFilter::All;
        }
        &self.category
    }

    /// The menu filtered by the current selection.
    #[must_use]
    pub fn menu_view(&self) -> MenuView {
        MenuView::from_items(&self.menu.filtered(&self.category))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one of the menu item `id` to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownItem`] if `id` is not on the menu.
    pub fn add_to_cart(&mut self, id: &MenuItemId) -> Result<(), SessionError> {
        let item = self
            .menu
            .get(id)
            .ok_or_else(|| SessionError::UnknownItem(id.clone()))?;
        self.cart.add(item);
        Ok(())
    }

    /// Set a line's quantity, clamped to at least 1. Returns whether a line
    /// matched.
    pub fn set_quantity(&mut self, id: &MenuItemId, quantity: i64) -> bool {
        self.cart.set_quantity(id, quantity)
    }

    pub fn increment(&mut self, id: &MenuItemId) -> bool {
        self.cart.increment(id)
    }

    pub fn decrement(&mut self, id: &MenuItemId) -> bool {
        self.cart.decrement(id)
    }

    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        self.cart.totals()
    }

    // =========================================================================
    // Customer
    // =========================================================================

    pub fn set_customer_field(&mut self, field: CustomerField, value: impl Into<String>) {
        self.customer.set_field(field, value);
    }

    pub const fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    #[must_use]
    pub const fn checkout_state(&self) -> CheckoutState {
        self.checkout.state()
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.checkout.is_submitting()
    }

    /// Validate, submit the order and apply the result.
    ///
    /// On success the cart is cleared. On any failure the cart and customer
    /// details are left as they were.
    ///
    /// If this future is dropped before it completes the session stays
    /// `Submitting`; call [`abandon_checkout`](Self::abandon_checkout).
    ///
    /// # Errors
    ///
    /// Returns a validation error without contacting the backend, or the
    /// backend's failure mapped to [`CheckoutError`].
    #[instrument(skip(self), fields(request_id))]
    pub async fn checkout(&mut self) -> Result<CheckoutOutcome, CheckoutError> {
        let pending = self.begin_checkout()?;
        Span::current().record("request_id", pending.request_id.as_str());

        let result = self
            .backend
            .create_order(&pending.request, &pending.request_id)
            .await;
        self.complete_checkout(pending, result)
    }

    /// First half of [`checkout`](Self::checkout) for event-driven front
    /// ends. Send the returned order, then call
    /// [`complete_checkout`](Self::complete_checkout).
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InProgress`] while another checkout is in
    /// flight, or a validation error.
    pub fn begin_checkout(&mut self) -> Result<PendingOrder, CheckoutError> {
        self.checkout
            .begin(&self.cart, &self.customer)
            .inspect_err(|e| debug!(error = %e, "Checkout not started"))
    }

    /// Second half of [`checkout`](Self::checkout).
    ///
    /// # Errors
    ///
    /// Returns the backend's failure mapped to [`CheckoutError`].
    pub fn complete_checkout(
        &mut self,
        pending: PendingOrder,
        result: Result<OrderConfirmation, BackendError>,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        self.checkout.finish(pending, result, &mut self.cart)
    }

    /// Return to `Idle` without applying any result.
    pub fn abandon_checkout(&mut self) {
        if self.checkout.is_submitting() {
            debug!("Checkout abandoned");
        }
        self.checkout.reset();
    }

    // =========================================================================
    // Views
    // =========================================================================

    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::from(&self.cart)
    }

    /// Everything needed to render the page.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.checkout.state();
        SessionSnapshot {
            categories: category_labels(&self.categories()),
            selected_category: self.category.to_string(),
            menu: self.menu_view(),
            cart: self.cart_view(),
            customer: self.customer.clone(),
            checkout_state: state,
            checkout_label: checkout_label(state),
        }
    }
}

impl<B> Drop for OrderSession<B> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use reqwest::StatusCode;
    use rust_decimal::Decimal;
    use tokio::sync::Notify;

    use super::*;
    use crate::testing::{FakeBackend, OrderReply, dish};

    fn sample_menu() -> Vec<blue_flame_core::MenuItem> {
        vec![
            dish("1", "Burgers", 1000),
            dish("2", "Sides", 333),
            dish("3", "Burgers", 1450),
        ]
    }

    async fn loaded_session() -> OrderSession<FakeBackend> {
        let mut session = OrderSession::new(FakeBackend::with_menu(sample_menu()));
        assert!(session.load_menu().await);
        session
    }

    fn fill_customer(session: &mut OrderSession<FakeBackend>) {
        session.set_customer_field(CustomerField::Name, "Ada");
        session.set_customer_field(CustomerField::Email, "ada@example.com");
        session.set_customer_field(CustomerField::Address, "1 Flame St");
    }

    fn id(raw: &str) -> MenuItemId {
        MenuItemId::new(raw)
    }

    #[tokio::test]
    async fn test_categories_and_filtering() {
        let mut session = loaded_session().await;

        let labels: Vec<String> = session.categories().iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["All", "Burgers", "Sides"]);

        session.select_category(CategoryFilter::from_label("Burgers"));
        let MenuView::Items(cards) = session.menu_view() else {
            panic!("expected items");
        };
        let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[tokio::test]
    async fn test_unknown_category_resets_to_all() {
        let mut session = loaded_session().await;
        session.select_category(CategoryFilter::from_label("Sides"));

        let selected = session.select_category(CategoryFilter::from_label("Desserts"));
        assert_eq!(*selected, CategoryFilter::All);
    }

    #[tokio::test]
    async fn test_menu_view_loading_before_load() {
        let session = OrderSession::new(FakeBackend::with_menu(sample_menu()));
        assert!(session.menu_view().is_loading());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_loading_state() {
        let backend = FakeBackend::with_menu(sample_menu());
        backend.fail_fetch(StatusCode::BAD_GATEWAY);
        let mut session = OrderSession::new(backend);

        assert!(!session.load_menu().await);
        assert!(session.menu().is_empty());
        assert!(session.menu_view().is_loading());
        assert_eq!(session.backend().calls().seeds, 0);
    }

    #[tokio::test]
    async fn test_cancelled_reload_leaves_menu_untouched() {
        let mut session = loaded_session().await;
        let before = session.menu().clone();

        session.backend().hold_fetches(Arc::new(Notify::new()));
        let token = session.cancellation_token();
        let (applied, ()) = tokio::join!(session.load_menu(), async {
            tokio::task::yield_now().await;
            token.cancel();
        });

        assert!(!applied);
        assert_eq!(*session.menu(), before);
        assert_eq!(session.backend().calls().fetches, 2);
    }

    #[tokio::test]
    async fn test_add_unknown_item_is_rejected() {
        let mut session = loaded_session().await;
        let err = session.add_to_cart(&id("99")).unwrap_err();

        assert!(matches!(err, SessionError::UnknownItem(ref missing) if *missing == id("99")));
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_quantity_edits_clamp_to_one() {
        let mut session = loaded_session().await;
        session.add_to_cart(&id("1")).unwrap();
        session.add_to_cart(&id("1")).unwrap();

        assert!(session.set_quantity(&id("1"), 0));
        assert_eq!(session.cart().line(&id("1")).unwrap().quantity.get(), 1);
        assert!(session.decrement(&id("1")));
        assert_eq!(session.cart().line(&id("1")).unwrap().quantity.get(), 1);
        assert!(session.increment(&id("1")));
        assert_eq!(session.cart().line(&id("1")).unwrap().quantity.get(), 2);
        assert!(!session.set_quantity(&id("2"), 5));
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_sends_nothing() {
        let mut session = loaded_session().await;
        fill_customer(&mut session);

        let err = session.checkout().await.unwrap_err();
        assert_eq!(err.user_message(), "Add some items first");
        assert_eq!(session.backend().calls().orders, 0);
    }

    #[tokio::test]
    async fn test_checkout_with_empty_email_sends_nothing() {
        let mut session = loaded_session().await;
        fill_customer(&mut session);
        session.set_customer_field(CustomerField::Email, "");
        session.add_to_cart(&id("1")).unwrap();

        let err = session.checkout().await.unwrap_err();
        assert_eq!(err.user_message(), "Enter your details");
        assert_eq!(session.backend().calls().orders, 0);
        assert_eq!(session.cart().lines().len(), 1);
    }

    #[tokio::test]
    async fn test_successful_checkout_clears_cart_keeps_details() {
        let mut session = loaded_session().await;
        fill_customer(&mut session);
        session.backend().reply_to_orders(OrderReply::Accept(Decimal::new(2520, 2)));
        session.add_to_cart(&id("1")).unwrap();
        session.add_to_cart(&id("1")).unwrap();
        session.add_to_cart(&id("2")).unwrap();

        let outcome = session.checkout().await.unwrap();

        assert_eq!(outcome.user_message(), "Order placed! Total $25.20");
        assert!(session.cart().is_empty());
        assert_eq!(session.customer().name, "Ada");
        assert_eq!(session.checkout_state(), CheckoutState::Idle);

        let orders = session.backend().orders();
        let (request, request_id) = orders.first().unwrap();
        assert_eq!(request.customer_email, "ada@example.com");
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items.first().unwrap().quantity, 2);
        assert_eq!(*request_id, outcome.request_id);
    }

    #[tokio::test]
    async fn test_rejected_checkout_keeps_cart_and_details() {
        let mut session = loaded_session().await;
        fill_customer(&mut session);
        session.backend().reply_to_orders(OrderReply::Reject(
            StatusCode::BAD_REQUEST,
            Some("Item 1 unavailable".into()),
        ));
        session.add_to_cart(&id("1")).unwrap();
        let cart_before = session.cart().clone();

        let err = session.checkout().await.unwrap_err();

        assert_eq!(err.user_message(), "Failed to place order: Item 1 unavailable");
        assert_eq!(*session.cart(), cart_before);
        assert_eq!(session.customer().address, "1 Flame St");
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn test_network_failure_keeps_cart() {
        let mut session = loaded_session().await;
        fill_customer(&mut session);
        session.backend().reply_to_orders(OrderReply::Transport);
        session.add_to_cart(&id("2")).unwrap();

        let err = session.checkout().await.unwrap_err();
        assert_eq!(err.user_message(), "Network error placing order");
        assert_eq!(session.cart().lines().len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_confirmation_keeps_cart() {
        let mut session = loaded_session().await;
        fill_customer(&mut session);
        session.backend().reply_to_orders(OrderReply::Malformed);
        session.add_to_cart(&id("2")).unwrap();

        let err = session.checkout().await.unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidResponse(_)));
        assert_eq!(session.cart().lines().len(), 1);
    }

    #[tokio::test]
    async fn test_begin_while_submitting_sends_nothing() {
        let mut session = loaded_session().await;
        fill_customer(&mut session);
        session.add_to_cart(&id("1")).unwrap();

        let pending = session.begin_checkout().unwrap();
        assert_eq!(session.snapshot().checkout_label, "Placing Order...");

        let err = session.checkout().await.unwrap_err();
        assert!(matches!(err, CheckoutError::InProgress));
        assert_eq!(session.backend().calls().orders, 0);

        let result = session
            .backend()
            .create_order(&pending.request, &pending.request_id)
            .await;
        session.complete_checkout(pending, result).unwrap();
        assert_eq!(session.snapshot().checkout_label, "Checkout");
        assert_eq!(session.backend().calls().orders, 1);
    }

    #[tokio::test]
    async fn test_abandon_returns_to_idle() {
        let mut session = loaded_session().await;
        fill_customer(&mut session);
        session.add_to_cart(&id("1")).unwrap();

        let _pending = session.begin_checkout().unwrap();
        session.abandon_checkout();
        assert_eq!(session.checkout_state(), CheckoutState::Idle);
        assert_eq!(session.cart().lines().len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_reflects_state() {
        let mut session = loaded_session().await;
        session.add_to_cart(&id("2")).unwrap();
        session.select_category(CategoryFilter::from_label("Sides"));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.categories, ["All", "Burgers", "Sides"]);
        assert_eq!(snapshot.selected_category, "Sides");
        assert_eq!(snapshot.cart.total, "$3.60");
        assert_eq!(snapshot.cart.item_count, 1);
        assert_eq!(snapshot.checkout_label, "Checkout");
    }

    #[tokio::test]
    async fn test_drop_cancels_token() {
        let session = OrderSession::new(FakeBackend::with_menu(Vec::new()));
        let token = session.cancellation_token();
        drop(session);
        assert!(token.is_cancelled());
    }
}
