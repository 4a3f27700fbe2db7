//! In-memory [`Backend`] for unit tests.

use std::sync::{Arc, Mutex, MutexGuard};

use blue_flame_core::{MenuItem, MenuItemId, OrderConfirmation, OrderRequest, Price};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use tokio::sync::Notify;

use crate::backend::{Backend, BackendError};

/// Build a menu item with a generated name.
pub fn dish(id: &str, category: &str, cents: i64) -> MenuItem {
    MenuItem {
        id: MenuItemId::new(id),
        name: format!("Dish {id}"),
        description: format!("{category} special"),
        price: Price::from_cents(cents).unwrap_or_default(),
        category: category.to_owned(),
        image: None,
    }
}

/// How the fake answers `create_order`.
#[derive(Debug, Clone)]
pub enum OrderReply {
    Accept(Decimal),
    Reject(StatusCode, Option<String>),
    Transport,
    Malformed,
}

/// Request counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calls {
    pub fetches: usize,
    pub seeds: usize,
    pub orders: usize,
}

#[derive(Debug)]
struct State {
    menu: Vec<MenuItem>,
    seeded_menu: Option<Vec<MenuItem>>,
    fetch_failure: Option<StatusCode>,
    seed_unreachable: bool,
    fetch_gate: Option<Arc<Notify>>,
    order_reply: OrderReply,
    orders: Vec<(OrderRequest, String)>,
    calls: Calls,
}

/// Scriptable backend that records every request.
#[derive(Debug)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    /// A backend whose catalog is `menu` whether or not it is seeded.
    pub fn with_menu(menu: Vec<MenuItem>) -> Self {
        Self::build(menu, None)
    }

    /// A backend that serves an empty catalog until seeded, then `menu`.
    pub fn empty_until_seeded(menu: Vec<MenuItem>) -> Self {
        Self::build(Vec::new(), Some(menu))
    }

    fn build(menu: Vec<MenuItem>, seeded_menu: Option<Vec<MenuItem>>) -> Self {
        Self {
            state: Mutex::new(State {
                menu,
                seeded_menu,
                fetch_failure: None,
                seed_unreachable: false,
                fetch_gate: None,
                order_reply: OrderReply::Accept(Decimal::ZERO),
                orders: Vec::new(),
                calls: Calls::default(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn fail_fetch(&self, status: StatusCode) {
        self.state().fetch_failure = Some(status);
    }

    /// Make the seed request fail before any answer arrives.
    pub fn drop_seed(&self) {
        self.state().seed_unreachable = true;
    }

    /// Park every fetch until `gate` is notified.
    pub fn hold_fetches(&self, gate: Arc<Notify>) {
        self.state().fetch_gate = Some(gate);
    }

    pub fn reply_to_orders(&self, reply: OrderReply) {
        self.state().order_reply = reply;
    }

    pub fn calls(&self) -> Calls {
        self.state().calls
    }

    /// Every order received, with its request id.
    pub fn orders(&self) -> Vec<(OrderRequest, String)> {
        self.state().orders.clone()
    }
}

impl Backend for FakeBackend {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, BackendError> {
        let gate = {
            let mut state = self.state();
            state.calls.fetches += 1;
            state.fetch_gate.clone()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let state = self.state();
        match state.fetch_failure {
            Some(status) => Err(BackendError::Status {
                status,
                detail: None,
            }),
            None => Ok(state.menu.clone()),
        }
    }

    async fn seed_menu(&self) -> Result<(), BackendError> {
        let mut state = self.state();
        state.calls.seeds += 1;
        if state.seed_unreachable {
            return Err(BackendError::Transport("connection refused".into()));
        }
        if let Some(menu) = state.seeded_menu.take() {
            state.menu = menu;
        }
        Ok(())
    }

    async fn create_order(
        &self,
        order: &OrderRequest,
        request_id: &str,
    ) -> Result<OrderConfirmation, BackendError> {
        let mut state = self.state();
        state.calls.orders += 1;
        state.orders.push((order.clone(), request_id.to_owned()));

        match state.order_reply.clone() {
            OrderReply::Accept(total) => Ok(OrderConfirmation::with_total(total)),
            OrderReply::Reject(status, detail) => Err(BackendError::Status { status, detail }),
            OrderReply::Transport => Err(BackendError::Transport("connection refused".into())),
            OrderReply::Malformed => Err(BackendError::Decode("expected value at line 1 column 1".into())),
        }
    }
}
