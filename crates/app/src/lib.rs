//! `storefront-app`
//!
//! **Responsibility:** the application shell around the catalog and cart.
//!
//! This crate provides:
//! - Environment configuration (`StorefrontConfig`)
//! - Headless menu and cart presenters driving view traits
//! - The `storefront` demo binary (feature `http`)
//!
//! Screens themselves live outside this crate; presenters only talk to them
//! through `MenuView` / `CartObserver` and never keep them alive.

use std::sync::{Arc, Mutex};

use storefront_cart::OrderService;

pub mod cart;
pub mod config;
pub mod menu;

pub use cart::CartPresenter;
pub use config::{ConfigError, StorefrontConfig};
pub use menu::{MenuPresenter, MenuView};

/// One cart shared by every screen of the process.
///
/// The mutex is the single-writer discipline: each presenter holds the lock
/// for exactly one cart operation.
pub type SharedOrderService = Arc<Mutex<OrderService>>;

pub fn shared_orders() -> SharedOrderService {
    Arc::new(Mutex::new(OrderService::new()))
}

/// Run `f` against the shared cart.
///
/// A poisoned lock only means another screen panicked mid-operation; every
/// cart operation leaves the store valid, so the state is recovered.
pub fn with_orders<R>(orders: &SharedOrderService, f: impl FnOnce(&mut OrderService) -> R) -> R {
    let mut guard = orders.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("order service lock was poisoned; recovering");
        poisoned.into_inner()
    });
    f(&mut guard)
}
