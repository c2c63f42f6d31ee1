//! Order service: the cart façade used by presentation code.

use std::sync::{Arc, Weak};

use storefront_catalog::Product;
use storefront_core::Money;

use crate::store::{CartStore, CartTotals};

/// Receives cart-changed notifications.
///
/// Called synchronously, on the mutating thread, after every mutation.
pub trait CartObserver: Send + Sync {
    fn show_cart(&self, total_price: Money, total_count: u64);

    fn show_products(&self, products: &[Product]);
}

/// Façade over `CartStore`.
///
/// Holds its observer through a `Weak` reference: the service never keeps a
/// screen alive, and notifications are skipped when no observer is attached or
/// the observer has been dropped.
#[derive(Default)]
pub struct OrderService {
    store: CartStore,
    observer: Option<Weak<dyn CartObserver>>,
}

impl core::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrderService")
            .field("store", &self.store)
            .field("observer_attached", &self.observer().is_some())
            .finish()
    }
}

impl OrderService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: CartStore) -> Self {
        Self {
            store,
            observer: None,
        }
    }

    /// Attach the observer notified after each mutation (replaces any previous one).
    pub fn attach(&mut self, observer: &Arc<dyn CartObserver>) {
        self.observer = Some(Arc::downgrade(observer));
    }

    pub fn detach(&mut self) {
        self.observer = None;
    }

    /// Merge `product` into the cart.
    pub fn add(&mut self, product: Product) {
        self.store.add(product);
        self.notify();
    }

    /// Patch one entry (remove it when its count drops to zero).
    pub fn apply_quantity_change(&mut self, changed: Product) {
        self.store.apply_quantity_change(changed);
        self.notify();
    }

    /// Persist a sequence computed by the caller as the new cart state.
    ///
    /// Replaces prior contents; nothing is merged.
    pub fn save(&mut self, products: Vec<Product>) {
        self.store.replace_all(products);
        self.notify();
    }

    pub fn fetch(&self) -> Vec<Product> {
        self.store.fetch()
    }

    pub fn calculate_total_price(&self) -> Money {
        self.store.total_price()
    }

    pub fn calculate_total_count(&self) -> u64 {
        self.store.total_count()
    }

    pub fn totals(&self) -> CartTotals {
        self.store.totals()
    }

    pub fn store(&self) -> &CartStore {
        &self.store
    }

    fn observer(&self) -> Option<Arc<dyn CartObserver>> {
        self.observer.as_ref().and_then(Weak::upgrade)
    }

    fn notify(&self) {
        let Some(observer) = self.observer() else {
            return;
        };
        let totals = self.store.totals();
        tracing::debug!(total_price = %totals.price, total_count = totals.count, "cart changed");
        observer.show_products(self.store.entries());
        observer.show_cart(totals.price, totals.count);
    }
}
