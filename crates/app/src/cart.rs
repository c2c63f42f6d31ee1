//! Cart screen presenter.

use std::sync::{Arc, Weak};

use storefront_cart::CartObserver;
use storefront_catalog::Product;
use storefront_core::Money;

use crate::{SharedOrderService, with_orders};

/// Shows the cart and reacts to quantity edits made on screen.
///
/// The cart screen is a `CartObserver`; the presenter refreshes it explicitly
/// after each edit and keeps the last totals it computed.
#[derive(Debug)]
pub struct CartPresenter {
    view: Option<Weak<dyn CartObserver>>,
    orders: SharedOrderService,
    total_price: Money,
    total_products: u64,
}

impl CartPresenter {
    pub fn new(orders: SharedOrderService) -> Self {
        Self {
            view: None,
            orders,
            total_price: Money::ZERO,
            total_products: 0,
        }
    }

    pub fn attach_view(&mut self, view: &Arc<dyn CartObserver>) {
        self.view = Some(Arc::downgrade(view));
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn total_products(&self) -> u64 {
        self.total_products
    }

    pub fn view_will_appear(&mut self) {
        self.fetch_products();
        self.update_cart();
    }

    /// The screen edited one row's quantity.
    ///
    /// `products` is the sequence the screen is showing. The matching entry is
    /// replaced by `changed` (and removed if its count dropped to zero), the
    /// resulting sequence becomes the cart, and the totals are refreshed. An id
    /// the sequence doesn't contain leaves it untouched.
    pub fn product_count_changed(&mut self, products: &mut Vec<Product>, changed: Product) {
        if let Some(index) = products.iter().position(|p| p.id == changed.id) {
            if changed.count == 0 {
                products.remove(index);
            } else {
                products[index] = changed;
            }
        }

        let snapshot = products.clone();
        with_orders(&self.orders, |orders| orders.save(snapshot));
        self.update_cart();
    }

    pub fn fetch_products(&self) {
        let products = with_orders(&self.orders, |orders| orders.fetch());
        if let Some(view) = self.view() {
            view.show_products(&products);
        }
    }

    pub fn fetch_total_count_and_price(&mut self) {
        let totals = with_orders(&self.orders, |orders| orders.totals());
        self.total_price = totals.price;
        self.total_products = totals.count;
    }

    pub fn update_cart(&mut self) {
        self.fetch_total_count_and_price();
        if let Some(view) = self.view() {
            view.show_cart(self.total_price, self.total_products);
        }
    }

    fn view(&self) -> Option<Arc<dyn CartObserver>> {
        self.view.as_ref().and_then(Weak::upgrade)
    }
}
