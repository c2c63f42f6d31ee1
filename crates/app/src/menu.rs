//! Menu screen presenter.

use std::sync::{Arc, Weak};

use storefront_catalog::{CatalogService, Category, FetchHandle, Product};

use crate::{SharedOrderService, with_orders};

/// What the menu screen must be able to display.
///
/// Calls arrive on the UI context.
pub trait MenuView: Send + Sync {
    fn show_products(&self, products: Vec<Product>);

    fn show_categories(&self, categories: Vec<Category>);

    fn navigate_to_detail(&self, product: Product);
}

/// Loads the menu and turns price-button taps into cart additions.
#[derive(Debug)]
pub struct MenuPresenter {
    view: Option<Weak<dyn MenuView>>,
    catalog: CatalogService,
    orders: SharedOrderService,
}

impl MenuPresenter {
    pub fn new(catalog: CatalogService, orders: SharedOrderService) -> Self {
        Self {
            view: None,
            catalog,
            orders,
        }
    }

    pub fn attach_view(&mut self, view: &Arc<dyn MenuView>) {
        self.view = Some(Arc::downgrade(view));
    }

    /// Start loading everything the menu shows.
    ///
    /// The returned handles can be joined to observe failures or cancelled
    /// when the screen goes away.
    pub fn view_did_load(&self) -> Vec<FetchHandle> {
        vec![self.fetch_products(), self.fetch_categories()]
    }

    pub fn fetch_products(&self) -> FetchHandle {
        let view = self.view.clone();
        self.catalog.fetch_products(move |products| {
            if let Some(view) = view.as_ref().and_then(Weak::upgrade) {
                view.show_products(products);
            }
        })
    }

    pub fn fetch_categories(&self) -> FetchHandle {
        let view = self.view.clone();
        self.catalog.fetch_categories(move |categories| {
            if let Some(view) = view.as_ref().and_then(Weak::upgrade) {
                view.show_categories(categories);
            }
        })
    }

    pub fn banner_price_button_tapped(&self, product: Product) {
        self.add_to_cart(product);
    }

    pub fn product_price_button_tapped(&self, product: Product) {
        self.add_to_cart(product);
    }

    pub fn product_cell_selected(&self, product: Product) {
        if let Some(view) = self.view.as_ref().and_then(Weak::upgrade) {
            view.navigate_to_detail(product);
        }
    }

    fn add_to_cart(&self, product: Product) {
        tracing::info!(product_id = %product.id, "adding product to cart");
        with_orders(&self.orders, |orders| orders.add(product));
    }
}
