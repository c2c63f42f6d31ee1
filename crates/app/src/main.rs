//! `storefront` demo: load the menu over HTTP, add a product, print the cart.
//!
//! The main thread plays the UI thread: it drains the main queue that catalog
//! completions are delivered to.

#[cfg(feature = "http")]
use std::sync::{Arc, Mutex};
#[cfg(feature = "http")]
use std::time::Duration;

#[cfg(feature = "http")]
use anyhow::{Context, anyhow};
#[cfg(feature = "http")]
use storefront_app::{CartPresenter, MenuPresenter, MenuView, StorefrontConfig, shared_orders};
#[cfg(feature = "http")]
use storefront_cart::CartObserver;
#[cfg(feature = "http")]
use storefront_catalog::{CatalogService, Category, FetchOutcome, HttpTransport, Product, main_queue};
#[cfg(feature = "http")]
use storefront_core::{DomainResult, Money, ProductId};

/// Prints whatever the presenters show.
#[cfg(feature = "http")]
#[derive(Debug, Default)]
struct ConsoleView {
    products: Mutex<Vec<Product>>,
}

#[cfg(feature = "http")]
impl MenuView for ConsoleView {
    fn show_products(&self, products: Vec<Product>) {
        println!("Menu ({} products):", products.len());
        for p in &products {
            println!("  [{}] {:<30} {:>10}", p.id, p.name, p.price.to_string());
        }
        if let Ok(mut shown) = self.products.lock() {
            *shown = products;
        }
    }

    fn show_categories(&self, categories: Vec<Category>) {
        let titles: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
        println!("Categories: {}", titles.join(", "));
    }

    fn navigate_to_detail(&self, product: Product) {
        println!("-> detail for {}", product.name);
    }
}

#[cfg(feature = "http")]
impl CartObserver for ConsoleView {
    fn show_cart(&self, total_price: Money, total_count: u64) {
        println!("Cart: {total_count} item(s), total {total_price}");
    }

    fn show_products(&self, products: &[Product]) {
        for p in products {
            println!("  {} x{} = {}", p.name, p.count, p.line_total());
        }
    }
}

#[cfg(feature = "http")]
fn requested_product() -> DomainResult<Option<ProductId>> {
    std::env::args().nth(1).map(|arg| arg.parse()).transpose()
}

#[cfg(feature = "http")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = StorefrontConfig::from_env().context("invalid storefront configuration")?;
    storefront_observability::init_with(config.log_format);

    let requested = requested_product().context("invalid product id argument")?;

    let transport =
        HttpTransport::new(config.request_timeout).context("failed to build HTTP transport")?;
    let (queue, main_loop) = main_queue();
    let catalog = CatalogService::with_url(Arc::new(transport), Arc::new(queue), config.catalog_url.clone());
    tracing::info!(url = %config.catalog_url, "loading menu");

    let orders = shared_orders();
    let console = Arc::new(ConsoleView::default());

    let mut menu = MenuPresenter::new(catalog, orders.clone());
    let menu_view: Arc<dyn MenuView> = console.clone();
    menu.attach_view(&menu_view);

    for handle in menu.view_did_load() {
        let facet = handle.facet();
        match handle.join().await {
            FetchOutcome::Delivered => {}
            FetchOutcome::Failed(err) => {
                return Err(err).with_context(|| format!("failed to load {facet}"));
            }
            FetchOutcome::Cancelled => return Err(anyhow!("loading {facet} was cancelled")),
            FetchOutcome::Dropped => return Err(anyhow!("main loop closed while loading {facet}")),
        }
    }
    main_loop.run_for(2, Duration::from_secs(1));

    let shown = console
        .products
        .lock()
        .map_err(|_| anyhow!("console view lock poisoned"))?
        .clone();
    let product = match requested {
        Some(id) => shown
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .with_context(|| format!("product {id} is not on the menu"))?,
        None => match shown.first() {
            Some(first) => first.clone(),
            None => {
                println!("Menu is empty; nothing to add.");
                return Ok(());
            }
        },
    };

    menu.product_price_button_tapped(product);

    let mut cart = CartPresenter::new(orders);
    let cart_view: Arc<dyn CartObserver> = console;
    cart.attach_view(&cart_view);
    cart.view_will_appear();

    Ok(())
}

#[cfg(not(feature = "http"))]
fn main() {
    eprintln!("This binary requires the 'http' feature to be enabled.");
    eprintln!("Build with: cargo build --features http");
    std::process::exit(1);
}
