//! Catalog service: fetch + decode + deliver on the UI context.
//!
//! Two API shapes sit on the same pipeline:
//!
//! - **Callback facets** (`fetch_products`, `fetch_categories`, ...): spawn a task,
//!   deliver the projection on the `UiDispatcher`, never call the completion on
//!   failure. Each returns a `FetchHandle` so callers can cancel or observe the
//!   outcome.
//! - **Async facets** (`products`, `categories`, ...): return
//!   `Result<_, CatalogError>` directly to the awaiting caller.
//!
//! Every facet call performs its own request. `load_catalog` / `snapshot` fetch
//! once and share the decoded catalog across all projections.

use std::sync::Arc;

use chrono::Utc;
use storefront_core::RequestId;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::cancel::CancelToken;
use crate::decoder::decode;
use crate::dispatch::UiDispatcher;
use crate::error::CatalogError;
use crate::model::{CatalogResponse, CatalogSnapshot, Category, Ingredient, Product, SizesAndDough};
use crate::transport::Transport;

/// Catalog endpoint used by the storefront deployment.
pub const DEFAULT_CATALOG_URL: &str = "https://mocki.io/v1/91ef3aa0-da24-41e5-a4e1-effe4c66801b";

/// Which projection of the catalog a request serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Products,
    Categories,
    Ingredients,
    SizesAndDough,
    /// Whole catalog, fetched once for every projection.
    Catalog,
}

impl Facet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Products => "products",
            Facet::Categories => "categories",
            Facet::Ingredients => "ingredients",
            Facet::SizesAndDough => "sizes_and_dough",
            Facet::Catalog => "catalog",
        }
    }
}

impl core::fmt::Display for Facet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a callback fetch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The completion was handed to the UI dispatcher.
    Delivered,
    /// Transport or decode failure; the completion was never called.
    Failed(CatalogError),
    /// `FetchHandle::cancel` won the race; the completion was never called.
    Cancelled,
    /// The UI context was gone; the result was discarded.
    Dropped,
}

#[derive(Debug)]
enum Task {
    Running(JoinHandle<FetchOutcome>),
    Finished(FetchOutcome),
}

/// Handle to one in-flight callback fetch.
#[derive(Debug)]
pub struct FetchHandle {
    request_id: RequestId,
    facet: Facet,
    cancel: CancelToken,
    task: Task,
}

impl FetchHandle {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn facet(&self) -> Facet {
        self.facet
    }

    /// Stop waiting for the transport and drop the result.
    ///
    /// Has no effect once the completion has been dispatched.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        match &self.task {
            Task::Running(task) => task.is_finished(),
            Task::Finished(_) => true,
        }
    }

    /// Wait for the fetch to end.
    pub async fn join(self) -> FetchOutcome {
        let task = match self.task {
            Task::Running(task) => task,
            Task::Finished(outcome) => return outcome,
        };
        match task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => FetchOutcome::Cancelled,
        }
    }
}

/// Orchestrates catalog retrieval. Holds no catalog state between calls.
#[derive(Clone)]
pub struct CatalogService {
    transport: Arc<dyn Transport>,
    dispatcher: Arc<dyn UiDispatcher>,
    url: Arc<str>,
}

impl core::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatalogService")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    /// Service against `DEFAULT_CATALOG_URL`.
    pub fn new(transport: Arc<dyn Transport>, dispatcher: Arc<dyn UiDispatcher>) -> Self {
        Self::with_url(transport, dispatcher, DEFAULT_CATALOG_URL)
    }

    pub fn with_url(
        transport: Arc<dyn Transport>,
        dispatcher: Arc<dyn UiDispatcher>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            dispatcher,
            url: Arc::from(url.into()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    // --- callback facets -------------------------------------------------

    /// Fetch the catalog and deliver its products on the UI context.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn fetch_products<F>(&self, completion: F) -> FetchHandle
    where
        F: FnOnce(Vec<Product>) + Send + 'static,
    {
        self.spawn_fetch(Facet::Products, |r| r.products, completion)
    }

    pub fn fetch_categories<F>(&self, completion: F) -> FetchHandle
    where
        F: FnOnce(Vec<Category>) + Send + 'static,
    {
        self.spawn_fetch(Facet::Categories, |r| r.categories, completion)
    }

    pub fn fetch_ingredients<F>(&self, completion: F) -> FetchHandle
    where
        F: FnOnce(Vec<Ingredient>) + Send + 'static,
    {
        self.spawn_fetch(Facet::Ingredients, |r| r.ingredients, completion)
    }

    /// Delivers `(sizes, dough)`; either is `None` when the payload omits it.
    pub fn fetch_sizes_and_dough<F>(&self, completion: F) -> FetchHandle
    where
        F: FnOnce(Option<Vec<String>>, Option<Vec<String>>) + Send + 'static,
    {
        self.spawn_fetch(
            Facet::SizesAndDough,
            |r| (r.sizes, r.dough),
            move |(sizes, dough): (Option<Vec<String>>, Option<Vec<String>>)| completion(sizes, dough),
        )
    }

    /// One request for every projection; delivers a shared snapshot.
    pub fn load_catalog<F>(&self, completion: F) -> FetchHandle
    where
        F: FnOnce(CatalogSnapshot) + Send + 'static,
    {
        self.spawn_fetch(
            Facet::Catalog,
            |r| CatalogSnapshot::new(r, Utc::now()),
            completion,
        )
    }

    // --- async facets ----------------------------------------------------

    pub async fn catalog(&self) -> Result<CatalogResponse, CatalogError> {
        self.fetch_logged(Facet::Catalog).await
    }

    pub async fn snapshot(&self) -> Result<CatalogSnapshot, CatalogError> {
        let response = self.catalog().await?;
        Ok(CatalogSnapshot::new(response, Utc::now()))
    }

    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.fetch_logged(Facet::Products).await?.products)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.fetch_logged(Facet::Categories).await?.categories)
    }

    pub async fn ingredients(&self) -> Result<Vec<Ingredient>, CatalogError> {
        Ok(self.fetch_logged(Facet::Ingredients).await?.ingredients)
    }

    pub async fn sizes_and_dough(&self) -> Result<SizesAndDough, CatalogError> {
        let response = self.fetch_logged(Facet::SizesAndDough).await?;
        Ok(SizesAndDough {
            sizes: response.sizes,
            dough: response.dough,
        })
    }

    // --- pipeline --------------------------------------------------------

    async fn fetch_logged(&self, facet: Facet) -> Result<CatalogResponse, CatalogError> {
        let request_id = RequestId::new();
        self.fetch_and_decode(request_id, facet)
            .await
            .inspect_err(|err| {
                tracing::warn!(
                    request_id = %request_id,
                    facet = %facet,
                    url = %self.url,
                    error = %err,
                    "catalog fetch failed"
                );
            })
    }

    /// Transport, then decode. Decode never starts unless the transport succeeded.
    async fn fetch_and_decode(
        &self,
        request_id: RequestId,
        facet: Facet,
    ) -> Result<CatalogResponse, CatalogError> {
        tracing::debug!(request_id = %request_id, facet = %facet, url = %self.url, "requesting catalog");

        let bytes = self.transport.fetch(&self.url).await?;
        let response = decode(&bytes)?;

        tracing::debug!(
            request_id = %request_id,
            facet = %facet,
            bytes = bytes.len(),
            products = response.products.len(),
            categories = response.categories.len(),
            ingredients = response.ingredients.len(),
            "catalog decoded"
        );

        Ok(response)
    }

    fn spawn_fetch<V, P, F>(&self, facet: Facet, project: P, completion: F) -> FetchHandle
    where
        V: Send + 'static,
        P: FnOnce(CatalogResponse) -> V + Send + 'static,
        F: FnOnce(V) + Send + 'static,
    {
        let request_id = RequestId::new();
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let service = self.clone();

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!(
                    request_id = %request_id,
                    facet = %facet,
                    error = %err,
                    "no async runtime to run catalog fetch; completion will not be called"
                );
                return FetchHandle {
                    request_id,
                    facet,
                    cancel,
                    task: Task::Finished(FetchOutcome::Failed(CatalogError::NoRuntime)),
                };
            }
        };

        let task = runtime.spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => Err(CatalogError::Cancelled),
                result = service.fetch_and_decode(request_id, facet) => result,
            };

            match result {
                Ok(_) if token.is_cancelled() => {
                    tracing::debug!(request_id = %request_id, facet = %facet, "catalog fetch cancelled after decode");
                    FetchOutcome::Cancelled
                }
                Ok(response) => {
                    let value = project(response);
                    if service.dispatcher.dispatch(Box::new(move || completion(value))) {
                        FetchOutcome::Delivered
                    } else {
                        tracing::warn!(request_id = %request_id, facet = %facet, "UI context gone; catalog result dropped");
                        FetchOutcome::Dropped
                    }
                }
                Err(CatalogError::Cancelled) => {
                    tracing::debug!(request_id = %request_id, facet = %facet, "catalog fetch cancelled");
                    FetchOutcome::Cancelled
                }
                Err(err) => {
                    tracing::error!(
                        request_id = %request_id,
                        facet = %facet,
                        url = %service.url,
                        error = %err,
                        "catalog fetch failed; completion will not be called"
                    );
                    FetchOutcome::Failed(err)
                }
            }
        });

        FetchHandle {
            request_id,
            facet,
            cancel,
            task: Task::Running(task),
        }
    }
}
