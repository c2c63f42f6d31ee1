//! Transport port: one GET, raw bytes back.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

/// Performs a single HTTP GET.
///
/// Implementations may use background threads internally; callers only see
/// the awaited result. Timeouts are the implementation's concern.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        (**self).fetch(url).await
    }
}

#[derive(Debug, Clone)]
struct Scripted {
    result: Result<Vec<u8>, TransportError>,
    delay: Duration,
}

#[derive(Debug, Default)]
struct Route {
    queue: VecDeque<Scripted>,
    fallback: Option<Scripted>,
}

/// In-memory transport for tests/dev.
///
/// - Responses are scripted per URL and served FIFO
/// - `respond_always` sets a response served once the queue is empty
/// - Optional per-response delay to shape concurrent interleavings
/// - Counts every call
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    routes: Mutex<HashMap<String, Route>>,
    calls: AtomicUsize,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one successful response for `url`.
    pub fn push_ok(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.push(url, Ok(body.into()), Duration::ZERO);
    }

    /// Queue one successful response for `url`, served after `delay`.
    pub fn push_ok_delayed(&self, url: &str, body: impl Into<Vec<u8>>, delay: Duration) {
        self.push(url, Ok(body.into()), delay);
    }

    /// Queue one failure for `url`.
    pub fn push_err(&self, url: &str, err: TransportError) {
        self.push(url, Err(err), Duration::ZERO);
    }

    /// Serve `body` for `url` whenever nothing is queued.
    pub fn respond_always(&self, url: &str, body: impl Into<Vec<u8>>) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.entry(url.to_string()).or_default().fallback = Some(Scripted {
                result: Ok(body.into()),
                delay: Duration::ZERO,
            });
        }
    }

    /// Number of `fetch` calls served so far (including failures).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push(&self, url: &str, result: Result<Vec<u8>, TransportError>, delay: Duration) {
        // A poisoned lock means a test already panicked; nothing to script.
        if let Ok(mut routes) = self.routes.lock() {
            routes
                .entry(url.to_string())
                .or_default()
                .queue
                .push_back(Scripted { result, delay });
        }
    }

    fn next(&self, url: &str) -> Option<Scripted> {
        let mut routes = self.routes.lock().ok()?;
        let route = routes.get_mut(url)?;
        route.queue.pop_front().or_else(|| route.fallback.clone())
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let scripted = self
            .next(url)
            .ok_or_else(|| TransportError::Unavailable(url.to_string()))?;

        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }

        scripted.result
    }
}

#[cfg(feature = "http")]
pub mod http {
    //! `reqwest`-backed transport.

    use std::time::Duration;

    use async_trait::async_trait;

    use super::Transport;
    use crate::error::TransportError;

    /// HTTP GET over `reqwest`.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: reqwest::Client,
    }

    impl HttpTransport {
        pub fn new(timeout: Duration) -> Result<Self, TransportError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| TransportError::Network(e.to_string()))?;
            Ok(Self { client })
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
            let resp = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(TransportError::Status(
                    status.as_u16(),
                    resp.text().await.unwrap_or_default(),
                ));
            }

            let body = resp
                .bytes()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            Ok(body.to_vec())
        }
    }
}
