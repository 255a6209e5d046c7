//! Abstract browser-automation capability.
//!
//! The engine never talks to a real browser directly; it consumes this
//! narrow trait so that pagination and resolver logic can be exercised
//! against canned payloads. A production implementation maps these calls
//! onto the host's tab, scripting and network-interception APIs; pages are
//! always opened passively (non-focused).

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::error::ScrapeResult;

/// Opaque handle to one open browsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(pub u64);

/// Subscription to outgoing network requests matching a set of URL
/// patterns. Dropping the observer deregisters the subscription.
#[derive(Debug)]
pub struct RequestObserver {
    rx: mpsc::UnboundedReceiver<String>,
}

impl RequestObserver {
    pub fn new(rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self { rx }
    }

    /// Resolves with the URL of the next matching observed request, or
    /// `None` once the host ends the subscription.
    pub async fn next_match(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

/// The capability required from the host browser.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Opens `url` in a new passive browsing context. Resolves once the
    /// context exists; loading continues in the background.
    async fn open_page(&self, url: &str) -> ScrapeResult<PageId>;

    /// Resolves when the page reports its load-complete transition.
    /// Callers bound this with a timeout; the future itself may pend
    /// indefinitely.
    async fn wait_for_load(&self, page: PageId) -> ScrapeResult<()>;

    /// Reads the full textual content of the page's document.
    async fn document_text(&self, page: PageId) -> ScrapeResult<String>;

    /// Closes the browsing context. Safe to call on every exit path.
    async fn close_page(&self, page: PageId) -> ScrapeResult<()>;

    /// Subscribes to outgoing requests whose URL matches any of the given
    /// match patterns.
    async fn observe_requests(&self, patterns: &[&str]) -> ScrapeResult<RequestObserver>;
}
