//! Proxy-fetch through a transient browsing context.
//!
//! Turning a passive tab into an HTTP client: open the URL, wait for the
//! load-complete signal under a hard timeout, read the document text, and
//! close the context on every path - success, timeout and error alike.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::error::{ScrapeError, ScrapeResult};
use crate::infrastructure::browser::{BrowserEngine, PageId};

pub struct PageFetcher {
    browser: Arc<dyn BrowserEngine>,
}

impl PageFetcher {
    pub fn new(browser: Arc<dyn BrowserEngine>) -> Self {
        Self { browser }
    }

    /// Fetches the raw textual payload behind `url`.
    ///
    /// Fails with [`ScrapeError::Navigation`] when the context cannot be
    /// created and [`ScrapeError::Timeout`] when load-complete is not
    /// observed within `timeout`. The context is closed unconditionally.
    pub async fn fetch(&self, url: &str, timeout: Duration) -> ScrapeResult<String> {
        debug!(%url, "opening browsing context");
        let page = self.browser.open_page(url).await?;

        let outcome = self.read_once_loaded(page, timeout).await;

        if let Err(err) = self.browser.close_page(page).await {
            warn!(page = page.0, "failed to close browsing context: {err}");
        }

        outcome
    }

    async fn read_once_loaded(&self, page: PageId, timeout: Duration) -> ScrapeResult<String> {
        match tokio::time::timeout(timeout, self.browser.wait_for_load(page)).await {
            Ok(loaded) => loaded?,
            Err(_) => return Err(ScrapeError::Timeout(timeout.as_millis() as u64)),
        }
        self.browser.document_text(page).await
    }
}
