//! Wildberries catalog data-URL discovery.
//!
//! The visible catalog page does not embed its own data; client-side code
//! fetches the paginated JSON asynchronously after load. The only stable
//! contract is the data URL itself, so we open the page while observing
//! outgoing requests against the known endpoint patterns and return the
//! first match. Subsequent pages are then fetched from that URL directly.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::error::{ScrapeError, ScrapeResult};
use crate::infrastructure::browser::BrowserEngine;

/// Known data-endpoint shapes: catalog and search, across two CDN tiers.
pub const WB_CATALOG_URL_PATTERNS: [&str; 4] = [
    "*://u-catalog.wb.ru/*/catalog*",
    "*://catalog.wb.ru/*/catalog*",
    "*://u-search.wb.ru/*/search*",
    "*://search.wb.ru/*/search*",
];

pub struct CatalogUrlResolver {
    browser: Arc<dyn BrowserEngine>,
}

impl CatalogUrlResolver {
    pub fn new(browser: Arc<dyn BrowserEngine>) -> Self {
        Self { browser }
    }

    /// Opens `query_url` and returns the URL of the first observed catalog
    /// data request. The page and the subscription are torn down regardless
    /// of outcome; fails with [`ScrapeError::Timeout`] when no matching
    /// request is seen within `timeout`.
    pub async fn resolve(&self, query_url: &str, timeout: Duration) -> ScrapeResult<String> {
        // Subscribe before navigation starts so the first data request
        // cannot be missed.
        let mut observer = self.browser.observe_requests(&WB_CATALOG_URL_PATTERNS).await?;
        let page = self.browser.open_page(query_url).await?;

        let resolved = match tokio::time::timeout(timeout, observer.next_match()).await {
            Ok(Some(url)) => {
                debug!(%url, "observed catalog data request");
                Ok(url)
            }
            Ok(None) => Err(ScrapeError::Browser(
                "request subscription ended before a catalog request was observed".to_string(),
            )),
            Err(_) => Err(ScrapeError::Timeout(timeout.as_millis() as u64)),
        };

        if let Err(err) = self.browser.close_page(page).await {
            warn!(page = page.0, "failed to close browsing context: {err}");
        }

        resolved
    }
}
