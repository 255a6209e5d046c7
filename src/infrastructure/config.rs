//! Crawler configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the ingestion engine. Deserializable so embedders can load
/// it from their own settings store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Budget for a page's load-complete signal, in milliseconds.
    pub page_load_timeout_ms: u64,
    /// Budget for observing the Wildberries data request, in milliseconds.
    pub resolver_timeout_ms: u64,
    /// Hard safety ceiling on accumulated items for numeric pagination.
    pub item_ceiling: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_load_timeout_ms: 10_000,
            resolver_timeout_ms: 10_000,
            item_ceiling: 20_000,
        }
    }
}

impl CrawlerConfig {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout_ms)
    }

    pub fn resolver_timeout(&self) -> Duration {
        Duration::from_millis(self.resolver_timeout_ms)
    }
}
