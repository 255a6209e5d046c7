//! Query dispatch and per-site pagination control.
//!
//! One logical task per query: pagination proceeds strictly sequentially
//! (open, fetch, close, repeat) and multi-query batches run their
//! sub-queries one after another, so at most one browsing context is open
//! for a given query at any time. Errors stop a loop immediately, keep
//! everything accumulated so far, and surface as a string on the result -
//! nothing is thrown past `run_query`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::catalog::{CatalogResult, Marketplace};
use crate::domain::error::ScrapeError;
use crate::domain::query::{self, OZON_API_ENTRYPOINT, QueryTarget};
use crate::infrastructure::browser::BrowserEngine;
use crate::infrastructure::config::CrawlerConfig;
use crate::infrastructure::page_fetcher::PageFetcher;
use crate::infrastructure::parsing::{ozon, wildberries};
use crate::infrastructure::resolver::CatalogUrlResolver;

/// One invocation of the engine boundary. The two flags are independent:
/// a caller may want the result back, a report rendered, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub return_result: bool,
    #[serde(default)]
    pub open_report: bool,
}

/// External rendering surface for completed results (the report UI).
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn render(&self, result: &CatalogResult);
}

/// The catalog-ingestion engine.
pub struct CatalogService {
    fetcher: PageFetcher,
    resolver: CatalogUrlResolver,
    config: CrawlerConfig,
}

impl CatalogService {
    pub fn new(browser: Arc<dyn BrowserEngine>, config: CrawlerConfig) -> Self {
        Self {
            fetcher: PageFetcher::new(browser.clone()),
            resolver: CatalogUrlResolver::new(browser),
            config,
        }
    }

    /// Handles one boundary invocation, optionally forwarding the result to
    /// the report sink and optionally returning it.
    pub async fn handle(
        &self,
        request: QueryRequest,
        sink: Option<&dyn ReportSink>,
    ) -> Option<CatalogResult> {
        let result = self.run_query(&request.query, request.limit).await;
        if request.open_report {
            if let Some(sink) = sink {
                sink.render(&result).await;
            }
        }
        request.return_result.then_some(result)
    }

    /// Runs a raw query end to end and always produces a result; failures
    /// are recorded on `result.error` alongside whatever was accumulated.
    pub async fn run_query(&self, query: &str, limit: usize) -> CatalogResult {
        let query = query.trim();
        let mut sub_queries = query::split_queries(query);

        if sub_queries.len() > 1 {
            return self.run_batch(query, sub_queries, limit).await;
        }

        let single = sub_queries.pop().unwrap_or_default();
        self.run_single(&single, limit).await
    }

    /// Sequentially runs deduplicated sub-queries and folds their items
    /// into one map (cross-marketplace id collisions are last-write-wins).
    ///
    /// `total_items` and `elapsed_ms` are summed; `error`, `marketplace`
    /// and `timestamp` are taken from the last sub-query processed, and the
    /// first sub-query that errors ends the batch.
    async fn run_batch(
        &self,
        raw_query: &str,
        sub_queries: Vec<String>,
        limit: usize,
    ) -> CatalogResult {
        info!(count = sub_queries.len(), "dispatching multi-query batch");
        let mut result = CatalogResult::new(raw_query, limit);

        for sub_query in &sub_queries {
            let sub_result = self.run_single(sub_query, limit).await;
            let failed = sub_result.error.is_some();

            result.total_items += sub_result.total_items;
            result.elapsed_ms += sub_result.elapsed_ms;
            result.marketplace = sub_result.marketplace;
            result.timestamp = sub_result.timestamp;
            result.error = sub_result.error;
            result.items.merge(sub_result.items);

            if failed {
                break;
            }
        }

        result
    }

    async fn run_single(&self, query: &str, limit: usize) -> CatalogResult {
        let started = Instant::now();
        let mut result = CatalogResult::new(query, limit);

        match query::detect_target(query) {
            Ok(QueryTarget::Ozon { api_url }) => {
                self.paginate_ozon(&mut result, api_url, limit).await;
            }
            Ok(QueryTarget::Wildberries { page_url }) => {
                result.marketplace = Marketplace::Wildberries;
                match self
                    .resolver
                    .resolve(&page_url, self.config.resolver_timeout())
                    .await
                {
                    Ok(data_url) => {
                        self.paginate_wildberries(&mut result, data_url, limit).await;
                    }
                    Err(err) => {
                        warn!(%query, "catalog url resolution failed: {err}");
                        result.error = Some(err.to_string());
                    }
                }
            }
            Ok(QueryTarget::Unsupported { host }) => {
                result.error = Some(ScrapeError::UnsupportedDomain(host).to_string());
            }
            Err(err) => {
                result.error = Some(err.to_string());
            }
        }

        result.finish(started);
        info!(
            query = %result.params.query,
            items = result.total_items,
            elapsed_ms = result.elapsed_ms,
            error = result.error.as_deref().unwrap_or(""),
            "query finished"
        );
        result
    }

    /// Ozon loop: follow the `nextPage` token through the fixed API
    /// entrypoint until the token disappears or the limit is reached.
    async fn paginate_ozon(&self, result: &mut CatalogResult, start_url: String, limit: usize) {
        let mut current_url = start_url;

        loop {
            let raw = match self
                .fetcher
                .fetch(&current_url, self.config.page_load_timeout())
                .await
            {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(url = %current_url, "ozon page fetch failed: {err}");
                    result.error = Some(err.to_string());
                    break;
                }
            };

            let batch = match ozon::parse_catalog_page(&raw) {
                Ok(batch) => batch,
                Err(err) => {
                    result.error = Some(err.to_string());
                    break;
                }
            };

            debug!(items = batch.items.len(), "ozon page accumulated");
            result.items.merge(batch.items);

            if limit > 0 && result.items.len() >= limit {
                break;
            }
            let Some(token) = batch.next_page else {
                break;
            };
            current_url = format!("{OZON_API_ENTRYPOINT}?url={token}");
        }
    }

    /// Wildberries loop: purely numeric pagination on the resolved data
    /// URL's `page` parameter. Terminates on an empty page, a missing
    /// `page` parameter (single-page URL), the limit, or the hard ceiling.
    async fn paginate_wildberries(
        &self,
        result: &mut CatalogResult,
        data_url: String,
        limit: usize,
    ) {
        let mut current_url = data_url;

        loop {
            let raw = match self
                .fetcher
                .fetch(&current_url, self.config.page_load_timeout())
                .await
            {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(url = %current_url, "wildberries page fetch failed: {err}");
                    result.error = Some(err.to_string());
                    break;
                }
            };

            let batch = match wildberries::parse_catalog_page(&raw) {
                Ok(batch) => batch,
                Err(err) => {
                    result.error = Some(err.to_string());
                    break;
                }
            };

            // Zero items means upstream pagination is exhausted.
            if batch.items.is_empty() {
                break;
            }

            debug!(items = batch.items.len(), "wildberries page accumulated");
            result.items.merge(batch.items);

            if limit > 0 && result.items.len() >= limit {
                break;
            }
            if result.items.len() > self.config.item_ceiling {
                warn!(items = result.items.len(), "item ceiling reached, stopping");
                break;
            }
            current_url = match next_page_url(&current_url) {
                Some(url) => url,
                None => break,
            };
        }
    }
}

/// Increments the `page` query parameter, keeping every other parameter
/// intact. `None` when the URL has no parseable `page` parameter - such
/// URLs are not paginable.
fn next_page_url(current: &str) -> Option<String> {
    let mut url = Url::parse(current).ok()?;
    let page: u64 = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("page", &(page + 1).to_string());

    Some(url.to_string())
}
