//! Query splitting and marketplace routing.
//!
//! A raw query is either a full marketplace URL or a bare path fragment
//! (treated as an Ozon catalog path). Comma-separated sub-queries are
//! trimmed and deduplicated before dispatch.

use url::Url;

use crate::domain::error::{ScrapeError, ScrapeResult};

/// Fixed Ozon API entrypoint; the `url` query parameter carries the catalog
/// path or the pagination token returned by the previous page.
pub const OZON_API_ENTRYPOINT: &str = "https://www.ozon.ru/api/entrypoint-api.bx/page/json/v2";

/// Where a single sub-query should be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    /// Fetch this Ozon API URL directly.
    Ozon { api_url: String },
    /// Open this catalog page and observe the real data URL.
    Wildberries { page_url: String },
    /// URL with a host no adapter handles.
    Unsupported { host: String },
}

/// Splits a raw query on `,`, trims each part, drops empties, and
/// deduplicates while preserving first-seen order.
pub fn split_queries(raw: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() || seen.iter().any(|q| q == part) {
            continue;
        }
        seen.push(part.to_string());
    }
    seen
}

/// Detects the marketplace for one sub-query and builds the URL the
/// pagination controller should start from.
pub fn detect_target(query: &str) -> ScrapeResult<QueryTarget> {
    if !query.starts_with("http") {
        // Bare fragments are Ozon catalog paths by convention.
        return Ok(QueryTarget::Ozon {
            api_url: format!("{OZON_API_ENTRYPOINT}?url={query}"),
        });
    }

    let url = Url::parse(query).map_err(|e| ScrapeError::InvalidQuery(e.to_string()))?;
    let host = url.host_str().unwrap_or_default();

    if host.contains("ozon.") {
        let search = url.query().map(|q| format!("?{q}")).unwrap_or_default();
        Ok(QueryTarget::Ozon {
            api_url: format!("{OZON_API_ENTRYPOINT}?url={}{search}", url.path()),
        })
    } else if host.contains("wildberries.") {
        Ok(QueryTarget::Wildberries {
            page_url: query.to_string(),
        })
    } else {
        Ok(QueryTarget::Unsupported {
            host: host.to_string(),
        })
    }
}
