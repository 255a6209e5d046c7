//! mpscan - marketplace catalog ingestion engine
//!
//! Drives a controlled browsing context to fetch paginated catalog JSON from
//! Ozon and Wildberries, normalizes the per-site payloads into a single
//! product record shape, and supports re-running a query to compute price
//! deltas against a prior snapshot.
//!
//! The browser itself is consumed as a narrow capability
//! ([`infrastructure::browser::BrowserEngine`]), so the engine can be tested
//! against canned payloads without any real browser automation.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export the engine boundary for easier access
pub use application::catalog_service::{CatalogService, QueryRequest, ReportSink};
pub use application::report_session::ReportSession;
pub use domain::catalog::{CatalogResult, ItemMap, Marketplace, ProductId, ProductRecord};
pub use domain::error::{ScrapeError, ScrapeResult};
pub use infrastructure::browser::BrowserEngine;
pub use infrastructure::config::CrawlerConfig;
