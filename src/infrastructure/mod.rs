//! Infrastructure layer - the boundary with the outside world
//!
//! Holds the abstract browser-automation capability, the fetch/resolve
//! primitives built on top of it, the per-site payload normalizers, and
//! the crate's configuration and logging setup.

pub mod browser;
pub mod config;
pub mod logging;
pub mod page_fetcher;
pub mod parsing;
pub mod resolver;

pub use browser::{BrowserEngine, PageId, RequestObserver};
pub use config::CrawlerConfig;
pub use page_fetcher::PageFetcher;
pub use resolver::CatalogUrlResolver;
