//! Error taxonomy for catalog ingestion.
//!
//! Page-level and resolver-level failures abort the pagination loop but are
//! never propagated past the query boundary; the dispatcher records their
//! `Display` rendering on the result instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    /// Load-complete or a matching network request was not observed in time.
    #[error("timed out after {0} ms")]
    Timeout(u64),

    /// The browsing context could not be created.
    #[error("failed to open browsing context: {0}")]
    Navigation(String),

    /// JSON parse failure or a missing expected top-level field.
    #[error("malformed catalog response: {0}")]
    MalformedResponse(String),

    /// The query host is not a recognized marketplace.
    #[error("unsupported domain: {0}")]
    UnsupportedDomain(String),

    /// The page parsed but yielded zero usable items where at least one
    /// was expected.
    #[error("no product data found in response")]
    NoData,

    /// The query string itself could not be interpreted.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Any other failure reported by the browser-automation host.
    #[error("browser engine failure: {0}")]
    Browser(String),
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
