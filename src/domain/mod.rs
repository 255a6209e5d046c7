//! Domain module - core data model and marketplace-independent logic
//!
//! Nothing in this layer performs IO; the types here are shared by the
//! normalizers, the pagination controllers and the report surface.

pub mod catalog;
pub mod diff;
pub mod error;
pub mod query;

pub use catalog::{CatalogParams, CatalogResult, ItemMap, Marketplace, PageBatch, ProductId, ProductRecord};
pub use diff::{ChangeRecord, PriceSnapshot, price_changes};
pub use error::{ScrapeError, ScrapeResult};
