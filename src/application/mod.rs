//! Application layer - orchestration of the ingestion engine.

pub mod catalog_service;
pub mod export;
pub mod report_session;

pub use catalog_service::{CatalogService, QueryRequest, ReportSink};
pub use report_session::ReportSession;
