//! Per-site payload normalizers.
//!
//! Each submodule converts one raw catalog-page payload into a
//! [`crate::domain::catalog::PageBatch`]. Item-level problems are logged and
//! skipped; page-level problems (unparsable document, missing top-level
//! field) are returned as errors and abort the pagination loop upstream.

pub mod ozon;
pub mod wildberries;
