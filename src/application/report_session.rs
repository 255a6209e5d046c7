//! Per-report session state.
//!
//! The report surface re-runs its original query and wants to know which
//! prices moved since the previous run. That used to live in process-wide
//! globals; here it is explicit state owned by whoever drives the report
//! view. Concurrent refreshes against one session must be serialized by
//! the caller - there is no internal locking.

use crate::domain::catalog::CatalogResult;
use crate::domain::diff::{ChangeRecord, PriceSnapshot, price_changes};

#[derive(Debug, Default)]
pub struct ReportSession {
    last: Option<CatalogResult>,
    prices: PriceSnapshot,
}

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent result shown by this session.
    pub fn last_result(&self) -> Option<&CatalogResult> {
        self.last.as_ref()
    }

    /// Applies a freshly re-fetched result for the session's query.
    ///
    /// The previous result's prices are folded into the cumulative price
    /// store first, the fresh result is diffed against that store, and only
    /// then does it replace the stored result. The first result ever
    /// applied produces no changes - there is nothing to diff against.
    pub fn apply_refresh(&mut self, fresh: CatalogResult) -> Vec<ChangeRecord> {
        let changes = match &self.last {
            Some(previous) => {
                for record in previous.items.iter() {
                    self.prices.insert(record.id.clone(), record.price);
                }
                price_changes(&self.prices, &fresh)
            }
            None => Vec::new(),
        };
        self.last = Some(fresh);
        changes
    }
}
