//! Price-delta computation between a prior snapshot and a fresh result.
//!
//! Pure functions only; the snapshot is owned by the caller across refresh
//! cycles and must be serialized externally for concurrent use.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{CatalogResult, ProductId, ProductRecord};

/// Last-known price per product id.
pub type PriceSnapshot = HashMap<ProductId, f64>;

/// A product whose price strictly changed between two runs of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(flatten)]
    pub item: ProductRecord,
    #[serde(rename = "oldPrice")]
    pub old_price: f64,
    /// Signed percentage change, rounded to one decimal.
    pub diff: f64,
}

/// Computes per-item price changes of `current` against `previous`.
///
/// Items are skipped when no prior price is known, either price is
/// non-positive, or the price is unchanged. Output follows the current
/// result's iteration order.
pub fn price_changes(previous: &PriceSnapshot, current: &CatalogResult) -> Vec<ChangeRecord> {
    current
        .items
        .iter()
        .filter_map(|item| {
            let old_price = *previous.get(&item.id)?;
            if old_price <= 0.0 || item.price <= 0.0 || item.price == old_price {
                return None;
            }
            let diff = ((item.price - old_price) / old_price * 1000.0).round() / 10.0;
            Some(ChangeRecord {
                item: item.clone(),
                old_price,
                diff,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::CatalogResult;

    fn result_with(prices: &[(u64, f64)]) -> CatalogResult {
        let mut result = CatalogResult::new("q", 0);
        for &(id, price) in prices {
            result.items.insert(ProductRecord {
                id: ProductId::from(id),
                name: format!("item {id}"),
                price,
                rating: 0.0,
                reviews: 0,
                url: String::new(),
                image: String::new(),
            });
        }
        result
    }

    fn snapshot(prices: &[(u64, f64)]) -> PriceSnapshot {
        prices
            .iter()
            .map(|&(id, price)| (ProductId::from(id), price))
            .collect()
    }

    #[test]
    fn changed_price_yields_rounded_percentage() {
        let previous = snapshot(&[(1, 300.0)]);
        let current = result_with(&[(1, 400.0)]);

        let changes = price_changes(&previous, &current);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_price, 300.0);
        assert_eq!(changes[0].diff, 33.3);
    }

    #[test]
    fn price_drop_is_negative() {
        let previous = snapshot(&[(1, 200.0)]);
        let current = result_with(&[(1, 150.0)]);

        let changes = price_changes(&previous, &current);
        assert_eq!(changes[0].diff, -25.0);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let previous = snapshot(&[(1, 100.0)]);
        let current = result_with(&[(2, 100.0)]);

        assert!(price_changes(&previous, &current).is_empty());
    }

    #[test]
    fn non_positive_and_unchanged_prices_are_skipped() {
        let previous = snapshot(&[(1, 0.0), (2, 100.0), (3, 100.0)]);
        let current = result_with(&[(1, 50.0), (2, 0.0), (3, 100.0)]);

        assert!(price_changes(&previous, &current).is_empty());
    }

    #[test]
    fn output_follows_current_iteration_order() {
        let previous = snapshot(&[(5, 10.0), (2, 10.0)]);
        let current = result_with(&[(5, 20.0), (2, 30.0)]);

        let changes = price_changes(&previous, &current);
        let ids: Vec<&str> = changes
            .iter()
            .map(|c| c.item.id.as_str())
            .collect();
        assert_eq!(ids, ["5", "2"]);
    }
}
