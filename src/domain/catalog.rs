//! Canonical catalog records and the accumulated query result.
//!
//! `ItemMap` keeps the insertion-ordered id-to-record mapping the report
//! surface expects: re-inserting an existing id overwrites the value but
//! keeps its original position, and serialization produces a plain id-keyed
//! JSON object rather than an array.

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Supported marketplaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marketplace {
    #[serde(rename = "ozon")]
    Ozon,
    #[serde(rename = "wb")]
    Wildberries,
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ozon => write!(f, "Ozon"),
            Self::Wildberries => write!(f, "Wildberries"),
        }
    }
}

/// Site-native product key, rendered in decimal for numeric ids so that
/// records from both marketplaces can share one map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One normalized catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    /// Major currency units; minor-unit upstream prices are converted.
    pub price: f64,
    pub rating: f64,
    pub reviews: u32,
    /// Canonical detail-page URL.
    pub url: String,
    /// Primary image URL, may be empty.
    pub image: String,
}

/// Insertion-ordered `id -> ProductRecord` mapping.
///
/// Overwriting an existing id replaces the record in place (last-page-wins
/// for the value, first-seen position preserved).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemMap {
    order: Vec<ProductId>,
    entries: HashMap<ProductId, ProductRecord>,
}

impl ItemMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &ProductId) -> Option<&ProductRecord> {
        self.entries.get(id)
    }

    pub fn insert(&mut self, record: ProductRecord) {
        if !self.entries.contains_key(&record.id) {
            self.order.push(record.id.clone());
        }
        self.entries.insert(record.id.clone(), record);
    }

    /// Folds another map into this one, last-write-wins per id.
    pub fn merge(&mut self, other: ItemMap) {
        for record in other.into_records() {
            self.insert(record);
        }
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn into_records(self) -> impl Iterator<Item = ProductRecord> {
        let mut entries = self.entries;
        self.order.into_iter().filter_map(move |id| entries.remove(&id))
    }
}

impl Serialize for ItemMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for record in self.iter() {
            map.serialize_entry(record.id.as_str(), record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ItemMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ItemMapVisitor;

        impl<'de> Visitor<'de> for ItemMapVisitor {
            type Value = ItemMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an id-keyed object of product records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut items = ItemMap::new();
                while let Some((_, record)) = access.next_entry::<String, ProductRecord>()? {
                    items.insert(record);
                }
                Ok(items)
            }
        }

        deserializer.deserialize_map(ItemMapVisitor)
    }
}

/// The query as submitted, echoed back on the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogParams {
    pub query: String,
    /// Item-count limit, 0 = unlimited.
    pub limit: usize,
}

/// Accumulated outcome of one catalog query.
///
/// Built incrementally across pages; a set `error` does not discard items
/// collected before the failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResult {
    pub params: CatalogParams,
    pub marketplace: Marketplace,
    pub items: ItemMap,
    #[serde(rename = "totalItems")]
    pub total_items: usize,
    #[serde(rename = "elapsedTime")]
    pub elapsed_ms: u64,
    pub timestamp: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl CatalogResult {
    pub fn new(query: impl Into<String>, limit: usize) -> Self {
        Self {
            params: CatalogParams {
                query: query.into(),
                limit,
            },
            marketplace: Marketplace::Ozon,
            items: ItemMap::new(),
            total_items: 0,
            elapsed_ms: 0,
            timestamp: None,
            error: None,
        }
    }

    /// Stamps totals, elapsed time and completion timestamp; called at the
    /// moment the pagination loop exits.
    pub fn finish(&mut self, started: Instant) {
        self.total_items = self.items.len();
        self.elapsed_ms = started.elapsed().as_millis() as u64;
        self.timestamp = Some(Utc::now());
    }
}

/// Ephemeral outcome of normalizing a single fetched page; folded into the
/// accumulated result immediately, never persisted.
#[derive(Debug, Default)]
pub struct PageBatch {
    pub items: ItemMap,
    /// Site-specific pagination token for the next page, when present.
    pub next_page: Option<String>,
}
