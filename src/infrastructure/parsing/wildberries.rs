//! Wildberries catalog-page normalizer.
//!
//! The data endpoint returns a flat `products` array; prices arrive in
//! minor units on the first listed size. Image URLs are not part of the
//! response at all - they follow the CDN's published basket/vol/part
//! sharding convention and are derived from the numeric id alone.

use serde::Deserialize;
use tracing::warn;

use crate::domain::catalog::{ItemMap, PageBatch, ProductId, ProductRecord};
use crate::domain::error::{ScrapeError, ScrapeResult};

/// Upper bounds of `id / 100_000` per basket shard; ids beyond the last
/// bound live on basket 32. This table is CDN load-balancer metadata, not
/// derivable from the API - a wrong entry silently 404s the image.
const BASKET_BOUNDS: [(u64, &str); 31] = [
    (143, "01"),
    (287, "02"),
    (431, "03"),
    (719, "04"),
    (1007, "05"),
    (1061, "06"),
    (1115, "07"),
    (1169, "08"),
    (1313, "09"),
    (1601, "10"),
    (1655, "11"),
    (1919, "12"),
    (2045, "13"),
    (2189, "14"),
    (2405, "15"),
    (2621, "16"),
    (2837, "17"),
    (3053, "18"),
    (3269, "19"),
    (3485, "20"),
    (3701, "21"),
    (3917, "22"),
    (4133, "23"),
    (4349, "24"),
    (4565, "25"),
    (4877, "26"),
    (5189, "27"),
    (5501, "28"),
    (5813, "29"),
    (6125, "30"),
    (6437, "31"),
];

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    products: Option<Vec<WbProduct>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WbProduct {
    id: Option<u64>,
    name: String,
    sizes: Vec<WbSize>,
    #[serde(rename = "reviewRating")]
    review_rating: f64,
    feedbacks: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WbSize {
    price: WbPrice,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WbPrice {
    /// Final product price in minor currency units.
    product: i64,
}

/// Normalizes one raw Wildberries data payload into a page batch.
///
/// An empty `products` array is a valid page (the loop upstream treats it
/// as upstream exhaustion); a missing `products` field is malformed.
pub fn parse_catalog_page(raw: &str) -> ScrapeResult<PageBatch> {
    let doc: CatalogDocument = serde_json::from_str(raw)
        .map_err(|e| ScrapeError::MalformedResponse(format!("invalid catalog JSON: {e}")))?;

    let products = doc
        .products
        .ok_or_else(|| ScrapeError::MalformedResponse("missing products field".to_string()))?;

    let mut items = ItemMap::new();
    for product in products {
        let Some(id) = product.id else {
            warn!("skipping wildberries product without id");
            continue;
        };
        let price_minor = product.sizes.first().map(|s| s.price.product).unwrap_or(0);
        items.insert(ProductRecord {
            id: ProductId::from(id),
            name: product.name,
            price: price_minor as f64 / 100.0,
            rating: product.review_rating,
            reviews: product.feedbacks,
            url: format!("https://www.wildberries.ru/catalog/{id}/detail.aspx"),
            image: derive_image_url(id),
        });
    }

    Ok(PageBatch {
        items,
        next_page: None,
    })
}

/// Derives the primary image URL for a product id.
///
/// Pure function of the id: the basket shard comes from the bound table on
/// `id / 100_000`, while `vol`/`part` are decimal-prefix substrings whose
/// widths depend on the id's digit count (9 digits: 4/6, 8: 3/5, 7 and 6:
/// 2/4, anything else falls back to `min(4, len)`/`min(6, len)`).
pub fn derive_image_url(id: u64) -> String {
    let id_str = id.to_string();
    let len = id_str.len();

    let (vol_len, part_len) = match len {
        9 => (4, 6),
        8 => (3, 5),
        7 | 6 => (2, 4),
        _ => (len.min(4), len.min(6)),
    };
    let vol = &id_str[..vol_len];
    let part = &id_str[..part_len];

    let n = id / 100_000;
    let basket = BASKET_BOUNDS
        .iter()
        .find(|(bound, _)| n <= *bound)
        .map_or("32", |(_, basket)| *basket);

    format!("https://basket-{basket}.wbbasket.ru/vol{vol}/part{part}/{id}/images/c516x688/1.webp")
}
