//! Ozon catalog-page normalizer.
//!
//! An Ozon API page is a JSON document whose `widgetStates` object maps
//! opaque widget keys to JSON-encoded strings. Grid widgets
//! (`tileGridDesktop-*`) carry the product tiles; paginator widgets
//! (`infiniteVirtualPaginator-*`, `megaPaginator-*`) carry the `nextPage`
//! token. Individual widgets that fail to parse are skipped without
//! aborting the page.

use serde_json::Value;
use tracing::warn;

use crate::domain::catalog::{ItemMap, PageBatch, ProductId, ProductRecord};
use crate::domain::error::{ScrapeError, ScrapeResult};

const TILE_GRID_PREFIX: &str = "tileGridDesktop-";
const PAGINATOR_PREFIXES: [&str; 2] = ["infiniteVirtualPaginator-", "megaPaginator-"];

/// Normalizes one raw Ozon API payload into a page batch.
///
/// Fails with [`ScrapeError::MalformedResponse`] when the document is not
/// JSON or lacks `widgetStates`, and with [`ScrapeError::NoData`] when no
/// raw tiles were present at all (an API page that carries no catalog).
pub fn parse_catalog_page(raw: &str) -> ScrapeResult<PageBatch> {
    let doc: Value = serde_json::from_str(raw)
        .map_err(|e| ScrapeError::MalformedResponse(format!("invalid catalog JSON: {e}")))?;

    let mut next_page = doc
        .get("nextPage")
        .and_then(Value::as_str)
        .map(str::to_string);

    let widget_states = doc
        .get("widgetStates")
        .and_then(Value::as_object)
        .ok_or_else(|| ScrapeError::MalformedResponse("missing widgetStates field".to_string()))?;

    let mut items = ItemMap::new();
    let mut tiles_seen = 0usize;

    for (key, value) in widget_states {
        // Widget states are JSON-encoded strings; anything else is noise.
        let Some(payload) = value.as_str() else {
            continue;
        };

        if PAGINATOR_PREFIXES.iter().any(|p| key.starts_with(p)) {
            match serde_json::from_str::<Value>(payload) {
                Ok(widget) => {
                    if let Some(token) = widget.get("nextPage").and_then(Value::as_str) {
                        if !token.is_empty() {
                            next_page = Some(token.to_string());
                        }
                    }
                }
                Err(err) => warn!(widget = %key, "skipping unparsable paginator widget: {err}"),
            }
            continue;
        }

        if key.starts_with(TILE_GRID_PREFIX) {
            let widget: Value = match serde_json::from_str(payload) {
                Ok(widget) => widget,
                Err(err) => {
                    warn!(widget = %key, "skipping unparsable tile grid widget: {err}");
                    continue;
                }
            };
            let Some(tiles) = widget.get("items").and_then(Value::as_array) else {
                continue;
            };
            for tile in tiles {
                tiles_seen += 1;
                if let Some(record) = parse_product(tile) {
                    items.insert(record);
                }
            }
        }
    }

    if tiles_seen == 0 {
        return Err(ScrapeError::NoData);
    }

    Ok(PageBatch { items, next_page })
}

/// Extracts one product record from a tile node.
///
/// Returns `None` for tiles without a SKU and for non-product tiles (ads,
/// banners) where neither a name nor a price can be resolved.
fn parse_product(tile: &Value) -> Option<ProductRecord> {
    let sku = tile_sku(tile)?;

    let mut name = String::new();
    let mut rating = 0.0f64;
    let mut reviews = 0u32;
    let mut prices: Vec<i64> = Vec::new();

    let states = tile.get("mainState").and_then(Value::as_array);
    for state in states.into_iter().flatten() {
        match state.get("type").and_then(Value::as_str) {
            Some("priceV2") => {
                let variants = state.pointer("/priceV2/price").and_then(Value::as_array);
                for variant in variants.into_iter().flatten() {
                    if let Some(price) = variant
                        .get("text")
                        .and_then(Value::as_str)
                        .and_then(parse_price_text)
                    {
                        prices.push(price);
                    }
                }
            }
            Some("textAtom") if state.get("id").and_then(Value::as_str) == Some("name") => {
                if let Some(text) = state.pointer("/textAtom/text").and_then(Value::as_str) {
                    name = text.trim().to_string();
                }
            }
            Some("labelList") => {
                let labels = state.pointer("/labelList/items").and_then(Value::as_array);
                for label in labels.into_iter().flatten() {
                    let Some(title) = label.get("title").and_then(Value::as_str) else {
                        continue;
                    };
                    match label
                        .pointer("/testInfo/automatizationId")
                        .and_then(Value::as_str)
                    {
                        Some("tile-list-rating") => rating = leading_float(title),
                        Some("tile-list-comments") => reviews = leading_count(title),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    let price = prices.iter().copied().min().map(|p| p as f64).unwrap_or(0.0);

    let image = tile
        .pointer("/tileImage/items")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|img| img.get("type").and_then(Value::as_str) == Some("image"))
        .and_then(|img| img.pointer("/image/link").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    // A tile with neither name nor price is not a product (ad, banner).
    if name.is_empty() && price == 0.0 {
        return None;
    }

    Some(ProductRecord {
        id: ProductId::from(sku.as_str()),
        name,
        price,
        rating,
        reviews,
        url: format!("https://www.ozon.ru/product/{sku}"),
        image,
    })
}

/// SKU is the record identity; tiles without one are dropped.
fn tile_sku(tile: &Value) -> Option<String> {
    match tile.get("sku")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Parses a rendered price like `"1 990 ₽"`: strips whitespace (regular and
/// non-breaking) and the ruble glyph, then reads the leading digit run.
/// Non-positive or unparsable prices yield `None`.
fn parse_price_text(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '₽')
        .collect();
    let digits: String = cleaned.chars().take_while(char::is_ascii_digit).collect();
    let value = digits.parse::<i64>().ok()?;
    (value > 0).then_some(value)
}

/// Leading decimal number of a label like `"4.8"`; 0 when absent.
fn leading_float(text: &str) -> f64 {
    let trimmed = text.trim();
    let end = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    trimmed[..end].parse().unwrap_or(0.0)
}

/// Leading integer of a label like `"1 344 отзыва"`; 0 when absent.
fn leading_count(text: &str) -> u32 {
    let first_token: String = text
        .trim()
        .split(' ')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let digits: String = first_token.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}
