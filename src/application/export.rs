//! CSV rendering of result items for the report surface.

use crate::domain::catalog::ItemMap;

/// Byte-order mark some spreadsheet tools require to detect UTF-8; callers
/// writing files prepend it themselves.
pub const CSV_BOM: &str = "\u{feff}";

const COLUMNS: [&str; 7] = ["id", "name", "price", "rating", "reviews", "url", "image"];

/// Renders items as CSV rows in iteration order, optionally preceded by a
/// header row. Rows are joined with `\n` and carry no trailing newline.
pub fn items_to_csv(items: &ItemMap, include_header: bool) -> String {
    let mut rows = Vec::with_capacity(items.len() + 1);

    if include_header {
        rows.push(COLUMNS.join(","));
    }

    for record in items.iter() {
        let fields = [
            escape(record.id.as_str()),
            escape(&record.name),
            record.price.to_string(),
            record.rating.to_string(),
            record.reviews.to_string(),
            escape(&record.url),
            escape(&record.image),
        ];
        rows.push(fields.join(","));
    }

    rows.join("\n")
}

/// Quotes a value when it contains a delimiter, quote or line break;
/// embedded quotes are doubled.
fn escape(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
