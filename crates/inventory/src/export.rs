//! CSV export of the whole store.

use std::borrow::Cow;

use crate::item::Item;

pub const DEFAULT_EXPORT_FILE_NAME: &str = "inventory.csv";
pub const CSV_HEADER: &str = "Name,Quantity,Price,Category";

/// Render every item, in store order, under a fixed header.
///
/// Rows are `\n` separated and the text ends with a newline.
pub fn export_csv(items: &[Item]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + items.len() * 32);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for item in items {
        let row = [
            csv_field(item.name()),
            Cow::Owned(item.quantity().to_string()),
            Cow::Owned(item.price().to_string()),
            csv_field(item.category()),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field when it contains a separator, a quote or a line break.
pub fn csv_field(raw: &str) -> Cow<'_, str> {
    if raw.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", raw.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(raw)
    }
}
