//! Plain-text rendering of session state.

use std::fmt::Write as _;

use stockroom_events::{Event, EventEnvelope};
use stockroom_inventory::{Bill, InventoryEvent, InventorySummary, Item, Page, SelectionSet};

const HEADER: [&str; 6] = ["", "ID", "Name", "Qty", "Price", "Category"];

/// Render items as an aligned table. Selected rows are marked with `*`.
pub fn items_table(items: &[Item], selection: &SelectionSet) -> String {
    let rows: Vec<[String; 6]> = items
        .iter()
        .map(|item| {
            [
                (if selection.contains(item.id_typed()) { "*" } else { " " }).to_string(),
                item.id_typed().to_string(),
                item.name().to_string(),
                item.quantity().to_string(),
                format!("{:.2}", item.price()),
                item.category().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADER.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADER.map(String::from), &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

pub fn page(page: &Page, selection: &SelectionSet) -> String {
    if page.items.is_empty() {
        return "no items match the current filters\n".to_string();
    }
    let mut out = items_table(&page.items, selection);
    let _ = writeln!(
        out,
        "page {} of {} ({} matching, {} selected)",
        page.page,
        page.page_count,
        page.total_matches,
        selection.len()
    );
    out
}

pub fn summary(summary: &InventorySummary) -> String {
    format!(
        "items: {}\ntotal quantity: {}\ntotal value: {:.2}\naverage price: {:.2}\n",
        summary.item_count, summary.total_quantity, summary.total_value, summary.average_price
    )
}

pub fn bill(bill: &Bill) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "bill {:?} ({}) issued {}",
        bill.name(),
        bill.id(),
        bill.issued_at().format("%Y-%m-%d %H:%M:%S")
    );
    for line in bill.lines() {
        let _ = writeln!(
            out,
            "  {} x{} @ {:.2} = {:.2}",
            line.name, line.quantity, line.price, line.line_total
        );
    }
    let _ = writeln!(out, "  total: {:.2}", bill.total_amount());
    out
}

pub fn journal_entry(entry: &EventEnvelope<InventoryEvent>) -> String {
    let event = entry.payload();
    format!(
        "#{} {} {} item={}",
        entry.sequence_number(),
        event.occurred_at().format("%H:%M:%S"),
        event.event_type(),
        event.item_id()
    )
}
