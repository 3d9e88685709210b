//! Inventory session: the single owned handle behind the presentation layer.
//!
//! The session owns the store plus all transient UI state (criteria, selection, bill
//! name input, bill history, event journal). Derived values are recomputed on every read.
//! Every fallible operation either fully succeeds or leaves the session unchanged.

use std::collections::BTreeSet;

use chrono::Utc;

use stockroom_core::{Aggregate, BillId, DomainError, DomainResult, ItemId};
use stockroom_events::EventJournal;

use crate::billing::{Bill, BillHistory};
use crate::config::InventoryConfig;
use crate::export;
use crate::item::{Item, ItemDraft};
use crate::selection::SelectionSet;
use crate::store::{
    AddItem, EditItem, InventoryCommand, InventoryEvent, ItemStore, RemoveItems, SetCategory,
};
use crate::valuation::{self, InventorySummary};
use crate::view::{self, Page, SortField, SortOrder, ViewCriteria};

#[derive(Debug, Clone)]
pub struct InventorySession {
    store: ItemStore,
    criteria: ViewCriteria,
    selection: SelectionSet,
    bill_name: String,
    bills: BillHistory,
    journal: EventJournal<InventoryEvent>,
    export_file_name: String,
}

impl Default for InventorySession {
    fn default() -> Self {
        let config = InventoryConfig::default();
        Self::from_parts(ItemStore::new(config.category_policy()), &config)
    }
}

impl InventorySession {
    /// Build a session from configuration, loading any seed items.
    pub fn new(config: &InventoryConfig) -> DomainResult<Self> {
        let store = ItemStore::with_items(config.seed.clone(), config.category_policy())?;
        tracing::info!(
            items = store.len(),
            page_size = config.page_size,
            strict_categories = config.strict_categories,
            "inventory session started"
        );
        Ok(Self::from_parts(store, config))
    }

    fn from_parts(store: ItemStore, config: &InventoryConfig) -> Self {
        Self {
            store,
            criteria: ViewCriteria::with_page_size(config.page_size),
            selection: SelectionSet::new(),
            bill_name: String::new(),
            bills: BillHistory::new(),
            journal: EventJournal::new(),
            export_file_name: config.export_file_name.clone(),
        }
    }

    fn dispatch(&mut self, command: InventoryCommand) -> DomainResult<Vec<InventoryEvent>> {
        let events = self.store.execute(&command)?;
        for event in &events {
            if let InventoryEvent::ItemRemoved(e) = event {
                self.selection.deselect(e.item_id);
            }
        }
        self.journal.extend(events.iter().cloned());
        self.settle_page();
        Ok(events)
    }

    /// Keep the stored page number inside the current page range.
    fn settle_page(&mut self) {
        let page = view::run(self.store.items(), &self.criteria).page;
        self.criteria.page = page;
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    pub fn add(
        &mut self,
        name: &str,
        quantity: &str,
        price: &str,
        category: &str,
    ) -> DomainResult<Item> {
        let draft = rejected("add", ItemDraft::parse(name, quantity, price, category))?;
        let events = rejected(
            "add",
            self.dispatch(InventoryCommand::AddItem(AddItem {
                draft,
                occurred_at: Utc::now(),
            })),
        )?;
        let id = events
            .first()
            .map(InventoryEvent::item_id)
            .ok_or_else(|| DomainError::invariant("add produced no event"))?;
        let item = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::invariant("added item missing from store"))?;
        tracing::info!(item_id = %id, name = item.name(), "item added");
        Ok(item)
    }

    pub fn edit(
        &mut self,
        id: ItemId,
        name: &str,
        quantity: &str,
        price: &str,
        category: &str,
    ) -> DomainResult<Item> {
        let draft = rejected("edit", ItemDraft::parse(name, quantity, price, category))?;
        rejected(
            "edit",
            self.dispatch(InventoryCommand::EditItem(EditItem {
                item_id: id,
                draft,
                occurred_at: Utc::now(),
            })),
        )?;
        tracing::info!(item_id = %id, "item edited");
        self.store.get(id).cloned().ok_or_else(|| DomainError::not_found(id))
    }

    /// Remove one item. Unknown ids are ignored; returns whether anything was removed.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let removed = self.remove_ids([id].into());
        if removed == 0 {
            tracing::debug!(item_id = %id, "remove ignored, item not found");
        } else {
            tracing::info!(item_id = %id, "item removed");
        }
        removed == 1
    }

    /// Delete every selected item, then clear the selection.
    pub fn bulk_delete(&mut self) -> usize {
        let ids = self.selection.ids().clone();
        let removed = self.remove_ids(ids);
        self.selection.clear();
        tracing::info!(count = removed, "bulk delete");
        removed
    }

    /// Removal is never rejected; ids missing from the store produce no event.
    fn remove_ids(&mut self, item_ids: BTreeSet<ItemId>) -> usize {
        self.dispatch(InventoryCommand::RemoveItems(RemoveItems {
            item_ids,
            occurred_at: Utc::now(),
        }))
        .map_or(0, |events| events.len())
    }

    /// Overwrite the category of every selected item, then clear the selection.
    pub fn bulk_set_category(&mut self, category: &str) -> DomainResult<usize> {
        let ids = self.selection.ids().clone();
        let events = rejected(
            "bulk_set_category",
            self.dispatch(InventoryCommand::SetCategory(SetCategory {
                item_ids: ids,
                category: category.to_string(),
                occurred_at: Utc::now(),
            })),
        )?;
        self.selection.clear();
        tracing::info!(
            count = events.len(),
            category = category.trim(),
            "bulk category change"
        );
        Ok(events.len())
    }

    // -------------------------------------------------------------------------
    // View criteria
    // -------------------------------------------------------------------------

    pub fn set_search(&mut self, search: &str) {
        self.criteria.filter.search = search.trim().to_string();
        self.settle_page();
    }

    pub fn set_min_price(&mut self, raw: &str) -> DomainResult<()> {
        self.criteria.filter.min_price = rejected("set_min_price", view::parse_price_bound(raw))?;
        self.settle_page();
        Ok(())
    }

    pub fn set_max_price(&mut self, raw: &str) -> DomainResult<()> {
        self.criteria.filter.max_price = rejected("set_max_price", view::parse_price_bound(raw))?;
        self.settle_page();
        Ok(())
    }

    pub fn set_min_quantity(&mut self, raw: &str) -> DomainResult<()> {
        self.criteria.filter.min_quantity =
            rejected("set_min_quantity", view::parse_quantity_bound(raw))?;
        self.settle_page();
        Ok(())
    }

    pub fn set_max_quantity(&mut self, raw: &str) -> DomainResult<()> {
        self.criteria.filter.max_quantity =
            rejected("set_max_quantity", view::parse_quantity_bound(raw))?;
        self.settle_page();
        Ok(())
    }

    /// Set both price bounds at once; neither changes unless both parse.
    pub fn set_price_range(&mut self, min: &str, max: &str) -> DomainResult<()> {
        let min = rejected("set_price_range", view::parse_price_bound(min))?;
        let max = rejected("set_price_range", view::parse_price_bound(max))?;
        self.criteria.filter.min_price = min;
        self.criteria.filter.max_price = max;
        self.settle_page();
        Ok(())
    }

    /// Set both quantity bounds at once; neither changes unless both parse.
    pub fn set_quantity_range(&mut self, min: &str, max: &str) -> DomainResult<()> {
        let min = rejected("set_quantity_range", view::parse_quantity_bound(min))?;
        let max = rejected("set_quantity_range", view::parse_quantity_bound(max))?;
        self.criteria.filter.min_quantity = min;
        self.criteria.filter.max_quantity = max;
        self.settle_page();
        Ok(())
    }

    /// Filter by exact category; blank input shows every category.
    pub fn set_category_filter(&mut self, raw: &str) {
        let category = raw.trim();
        self.criteria.filter.category = (!category.is_empty()).then(|| category.to_string());
        self.settle_page();
    }

    pub fn clear_filters(&mut self) {
        self.criteria.filter = Default::default();
        self.settle_page();
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.criteria.toggle_sort(field);
    }

    pub fn set_sort(&mut self, order: Option<SortOrder>) {
        self.criteria.sort = order;
    }

    /// Jump to a page; out-of-range requests land on the nearest valid page.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.criteria.page = page;
        self.settle_page();
        self.criteria.page
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.criteria.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.criteria.page.saturating_sub(1))
    }

    pub fn criteria(&self) -> &ViewCriteria {
        &self.criteria
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The current page of the sorted, filtered view.
    pub fn view(&self) -> Page {
        view::run(self.store.items(), &self.criteria)
    }

    /// Every item in store order.
    pub fn items(&self) -> &[Item] {
        self.store.items()
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.store.get(id)
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn known_categories(&self) -> &[String] {
        self.store.policy().known()
    }

    pub fn total_value(&self) -> f64 {
        valuation::total_value(self.store.items())
    }

    pub fn average_price(&self) -> f64 {
        valuation::average_price(self.store.items())
    }

    pub fn summary(&self) -> InventorySummary {
        InventorySummary::of(self.store.items())
    }

    pub fn journal(&self) -> &EventJournal<InventoryEvent> {
        &self.journal
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Flip one item's selection. Returns whether it is selected afterwards.
    pub fn toggle_selection(&mut self, id: ItemId) -> DomainResult<bool> {
        if !self.store.contains(id) {
            return rejected("toggle_selection", Err(DomainError::not_found(id)));
        }
        Ok(self.selection.toggle(id))
    }

    /// Select-all for the visible page (replace semantics, toggles off when complete).
    pub fn select_all_visible(&mut self) -> bool {
        let visible = self.view().ids();
        self.selection.select_all(&visible)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    // -------------------------------------------------------------------------
    // Export & billing
    // -------------------------------------------------------------------------

    pub fn export_csv(&self) -> String {
        export::export_csv(self.store.items())
    }

    pub fn export_file_name(&self) -> &str {
        &self.export_file_name
    }

    pub fn set_bill_name(&mut self, name: &str) {
        self.bill_name = name.to_string();
    }

    pub fn bill_name(&self) -> &str {
        &self.bill_name
    }

    /// Bill the selected items under the current bill name.
    ///
    /// On success the selection and bill name input are cleared.
    pub fn generate_bill(&mut self) -> DomainResult<&Bill> {
        let bill = rejected(
            "generate_bill",
            Bill::issue(
                BillId::new(),
                &self.bill_name,
                &self.store,
                self.selection.ids(),
                Utc::now(),
            ),
        )?;
        self.selection.clear();
        self.bill_name.clear();
        tracing::info!(
            bill = bill.name(),
            lines = bill.lines().len(),
            total = bill.total_amount(),
            "bill generated"
        );
        Ok(self.bills.push(bill))
    }

    pub fn bills(&self) -> &BillHistory {
        &self.bills
    }
}

/// Log rejected input at warn level and pass the result through.
fn rejected<T>(operation: &'static str, result: DomainResult<T>) -> DomainResult<T> {
    if let Err(err) = &result {
        tracing::warn!(operation, error = %err, "operation rejected");
    }
    result
}
