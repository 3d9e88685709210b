//! Bills: immutable snapshots of selected items, kept in an append-only history.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{BillId, DomainError, DomainResult, ItemId, ValueObject};

use crate::store::ItemStore;

/// One billed item, captured at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLine {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: u64,
    pub price: f64,
    pub line_total: f64,
}

impl ValueObject for BillLine {}

/// A named bill. Never modified after it is issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    id: BillId,
    name: String,
    lines: Vec<BillLine>,
    total_amount: f64,
    issued_at: DateTime<Utc>,
}

impl Bill {
    /// Snapshot the selected items of `store` into a new bill.
    ///
    /// Ids that are no longer in the store are skipped. Lines follow ascending id
    /// order.
    pub fn issue(
        id: BillId,
        name: &str,
        store: &ItemStore,
        selected: &BTreeSet<ItemId>,
        issued_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("bill name cannot be empty"));
        }

        let lines: Vec<BillLine> = selected
            .iter()
            .filter_map(|id| store.get(*id))
            .map(|item| BillLine {
                item_id: item.id_typed(),
                name: item.name().to_string(),
                quantity: item.quantity(),
                price: item.price(),
                line_total: item.value(),
            })
            .collect();

        if lines.is_empty() {
            return Err(DomainError::validation(
                "cannot generate a bill without selected items",
            ));
        }

        let total_amount = lines.iter().map(|line| line.line_total).sum();

        Ok(Self {
            id,
            name: name.to_string(),
            lines,
            total_amount,
            issued_at,
        })
    }

    pub fn id(&self) -> BillId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[BillLine] {
        &self.lines
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// Append-only list of issued bills.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BillHistory {
    bills: Vec<Bill>,
}

impl BillHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bill: Bill) -> &Bill {
        self.bills.push(bill);
        &self.bills[self.bills.len() - 1]
    }

    pub fn get(&self, id: BillId) -> Option<&Bill> {
        self.bills.iter().find(|bill| bill.id == id)
    }

    pub fn as_slice(&self) -> &[Bill] {
        &self.bills
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    /// Sum of every bill total.
    pub fn grand_total(&self) -> f64 {
        self.bills.iter().map(Bill::total_amount).sum()
    }
}
