//! The inventory item entity and the validated input used to create or edit it.

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ItemId};

/// One inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    quantity: u64,
    price: f64,
    category: String,
}

impl Item {
    pub(crate) fn from_draft(id: ItemId, draft: ItemDraft) -> Self {
        Self {
            id,
            name: draft.name,
            quantity: draft.quantity,
            price: draft.price,
            category: draft.category,
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// `price × quantity` for this line of stock.
    pub fn value(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// The editable fields of this item, e.g. to prefill an edit form.
    pub fn to_draft(&self) -> ItemDraft {
        ItemDraft {
            name: self.name.clone(),
            quantity: self.quantity,
            price: self.price,
            category: self.category.clone(),
        }
    }

    pub(crate) fn replace_fields(&mut self, draft: ItemDraft) {
        self.name = draft.name;
        self.quantity = draft.quantity;
        self.price = draft.price;
        self.category = draft.category;
    }

    pub(crate) fn set_category(&mut self, category: String) {
        self.category = category;
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Validated field values for an item, without an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub quantity: u64,
    pub price: f64,
    pub category: String,
}

impl ItemDraft {
    /// Parse raw form input.
    ///
    /// Fields are checked in form order and the first failure is returned.
    pub fn parse(name: &str, quantity: &str, price: &str, category: &str) -> DomainResult<Self> {
        Ok(Self {
            name: parse_name(name)?,
            quantity: parse_quantity(quantity)?,
            price: parse_price(price)?,
            category: parse_category(category)?,
        })
    }

    /// Re-check a draft that was built directly (e.g. deserialized seed data).
    pub fn validate(self) -> DomainResult<Self> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation(
                "price must be a non-negative number",
            ));
        }
        Ok(Self {
            name: parse_name(&self.name)?,
            quantity: self.quantity,
            price: self.price,
            category: parse_category(&self.category)?,
        })
    }
}

pub fn parse_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(name.to_string())
}

pub fn parse_quantity(raw: &str) -> DomainResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| DomainError::validation("quantity must be a non-negative integer"))
}

pub fn parse_price(raw: &str) -> DomainResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(DomainError::validation(
            "price must be a non-negative number",
        )),
    }
}

pub fn parse_category(raw: &str) -> DomainResult<String> {
    let category = raw.trim();
    if category.is_empty() {
        return Err(DomainError::validation("category cannot be empty"));
    }
    Ok(category.to_string())
}
