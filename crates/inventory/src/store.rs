//! The item store: the authoritative, ordered list of items.
//!
//! All mutations go through [`InventoryCommand`]s. `handle` validates a command against
//! the current state and returns [`InventoryEvent`]s; `apply` commits them. A rejected
//! command therefore never leaves the store half-changed.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Aggregate, AggregateRoot, DomainError, DomainResult, ItemId};
use stockroom_events::Event;

use crate::config::CategoryPolicy;
use crate::item::{Item, ItemDraft, parse_category};

/// Aggregate root: ItemStore.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStore {
    items: Vec<Item>,
    next_id: ItemId,
    policy: CategoryPolicy,
    version: u64,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new(CategoryPolicy::default())
    }
}

impl ItemStore {
    pub fn new(policy: CategoryPolicy) -> Self {
        Self {
            items: Vec::new(),
            next_id: ItemId::new(1),
            policy,
            version: 0,
        }
    }

    /// Build a store from pre-existing items, keeping their ids and order.
    ///
    /// Ids must be unique; the id counter resumes after the largest one.
    pub fn with_items(items: Vec<Item>, policy: CategoryPolicy) -> DomainResult<Self> {
        let mut seen = BTreeSet::new();
        let mut checked = Vec::with_capacity(items.len());
        for item in items {
            let id = item.id_typed();
            if id.get() == 0 {
                return Err(DomainError::invalid_id("ItemId: ids start at 1"));
            }
            if !seen.insert(id) {
                return Err(DomainError::conflict(format!("duplicate item id {id}")));
            }
            let draft = item.to_draft().validate()?;
            ensure_category_allowed(&policy, &draft.category)?;
            checked.push(Item::from_draft(id, draft));
        }

        let next_id = match seen.last() {
            Some(max) => max
                .next()
                .ok_or_else(|| DomainError::invalid_id(format!("ItemId: {max} leaves no id free")))?,
            None => ItemId::new(1),
        };
        Ok(Self {
            items: checked,
            next_id,
            policy,
            version: 0,
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id_typed() == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Id that the next added item will receive.
    pub fn next_id(&self) -> ItemId {
        self.next_id
    }

    pub fn policy(&self) -> &CategoryPolicy {
        &self.policy
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id_typed() == id)
    }
}

impl AggregateRoot for ItemStore {
    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddItem {
    pub draft: ItemDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EditItem. Replaces every editable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditItem {
    pub item_id: ItemId,
    pub draft: ItemDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItems. Unknown ids are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItems {
    pub item_ids: BTreeSet<ItemId>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetCategory. Unknown ids are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCategory {
    pub item_ids: BTreeSet<ItemId>,
    pub category: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InventoryCommand {
    AddItem(AddItem),
    EditItem(EditItem),
    RemoveItems(RemoveItems),
    SetCategory(SetCategory),
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item_id: ItemId,
    pub draft: ItemDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemEdited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEdited {
    pub item_id: ItemId,
    pub draft: ItemDraft,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CategoryChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChanged {
    pub item_id: ItemId,
    pub category: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InventoryEvent {
    ItemAdded(ItemAdded),
    ItemEdited(ItemEdited),
    ItemRemoved(ItemRemoved),
    CategoryChanged(CategoryChanged),
}

impl InventoryEvent {
    pub fn item_id(&self) -> ItemId {
        match self {
            InventoryEvent::ItemAdded(e) => e.item_id,
            InventoryEvent::ItemEdited(e) => e.item_id,
            InventoryEvent::ItemRemoved(e) => e.item_id,
            InventoryEvent::CategoryChanged(e) => e.item_id,
        }
    }
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemAdded(_) => "inventory.item.added",
            InventoryEvent::ItemEdited(_) => "inventory.item.edited",
            InventoryEvent::ItemRemoved(_) => "inventory.item.removed",
            InventoryEvent::CategoryChanged(_) => "inventory.item.category_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ItemAdded(e) => e.occurred_at,
            InventoryEvent::ItemEdited(e) => e.occurred_at,
            InventoryEvent::ItemRemoved(e) => e.occurred_at,
            InventoryEvent::CategoryChanged(e) => e.occurred_at,
        }
    }
}

impl Aggregate for ItemStore {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemAdded(e) => {
                self.items.push(Item::from_draft(e.item_id, e.draft.clone()));
                if e.item_id >= self.next_id {
                    if let Some(next) = e.item_id.next() {
                        self.next_id = next;
                    }
                }
            }
            InventoryEvent::ItemEdited(e) => {
                if let Some(pos) = self.position(e.item_id) {
                    self.items[pos].replace_fields(e.draft.clone());
                }
            }
            InventoryEvent::ItemRemoved(e) => {
                self.items.retain(|item| item.id_typed() != e.item_id);
            }
            InventoryEvent::CategoryChanged(e) => {
                if let Some(pos) = self.position(e.item_id) {
                    self.items[pos].set_category(e.category.clone());
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::AddItem(cmd) => self.handle_add(cmd),
            InventoryCommand::EditItem(cmd) => self.handle_edit(cmd),
            InventoryCommand::RemoveItems(cmd) => self.handle_remove(cmd),
            InventoryCommand::SetCategory(cmd) => self.handle_set_category(cmd),
        }
    }
}

fn ensure_category_allowed(policy: &CategoryPolicy, category: &str) -> DomainResult<()> {
    if policy.allows(category) {
        return Ok(());
    }
    Err(DomainError::validation(format!(
        "unknown category {category:?} (expected one of: {})",
        policy.known().join(", ")
    )))
}

impl ItemStore {
    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<InventoryEvent>, DomainError> {
        // The last id is never issued, so the counter always has a successor.
        if self.next_id.next().is_none() {
            return Err(DomainError::conflict("item id space exhausted"));
        }
        let draft = cmd.draft.clone().validate()?;
        ensure_category_allowed(&self.policy, &draft.category)?;

        Ok(vec![InventoryEvent::ItemAdded(ItemAdded {
            item_id: self.next_id,
            draft,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_edit(&self, cmd: &EditItem) -> Result<Vec<InventoryEvent>, DomainError> {
        if !self.contains(cmd.item_id) {
            return Err(DomainError::not_found(cmd.item_id));
        }
        let draft = cmd.draft.clone().validate()?;
        ensure_category_allowed(&self.policy, &draft.category)?;

        Ok(vec![InventoryEvent::ItemEdited(ItemEdited {
            item_id: cmd.item_id,
            draft,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveItems) -> Result<Vec<InventoryEvent>, DomainError> {
        Ok(cmd
            .item_ids
            .iter()
            .filter(|id| self.contains(**id))
            .map(|id| {
                InventoryEvent::ItemRemoved(ItemRemoved {
                    item_id: *id,
                    occurred_at: cmd.occurred_at,
                })
            })
            .collect())
    }

    fn handle_set_category(&self, cmd: &SetCategory) -> Result<Vec<InventoryEvent>, DomainError> {
        let category = parse_category(&cmd.category)?;
        ensure_category_allowed(&self.policy, &category)?;

        Ok(cmd
            .item_ids
            .iter()
            .filter(|id| self.contains(**id))
            .map(|id| {
                InventoryEvent::CategoryChanged(CategoryChanged {
                    item_id: *id,
                    category: category.clone(),
                    occurred_at: cmd.occurred_at,
                })
            })
            .collect())
    }
}

/// Convenience entry points mirroring the store operations one-to-one.
impl ItemStore {
    pub fn add(&mut self, draft: ItemDraft) -> DomainResult<Item> {
        let events = self.execute(&InventoryCommand::AddItem(AddItem {
            draft,
            occurred_at: Utc::now(),
        }))?;
        let id = events
            .first()
            .map(InventoryEvent::item_id)
            .ok_or_else(|| DomainError::invariant("add produced no event"))?;
        self.get(id)
            .cloned()
            .ok_or_else(|| DomainError::invariant("added item missing from store"))
    }

    pub fn edit(&mut self, id: ItemId, draft: ItemDraft) -> DomainResult<Item> {
        self.execute(&InventoryCommand::EditItem(EditItem {
            item_id: id,
            draft,
            occurred_at: Utc::now(),
        }))?;
        self.get(id).cloned().ok_or_else(|| DomainError::not_found(id))
    }

    /// Returns whether an item was removed.
    pub fn remove(&mut self, id: ItemId) -> bool {
        self.bulk_delete(&BTreeSet::from([id])) == 1
    }

    /// Returns the number of items removed.
    pub fn bulk_delete(&mut self, ids: &BTreeSet<ItemId>) -> usize {
        self.execute(&InventoryCommand::RemoveItems(RemoveItems {
            item_ids: ids.clone(),
            occurred_at: Utc::now(),
        }))
        .map_or(0, |events| events.len())
    }

    /// Returns the number of items whose category was overwritten.
    pub fn bulk_set_category(
        &mut self,
        ids: &BTreeSet<ItemId>,
        category: &str,
    ) -> DomainResult<usize> {
        let events = self.execute(&InventoryCommand::SetCategory(SetCategory {
            item_ids: ids.clone(),
            category: category.to_string(),
            occurred_at: Utc::now(),
        }))?;
        Ok(events.len())
    }
}
