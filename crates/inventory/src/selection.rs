//! Selection set for bulk actions.

use std::collections::BTreeSet;

use stockroom_core::ItemId;

/// Item ids currently marked for a bulk action.
///
/// The set outlives page changes: ids selected on one page stay selected while the
/// user looks at another.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSet {
    ids: BTreeSet<ItemId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one id. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn select(&mut self, id: ItemId) {
        self.ids.insert(id);
    }

    pub fn deselect(&mut self, id: ItemId) {
        self.ids.remove(&id);
    }

    /// Select-all over the visible page, with replace semantics.
    ///
    /// If every visible id is already selected the whole set is cleared; otherwise the
    /// set becomes exactly the visible ids. Returns whether anything is selected
    /// afterwards.
    pub fn select_all(&mut self, visible: &[ItemId]) -> bool {
        let all_selected = !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id));
        if all_selected {
            self.ids.clear();
        } else {
            self.ids = visible.iter().copied().collect();
        }
        !self.ids.is_empty()
    }

    /// True when the visible page is non-empty and fully selected.
    pub fn covers(&self, visible: &[ItemId]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id))
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &BTreeSet<ItemId> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Remove and return every selected id.
    pub fn take(&mut self) -> BTreeSet<ItemId> {
        std::mem::take(&mut self.ids)
    }

    /// Drop ids for which `exists` returns false.
    pub fn retain_existing(&mut self, exists: impl Fn(ItemId) -> bool) {
        self.ids.retain(|id| exists(*id));
    }
}
