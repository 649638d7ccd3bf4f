use eco_domain::{ItemId, Point};
use std::collections::BTreeSet;

/// Multi-select set of toggled item categories. Membership only; no ordering semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    selected: BTreeSet<ItemId>,
}

impl ItemFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an absent id or removes a present one. Returns whether `id` is now selected.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Snapshot of the selected ids.
    #[must_use]
    pub fn current(&self) -> BTreeSet<ItemId> {
        self.selected.clone()
    }

    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// OR semantics: an empty filter admits every point.
    #[must_use]
    pub fn admits(&self, point: &Point) -> bool {
        admits(&self.selected, point)
    }
}

pub(crate) fn admits(selected: &BTreeSet<ItemId>, point: &Point) -> bool {
    selected.is_empty() || point.item_ids().any(|id| selected.contains(&id))
}

impl FromIterator<ItemId> for ItemFilter {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        Self { selected: iter.into_iter().collect() }
    }
}
