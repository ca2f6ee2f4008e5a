use crate::models::PropertyId;
use std::collections::BTreeSet;

/// Session-scoped set of favorited listing ids. Nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    ids: BTreeSet<PropertyId>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`, returning whether it is now a favorite
    pub fn toggle(&mut self, id: PropertyId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn is_favorite(&self, id: PropertyId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.ids.iter().copied()
    }
}
