//! Multi-select state for the login list

use std::collections::HashSet;
use std::hash::Hash;

/// Set of selected keys. Selecting twice keeps one entry, so a bulk delete can
/// never name the same record twice.
#[derive(Debug, Clone)]
pub struct SelectionTracker<K> {
    selected: HashSet<K>,
}

impl<K> Default for SelectionTracker<K> {
    fn default() -> Self {
        Self {
            selected: HashSet::new(),
        }
    }
}

impl<K: Eq + Hash> SelectionTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, key: K) {
        self.selected.insert(key);
    }

    pub fn deselect(&mut self, key: &K) {
        self.selected.remove(key);
    }

    /// Flip the selection state of `key`, returning the new state.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.selected.remove(&key) {
            false
        } else {
            self.selected.insert(key);
            true
        }
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Drop every key for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.selected.retain(|k| keep(k));
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.selected.iter()
    }
}
