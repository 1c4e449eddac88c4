//! Per-field presentation state for editors.
//!
//! Tracks which fields are shown expanded. Entries are keyed by [`FieldId`],
//! so removing a field never shifts the state of the others.

use crate::contract::FieldId;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct FieldViewState {
    expanded: HashSet<FieldId>,
}

impl FieldViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly added field. New fields open expanded.
    pub fn on_added(&mut self, id: FieldId) {
        self.expanded.insert(id);
    }

    /// Flip the expansion of `id` and return the new state.
    pub fn toggle(&mut self, id: FieldId) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn is_expanded(&self, id: FieldId) -> bool {
        self.expanded.contains(&id)
    }

    /// Drop state for ids that are no longer in `ids`.
    pub fn retain_known(&mut self, ids: &[FieldId]) {
        self.expanded.retain(|id| ids.contains(id));
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }
}
