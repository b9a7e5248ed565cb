use std::collections::HashSet;
use uuid::Uuid;

/// Selection status relative to the visible (filtered) records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Partial,
    All,
}

/// Records marked for bulk action.
///
/// The state is derived from `selected` against `visible` on demand. Changing the
/// visible set does not drop selected ids that fall outside it.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<Uuid>,
    visible: Vec<Uuid>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_visible(&mut self, visible: Vec<Uuid>) {
        self.visible = visible;
    }

    pub fn visible(&self) -> &[Uuid] {
        &self.visible
    }

    /// Adds `id` if absent, removes it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Selection becomes exactly the visible set.
    pub fn select_all(&mut self) {
        self.selected = self.visible.iter().copied().collect();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    pub fn remove(&mut self, id: &Uuid) -> bool {
        self.visible.retain(|v| v != id);
        self.selected.remove(id)
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &Uuid> {
        self.selected.iter()
    }

    pub fn state(&self) -> SelectionState {
        if self.selected.is_empty() {
            return SelectionState::None;
        }
        // Extra selections hidden by the filter do not prevent `All`.
        let all_visible_selected = !self.visible.is_empty()
            && self.visible.iter().all(|id| self.selected.contains(id));
        if all_visible_selected {
            SelectionState::All
        } else {
            SelectionState::Partial
        }
    }
}
