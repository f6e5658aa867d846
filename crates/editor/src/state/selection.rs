use shared::ObjectId;

/// Object selection state (supports multi-select).
///
/// Holds top-level ids only; `SceneState::select` resolves children to
/// their outermost ancestor before they get here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Selected object IDs (in order of selection)
    selected: Vec<ObjectId>,
}

impl SelectionState {
    /// All selected objects
    pub fn all(&self) -> &[ObjectId] {
        &self.selected
    }

    /// Check if an object is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Whether `id` is the one and only selected object
    pub fn is_sole(&self, id: &str) -> bool {
        self.selected.len() == 1 && self.selected[0] == id
    }

    /// Select a single object (clears previous selection)
    pub fn select(&mut self, id: ObjectId) {
        self.selected.clear();
        self.selected.push(id);
    }

    /// Toggle selection (Shift+click behavior)
    pub fn toggle(&mut self, id: ObjectId) {
        if let Some(pos) = self.selected.iter().position(|s| s == &id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
    }

    /// Replace the whole selection
    pub fn replace(&mut self, ids: Vec<ObjectId>) {
        self.selected = ids;
    }

    /// Clear all selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Number of selected objects
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
