//! Selection operations

use super::SceneState;

impl SceneState {
    /// Select an object by id, resolving it to its top-level ancestor.
    ///
    /// `None` clears the selection. Additive selection toggles membership;
    /// otherwise the selection is replaced. Unknown ids are ignored.
    pub fn select(&mut self, id: Option<&str>, additive: bool) {
        let Some(id) = id else {
            if !self.selection.is_empty() {
                self.selection.clear();
                self.version += 1;
            }
            return;
        };
        if !self.objects.contains(id) {
            tracing::debug!("Ignoring selection of unknown object {id}");
            return;
        }

        let top = self.objects.top_level_ancestor(id);
        if additive {
            self.selection.toggle(top);
        } else if self.selection.is_sole(&top) {
            return;
        } else {
            self.selection.select(top);
        }
        self.version += 1;
    }

    /// Select several objects at once (each resolved to its top-level ancestor)
    pub fn select_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let mut resolved: Vec<String> = Vec::new();
        for id in ids {
            if !self.objects.contains(id) {
                continue;
            }
            let top = self.objects.top_level_ancestor(id);
            if !resolved.contains(&top) {
                resolved.push(top);
            }
        }
        self.selection.replace(resolved);
        self.version += 1;
    }

    /// Clear selection
    pub fn clear_selection(&mut self) {
        self.select(None, false);
    }
}
