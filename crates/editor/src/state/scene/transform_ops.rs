//! Transform/drag operations
//!
//! The field setters here never record history: they run once per pointer
//! event during a drag. The gesture records once at its start.

use shared::Transform;

use super::SceneState;

impl SceneState {
    /// Save undo state once at the beginning of a drag operation
    pub fn begin_drag(&mut self) {
        self.record();
        if let Some(view) = self.view.as_mut() {
            view.set_orbit_enabled(false);
        }
        self.version += 1;
    }

    /// Finish a drag; records nothing
    pub fn end_drag(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.set_orbit_enabled(true);
        }
    }

    fn edit_transform(&mut self, id: &str, edit: impl FnOnce(&mut Transform)) -> bool {
        match self.objects.get_mut(id) {
            Some(obj) => {
                edit(&mut obj.transform);
                self.version += 1;
                true
            }
            None => false,
        }
    }

    pub fn set_position(&mut self, id: &str, position: [f64; 3]) -> bool {
        self.edit_transform(id, |t| t.position = position)
    }

    pub fn set_rotation(&mut self, id: &str, rotation: [f64; 3]) -> bool {
        self.edit_transform(id, |t| t.rotation = rotation)
    }

    pub fn set_scale(&mut self, id: &str, scale: [f64; 3]) -> bool {
        self.edit_transform(id, |t| t.scale = scale)
    }

    pub fn set_transform(&mut self, id: &str, transform: Transform) -> bool {
        self.edit_transform(id, |t| *t = transform)
    }
}
