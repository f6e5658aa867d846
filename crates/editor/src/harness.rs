//! Headless test harness for programmatic scene manipulation.
//!
//! Drives a `SceneState` the way the viewport would: pointer positions on the
//! ground plane, click selection, toolbar actions.

use shared::{CadObject, ObjectId, ProjectError, ShapeType};

use crate::geometry::Aabb;
use crate::state::{EditorSettings, SceneState};

/// Headless test harness around one editing session
pub struct TestHarness {
    pub scene: SceneState,
}

impl TestHarness {
    /// Create a new empty harness.
    pub fn new() -> Self {
        Self {
            scene: SceneState::new(EditorSettings::default()),
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Arm `shape` and click the ground at `(x, z)`; returns the new id
    pub fn create(&mut self, shape: ShapeType, x: f64, z: f64) -> ObjectId {
        self.scene.set_pending_shape(Some(shape), None);
        self.scene.set_last_pointer([x, 0.0, z]);
        self.scene
            .create_object([x, 0.0, z])
            .unwrap_or_default()
    }

    pub fn create_box(&mut self, x: f64, z: f64) -> ObjectId {
        self.create(ShapeType::Box, x, z)
    }

    pub fn create_sphere(&mut self, x: f64, z: f64) -> ObjectId {
        self.create(ShapeType::Sphere, x, z)
    }

    /// Load a project from JSON string
    pub fn load_project_json(&mut self, json: &str) -> Result<(), ProjectError> {
        self.scene.load_project(json)
    }

    /// Export the current project as JSON
    pub fn export_project_json(&self) -> String {
        self.scene.export_project().unwrap_or_default()
    }

    /// Delete the current selection
    pub fn delete_selected(&mut self) -> Vec<ObjectId> {
        self.scene.delete_selected()
    }

    pub fn group(&mut self) -> Option<ObjectId> {
        self.scene.group_selected()
    }

    pub fn ungroup(&mut self) -> Vec<ObjectId> {
        self.scene.ungroup_selected()
    }

    /// Copy the selection, then paste at the last pointer position
    pub fn copy_paste(&mut self) -> Vec<ObjectId> {
        self.scene.copy_selected();
        self.scene.paste_at_pointer()
    }

    pub fn duplicate(&mut self) -> Vec<ObjectId> {
        self.scene.duplicate_selected()
    }

    /// Undo the last operation
    pub fn undo(&mut self) -> bool {
        self.scene.undo()
    }

    /// Redo the last undone operation
    pub fn redo(&mut self) -> bool {
        self.scene.redo()
    }

    // ── Selection ─────────────────────────────────────────────

    /// Click an object (replaces the selection)
    pub fn click(&mut self, id: &str) {
        self.scene.select(Some(id), false);
    }

    /// Shift-click an object
    pub fn shift_click(&mut self, id: &str) {
        self.scene.select(Some(id), true);
    }

    pub fn select_all(&mut self) {
        let roots: Vec<ObjectId> = self.scene.objects().roots().map(|o| o.id.clone()).collect();
        self.scene.select_many(roots.iter().map(String::as_str));
    }

    /// Clear selection
    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
    }

    // ── Inspection ────────────────────────────────────────────

    /// Number of objects in the scene
    pub fn object_count(&self) -> usize {
        self.scene.objects().len()
    }

    pub fn root_count(&self) -> usize {
        self.scene.objects().roots().count()
    }

    pub fn object(&self, id: &str) -> Option<&CadObject> {
        self.scene.object(id)
    }

    pub fn selection(&self) -> Vec<ObjectId> {
        self.scene.selection().to_vec()
    }

    pub fn world_position(&self, id: &str) -> Option<[f64; 3]> {
        self.scene.world_transform(id).map(|t| t.position)
    }

    pub fn world_aabb(&self, id: &str) -> Option<Aabb> {
        self.scene.world_aabb(id)
    }

    /// Objects whose parent id names no object
    pub fn dangling_parents(&self) -> Vec<ObjectId> {
        let objects = self.scene.objects();
        objects
            .iter()
            .filter(|o| o.parent_id.as_ref().is_some_and(|p| !objects.contains(p)))
            .map(|o| o.id.clone())
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
