//! Scene state management
//!
//! This module provides the object table, selection, clipboard and
//! undo/redo history. Every mutating operation lives in one of the
//! submodules as an `impl SceneState` block.

mod clipboard_ops;
mod display;
mod group_ops;
mod history;
mod object_ops;
mod persistence;
mod selection_ops;
mod transform_ops;
mod view_ops;

pub use clipboard_ops::PLACEMENT_MAX_ATTEMPTS;
pub use display::{object_display_name, shape_label, short_id};
pub use history::{History, Snapshot, HISTORY_LIMIT};
pub use object_ops::{Dimension, MaterialChannel};

use glam::DVec3;
use shared::{CadObject, ObjectId, ObjectTable, ShapeType, Transform};

use crate::geometry::{self, Aabb};

use super::selection::SelectionState;
use super::settings::EditorSettings;
use super::view::{ScreenshotHandler, ViewControls};

/// Shape armed for the next `create_object`
#[derive(Debug, Clone, PartialEq)]
pub struct PendingShape {
    pub shape: ShapeType,
    pub color: String,
}

/// The editing engine: authoritative objects, selection and history
#[derive(Default)]
pub struct SceneState {
    /// Live object table
    pub(crate) objects: ObjectTable,
    /// Top-level selection
    pub(crate) selection: SelectionState,
    /// Copied subtrees keyed by their original ids
    pub(crate) clipboard: Option<ObjectTable>,
    pub(crate) pending_shape: Option<ShapeType>,
    pub(crate) pending_color: Option<String>,
    pub(crate) settings: EditorSettings,
    /// Last pointer intersection with the ground plane
    pub(crate) last_pointer: [f64; 3],
    pub(crate) history: History,
    /// Monotonically increasing version counter for cache invalidation
    pub(crate) version: u64,
    pub(crate) view: Option<Box<dyn ViewControls>>,
    pub(crate) screenshot: Option<ScreenshotHandler>,
}

impl SceneState {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Start from an existing table, with empty history
    pub fn from_objects(objects: ObjectTable) -> Self {
        Self {
            objects,
            ..Self::default()
        }
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    pub fn object(&self, id: &str) -> Option<&CadObject> {
        self.objects.get(id)
    }

    pub fn selection(&self) -> &[ObjectId] {
        self.selection.all()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn snap_size(&self) -> f64 {
        self.settings.snap_size
    }

    /// Change the grid snap unit; ignores non-positive values
    pub fn set_snap_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.settings.snap_size = size;
        }
    }

    pub fn pending_shape(&self) -> Option<PendingShape> {
        self.pending_shape.map(|shape| PendingShape {
            shape,
            color: self.pending_color(),
        })
    }

    pub(crate) fn pending_color(&self) -> String {
        self.pending_color
            .clone()
            .unwrap_or_else(|| self.settings.default_color.clone())
    }

    pub fn clipboard_len(&self) -> usize {
        self.clipboard.as_ref().map_or(0, ObjectTable::len)
    }

    pub fn last_pointer(&self) -> [f64; 3] {
        self.last_pointer
    }

    /// Remember where the pointer meets the ground (paste target)
    pub fn set_last_pointer(&mut self, position: [f64; 3]) {
        self.last_pointer = position;
    }

    /// World pose of an object, composed through its ancestors
    pub fn world_transform(&self, id: &str) -> Option<Transform> {
        geometry::world_transform(&self.objects, id)
    }

    /// World bounds of an object's subtree
    pub fn world_aabb(&self, id: &str) -> Option<Aabb> {
        let index = self.objects.child_index();
        geometry::subtree_aabb(&self.objects, &index, id, DVec3::ZERO)
    }

    /// World bounds of the whole selection
    pub fn selection_aabb(&self) -> Option<Aabb> {
        let index = self.objects.child_index();
        geometry::union_aabb(&self.objects, &index, self.selection.all(), DVec3::ZERO)
    }

    // ── History ───────────────────────────────────────────────

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            objects: self.objects.clone(),
            selection: self.selection.all().to_vec(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.objects = snapshot.objects;
        self.selection.replace(snapshot.selection);
        self.version += 1;
    }

    /// Push the current state onto the undo stack and drop the redo branch.
    ///
    /// Call once before a mutation. Drag gestures call it (or `begin_drag`)
    /// at gesture start, then use the non-recording field setters per frame.
    pub fn record(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
    }

    /// Undo last change
    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(prev) => {
                self.restore(prev);
                true
            }
            None => false,
        }
    }

    /// Redo last undone change
    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    pub(crate) fn new_id() -> ObjectId {
        uuid::Uuid::new_v4().to_string()
    }
}
