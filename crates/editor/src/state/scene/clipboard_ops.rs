//! Copy/paste/duplicate and collision-avoiding placement

use std::collections::HashMap;

use glam::DVec3;
use shared::{ChildIndex, ObjectId, ObjectTable};

use crate::geometry::{self, Aabb};

use super::SceneState;

/// Upper bound on candidate offsets tried by `duplicate_selected`
pub const PLACEMENT_MAX_ATTEMPTS: usize = 50;

impl SceneState {
    /// Copy the selection and all descendants to the clipboard.
    /// Returns the number of objects copied; an empty selection keeps the
    /// previous clipboard.
    pub fn copy_selected(&mut self) -> usize {
        let copied = self.objects.extract_subtrees(self.selection.all());
        if copied.is_empty() {
            return 0;
        }
        let count = copied.len();
        self.clipboard = Some(copied);
        tracing::debug!("Copied {count} objects");
        count
    }

    /// Paste the clipboard with its centroid at `target`, then drop it onto
    /// the ground. The pasted roots become the selection.
    pub fn paste(&mut self, target: [f64; 3]) -> Vec<ObjectId> {
        let Some(clipboard) = self.clipboard.as_ref().filter(|c| !c.is_empty()) else {
            return Vec::new();
        };
        let (clones, roots) = clone_with_fresh_ids(clipboard);

        let centroid = roots
            .iter()
            .filter_map(|id| clones.get(id))
            .map(|obj| DVec3::from_array(obj.transform.position))
            .sum::<DVec3>()
            / roots.len().max(1) as f64;
        let offset = DVec3::from_array(target) - centroid;

        self.record();
        let mut objects = self.objects.clone();
        for obj in clones.iter() {
            objects.insert(obj.clone());
        }
        shift_roots(&mut objects, &roots, offset);
        let index = objects.child_index();
        let lift = ground_lift(&objects, &index, &roots);
        shift_roots(&mut objects, &roots, DVec3::new(0.0, lift, 0.0));

        self.objects = objects;
        self.selection.replace(roots.clone());
        self.version += 1;
        tracing::debug!("Pasted {} objects", clones.len());
        roots
    }

    /// Paste at the last recorded ground-plane pointer position
    pub fn paste_at_pointer(&mut self) -> Vec<ObjectId> {
        self.paste(self.last_pointer)
    }

    /// Clone the selection beside itself without overlapping existing roots.
    ///
    /// Candidate offsets march along +X, each already dropped onto the ground,
    /// until one clears every padded obstacle or the attempt budget runs out
    /// (the last candidate is then taken). The selection is copied to the
    /// clipboard first.
    pub fn duplicate_selected(&mut self) -> Vec<ObjectId> {
        let sources = self.objects.extract_subtrees(self.selection.all());
        if sources.is_empty() {
            return Vec::new();
        }
        let selected: Vec<ObjectId> = self
            .selection
            .all()
            .iter()
            .filter(|id| self.objects.contains(id))
            .cloned()
            .collect();

        let index = self.objects.child_index();
        let offset = self.find_placement(&index, &selected);
        let (clones, roots) = clone_with_fresh_ids(&sources);
        self.clipboard = Some(sources);

        self.record();
        let mut objects = self.objects.clone();
        for obj in clones.iter() {
            objects.insert(obj.clone());
        }
        shift_roots(&mut objects, &roots, offset);

        self.objects = objects;
        self.selection.replace(roots.clone());
        self.version += 1;
        tracing::debug!("Duplicated {} objects, offset {offset:?}", clones.len());
        roots
    }

    /// Offset (ground snap included) that moves `selected` clear of every root
    fn find_placement(&self, index: &ChildIndex, selected: &[ObjectId]) -> DVec3 {
        let snap = self.settings.snap_size;
        let padding = snap * 2.0;
        let obstacles: Vec<Aabb> = self
            .objects
            .roots()
            .filter_map(|root| geometry::subtree_aabb(&self.objects, index, &root.id, DVec3::ZERO))
            .map(|aabb| aabb.expanded(padding / 2.0))
            .collect();

        let size = geometry::union_aabb(&self.objects, index, selected, DVec3::ZERO)
            .map_or(DVec3::ZERO, |aabb| aabb.size());
        let step = size.x.max(snap);

        let mut offset = DVec3::new(step + padding, 0.0, 0.0);
        for attempt in 0..PLACEMENT_MAX_ATTEMPTS {
            let Some(candidate) = geometry::union_aabb(&self.objects, index, selected, offset)
            else {
                return offset;
            };
            let grounded = DVec3::new(offset.x, offset.y - candidate.min.y, offset.z);
            let candidate = candidate.translated(grounded - offset);
            if !obstacles.iter().any(|o| o.intersects(&candidate)) {
                return grounded;
            }
            if attempt + 1 == PLACEMENT_MAX_ATTEMPTS {
                tracing::warn!("No free spot after {PLACEMENT_MAX_ATTEMPTS} attempts; placing anyway");
                return grounded;
            }
            offset.x += step / 2.0;
        }
        offset
    }
}

/// Copies of every clipboard object under new ids with parent links remapped.
/// Objects whose parent was not copied become roots; their new ids are
/// returned alongside.
fn clone_with_fresh_ids(source: &ObjectTable) -> (ObjectTable, Vec<ObjectId>) {
    let id_map: HashMap<&str, ObjectId> = source
        .ids()
        .map(|id| (id.as_str(), SceneState::new_id()))
        .collect();

    let mut clones = ObjectTable::new();
    let mut roots = Vec::new();
    for obj in source.iter() {
        let mut copy = obj.clone();
        copy.id = id_map[obj.id.as_str()].clone();
        copy.parent_id = obj
            .parent_id
            .as_deref()
            .and_then(|p| id_map.get(p))
            .cloned();
        if copy.parent_id.is_none() {
            roots.push(copy.id.clone());
        }
        clones.insert(copy);
    }
    (clones, roots)
}

fn shift_roots(objects: &mut ObjectTable, roots: &[ObjectId], offset: DVec3) {
    for id in roots {
        if let Some(obj) = objects.get_mut(id) {
            let moved = DVec3::from_array(obj.transform.position) + offset;
            obj.transform.position = moved.to_array();
        }
    }
}

/// Vertical shift that puts the lowest point of `roots` on y = 0
fn ground_lift(objects: &ObjectTable, index: &ChildIndex, roots: &[ObjectId]) -> f64 {
    geometry::union_aabb(objects, index, roots, DVec3::ZERO).map_or(0.0, |aabb| -aabb.min.y)
}
