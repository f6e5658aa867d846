//! Group and ungroup operations

use glam::{DMat4, DVec3};
use shared::{CadObject, ObjectId, Transform};

use crate::geometry;

use super::SceneState;

impl SceneState {
    /// Wrap the selected top-level objects in a new group centered on the
    /// mean of their positions. World poses are unchanged.
    ///
    /// Needs at least two existing selected objects; returns the group id.
    pub fn group_selected(&mut self) -> Option<ObjectId> {
        let members: Vec<ObjectId> = self
            .selection
            .all()
            .iter()
            .filter(|id| self.objects.contains(id))
            .cloned()
            .collect();
        if members.len() < 2 {
            return None;
        }

        let center = members
            .iter()
            .filter_map(|id| self.objects.get(id))
            .map(|obj| DVec3::from_array(obj.transform.position))
            .sum::<DVec3>()
            / members.len() as f64;

        self.record();
        let group_id = Self::new_id();
        let mut objects = self.objects.clone();
        objects.insert(CadObject::group(
            group_id.clone(),
            Transform::at(center.to_array()),
        ));
        for id in &members {
            if let Some(obj) = objects.get_mut(id) {
                let local = DVec3::from_array(obj.transform.position) - center;
                obj.transform.position = local.to_array();
                obj.parent_id = Some(group_id.clone());
            }
        }
        self.objects = objects;
        self.selection.select(group_id.clone());
        self.version += 1;
        tracing::debug!("Grouped {} objects into {group_id}", members.len());
        Some(group_id)
    }

    /// Dissolve every selected group, baking its transform into its children.
    ///
    /// Children move up to the group's own parent. The freed children become
    /// the selection. Returns their ids (empty if no group was selected).
    pub fn ungroup_selected(&mut self) -> Vec<ObjectId> {
        let groups: Vec<ObjectId> = self
            .selection
            .all()
            .iter()
            .filter(|id| self.objects.get(id).is_some_and(CadObject::is_group))
            .cloned()
            .collect();
        if groups.is_empty() {
            return Vec::new();
        }

        self.record();
        let index = self.objects.child_index();
        let mut objects = self.objects.clone();
        let mut freed = Vec::new();

        for group_id in &groups {
            let new_parent = self
                .objects
                .parent_of(group_id)
                .map(|parent| parent.id.clone());
            let parent_inverse = new_parent
                .as_deref()
                .and_then(|p| geometry::object_world_matrix(&self.objects, p))
                .map_or(DMat4::IDENTITY, |m| m.inverse());

            for child_id in index.children_of(group_id) {
                let Some(world) = geometry::object_world_matrix(&self.objects, child_id) else {
                    continue;
                };
                if let Some(child) = objects.get_mut(child_id) {
                    child.transform = geometry::decompose(&(parent_inverse * world));
                    child.parent_id = new_parent.clone();
                    freed.push(child_id.clone());
                }
            }
            objects.remove(group_id);
        }

        self.objects = objects;
        self.selection.replace(freed.clone());
        self.version += 1;
        tracing::debug!("Ungrouped {} groups, freed {} objects", groups.len(), freed.len());
        freed
    }
}
