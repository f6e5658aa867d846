//! Object CRUD and property edits

use serde::{Deserialize, Serialize};
use shared::{CadObject, ObjectId, PropertiesPatch, ShapeProperties, ShapeType, Transform};

use crate::geometry;

use super::SceneState;

/// Smallest length a dimension edit may produce
const MIN_DIMENSION: f64 = 0.01;
const GEAR_MIN_TEETH: f64 = 6.0;
const GEAR_MAX_TEETH: f64 = 32.0;

/// Dimension addressed by a resize handle or property field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Width,
    Height,
    Depth,
    Radius,
}

/// Material slider channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialChannel {
    Metalness,
    Roughness,
}

impl SceneState {
    /// Arm (or disarm with `None`) the shape the next `create_object` builds.
    /// Groups are not creatable this way.
    pub fn set_pending_shape(&mut self, shape: Option<ShapeType>, color: Option<String>) {
        if shape == Some(ShapeType::Group) {
            tracing::warn!("Refusing to arm a group as pending shape");
            return;
        }
        self.pending_shape = shape;
        if let Some(color) = color {
            self.pending_color = Some(color);
        }
    }

    /// Create the pending shape resting on the ground at `ground`.
    ///
    /// The new object becomes the sole selection. Returns `None` (and records
    /// nothing) when no shape is pending.
    pub fn create_object(&mut self, ground: [f64; 3]) -> Option<ObjectId> {
        let shape = self.pending_shape?;
        self.record();

        let half_height = geometry::shape_extents(&ShapeProperties::defaults(shape))
            .map_or(0.5, |size| size.y / 2.0);
        let id = Self::new_id();
        let object = CadObject::new(
            id.clone(),
            shape,
            Transform::at([ground[0], half_height, ground[2]]),
            self.pending_color(),
        );
        self.objects.insert(object);
        self.selection.select(id.clone());
        self.pending_shape = None;
        self.version += 1;
        tracing::debug!("Created {shape:?} {id}");
        Some(id)
    }

    /// Shape-aware dimension edit; resets scale to unit so the property,
    /// not a scale factor, carries the size.
    ///
    /// Returns false (recording nothing) for a missing object, a dimension
    /// the shape does not have, or a non-finite / non-positive value.
    pub fn set_dimension(&mut self, id: &str, dimension: Dimension, value: f64) -> bool {
        if !value.is_finite() || value <= 0.0 {
            return false;
        }
        let Some(obj) = self.objects.get(id) else {
            return false;
        };
        let mut properties = obj.properties.clone();
        if !resize(&mut properties, dimension, value) {
            return false;
        }

        self.record();
        if let Some(obj) = self.objects.get_mut(id) {
            obj.properties = properties;
            obj.transform.scale = [1.0, 1.0, 1.0];
        }
        self.version += 1;
        true
    }

    /// Delete the selection and every descendant; clears selection.
    /// Returns removed ids (empty when nothing was selected).
    pub fn delete_selected(&mut self) -> Vec<ObjectId> {
        let removed = self.objects.collect_subtrees(self.selection.all());
        if removed.is_empty() {
            return removed;
        }

        self.record();
        let mut objects = self.objects.clone();
        for id in &removed {
            objects.remove(id);
        }
        self.objects = objects;
        self.selection.clear();
        self.version += 1;
        tracing::debug!("Deleted {} objects", removed.len());
        removed
    }

    /// Mirror each selected object about its local X axis
    pub fn mirror_selected(&mut self) -> bool {
        let targets: Vec<ObjectId> = self
            .selection
            .all()
            .iter()
            .filter(|id| self.objects.contains(id))
            .cloned()
            .collect();
        if targets.is_empty() {
            return false;
        }

        self.record();
        for id in &targets {
            if let Some(obj) = self.objects.get_mut(id) {
                obj.transform.scale[0] = -obj.transform.scale[0];
            }
        }
        self.version += 1;
        true
    }

    pub fn set_color(&mut self, id: &str, color: &str) -> bool {
        match self.objects.get(id) {
            Some(obj) if obj.color != color => {}
            _ => return false,
        }
        self.record();
        if let Some(obj) = self.objects.get_mut(id) {
            obj.color = color.to_string();
        }
        self.version += 1;
        true
    }

    pub fn set_hole(&mut self, id: &str, is_hole: bool) -> bool {
        match self.objects.get(id) {
            Some(obj) if obj.is_hole != is_hole => {}
            _ => return false,
        }
        self.record();
        if let Some(obj) = self.objects.get_mut(id) {
            obj.is_hole = is_hole;
        }
        self.version += 1;
        true
    }

    /// Continuous slider edit, clamped to [0, 1]; does not record
    pub fn set_material(&mut self, id: &str, channel: MaterialChannel, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let Some(obj) = self.objects.get_mut(id) else {
            return false;
        };
        let value = value.clamp(0.0, 1.0);
        match channel {
            MaterialChannel::Metalness => obj.metalness = value,
            MaterialChannel::Roughness => obj.roughness = value,
        }
        self.version += 1;
        true
    }

    /// Merge a partial property set into an object's shape properties
    pub fn update_properties(&mut self, id: &str, patch: &PropertiesPatch) -> bool {
        let Some(obj) = self.objects.get(id) else {
            return false;
        };
        let mut properties = obj.properties.clone();
        if !properties.apply_patch(patch) {
            return false;
        }

        self.record();
        if let Some(obj) = self.objects.get_mut(id) {
            obj.properties = properties;
        }
        self.version += 1;
        true
    }
}

/// Apply a dimension edit to a property set. Returns false if the shape has
/// no such dimension.
fn resize(properties: &mut ShapeProperties, dimension: Dimension, value: f64) -> bool {
    let half = (value / 2.0).max(MIN_DIMENSION);
    let value = value.max(MIN_DIMENSION);
    match (properties, dimension) {
        (ShapeProperties::Box { width, .. }, Dimension::Width) => *width = value,
        (ShapeProperties::Box { height, .. }, Dimension::Height) => *height = value,
        (ShapeProperties::Box { depth, .. }, Dimension::Depth) => *depth = value,

        (ShapeProperties::Sphere { radius, .. }, Dimension::Radius) => *radius = value,
        (ShapeProperties::Sphere { radius, .. }, _) => *radius = half,

        (ShapeProperties::Cylinder { height, .. }, Dimension::Height) => *height = value,
        (
            ShapeProperties::Cylinder {
                radius_top,
                radius_bottom,
                ..
            },
            Dimension::Width | Dimension::Depth,
        ) => {
            let widest = radius_top.max(*radius_bottom);
            if widest > 0.0 {
                let ratio = half / widest;
                *radius_top *= ratio;
                *radius_bottom *= ratio;
            } else {
                *radius_top = half;
                *radius_bottom = half;
            }
        }

        (ShapeProperties::Cone { height, .. }, Dimension::Height)
        | (ShapeProperties::Pyramid { height, .. }, Dimension::Height) => *height = value,
        (ShapeProperties::Cone { radius, .. }, Dimension::Radius)
        | (ShapeProperties::Pyramid { radius, .. }, Dimension::Radius) => *radius = value,
        (ShapeProperties::Cone { radius, .. }, Dimension::Width | Dimension::Depth)
        | (ShapeProperties::Pyramid { radius, .. }, Dimension::Width | Dimension::Depth) => {
            *radius = half
        }

        (ShapeProperties::Torus { radius, .. }, Dimension::Radius) => *radius = value,
        (ShapeProperties::Torus { radius, tube, .. }, Dimension::Width | Dimension::Height) => {
            *radius = (value / 2.0 - *tube).max(MIN_DIMENSION)
        }
        (ShapeProperties::Torus { tube, .. }, Dimension::Depth) => *tube = half,

        (ShapeProperties::Gear { height, .. }, Dimension::Height) => *height = value,
        // The radial value is a diameter
        (ShapeProperties::Gear { radius, teeth, .. }, _) => {
            let old = if *radius > 0.0 { *radius } else { 1.0 };
            let old_teeth = if *teeth > 0 { *teeth } else { 12 };
            *teeth = (f64::from(old_teeth) * (half / old).sqrt())
                .round()
                .clamp(GEAR_MIN_TEETH, GEAR_MAX_TEETH) as u32;
            *radius = half;
        }

        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{box_at, child_of, group_at, sphere_at, table};
    use approx::assert_relative_eq;

    fn gear(radius: f64, teeth: u32) -> ShapeProperties {
        ShapeProperties::Gear {
            radius,
            height: 0.4,
            teeth,
        }
    }

    #[test]
    fn test_create_without_pending_is_noop() {
        let mut s = SceneState::default();
        assert!(s.create_object([0.0, 0.0, 0.0]).is_none());
        assert_eq!(s.undo_depth(), 0);
        assert!(s.objects().is_empty());
    }

    #[test]
    fn test_create_box_rests_on_ground() {
        let mut s = SceneState::default();
        s.set_pending_shape(Some(ShapeType::Box), None);
        let id = s.create_object([0.0, 0.0, 0.0]).unwrap();
        let obj = s.object(&id).unwrap();
        assert_eq!(obj.transform.position, [0.0, 1.0, 0.0]);
        assert_eq!(obj.color, "#cccccc");
        assert_eq!(s.selection(), &[id]);
        assert!(s.pending_shape().is_none());
        assert_eq!(s.undo_depth(), 1);
    }

    #[test]
    fn test_create_uses_pending_color_and_ignores_ground_height() {
        let mut s = SceneState::default();
        s.set_pending_shape(Some(ShapeType::Gear), Some("#ff0000".to_string()));
        let id = s.create_object([2.0, 7.0, -1.0]).unwrap();
        let obj = s.object(&id).unwrap();
        assert_relative_eq!(obj.transform.position[1], 0.2);
        assert_eq!(obj.transform.position[0], 2.0);
        assert_eq!(obj.color, "#ff0000");
    }

    #[test]
    fn test_group_cannot_be_pending() {
        let mut s = SceneState::default();
        s.set_pending_shape(Some(ShapeType::Group), None);
        assert!(s.pending_shape().is_none());
    }

    #[test]
    fn test_gear_radius_recounts_teeth() {
        let mut p = gear(1.0, 12);
        assert!(resize(&mut p, Dimension::Radius, 8.0));
        // radius 4, 12 * sqrt(4) = 24
        assert_eq!(p, gear(4.0, 24));

        let mut p = gear(1.0, 12);
        resize(&mut p, Dimension::Radius, 50.0);
        assert_eq!(p, gear(25.0, 32));

        let mut p = gear(1.0, 12);
        resize(&mut p, Dimension::Radius, 0.2);
        assert_eq!(p, gear(0.1, 6));
    }

    #[test]
    fn test_gear_height_only_changes_height() {
        let mut p = gear(1.0, 12);
        resize(&mut p, Dimension::Height, 1.5);
        assert_eq!(
            p,
            ShapeProperties::Gear {
                radius: 1.0,
                height: 1.5,
                teeth: 12
            }
        );
    }

    #[test]
    fn test_sphere_width_keeps_radius_in_sync() {
        let mut p = ShapeProperties::defaults(ShapeType::Sphere);
        resize(&mut p, Dimension::Width, 5.0);
        assert!(matches!(p, ShapeProperties::Sphere { radius, .. } if radius == 2.5));
    }

    #[test]
    fn test_box_has_no_radius() {
        let mut p = ShapeProperties::defaults(ShapeType::Box);
        assert!(!resize(&mut p, Dimension::Radius, 5.0));
    }

    #[test]
    fn test_cylinder_width_keeps_taper() {
        let mut p = ShapeProperties::Cylinder {
            radius_top: 0.5,
            radius_bottom: 1.0,
            height: 2.0,
            radial_segments: 32,
        };
        resize(&mut p, Dimension::Width, 4.0);
        match p {
            ShapeProperties::Cylinder {
                radius_top,
                radius_bottom,
                ..
            } => {
                assert_relative_eq!(radius_top, 1.0);
                assert_relative_eq!(radius_bottom, 2.0);
            }
            _ => panic!("Expected Cylinder"),
        }
    }

    #[test]
    fn test_set_dimension_resets_scale_and_records() {
        let mut s = SceneState::from_objects(table(vec![box_at("a", [0.0, 1.0, 0.0])]));
        s.set_scale("a", [3.0, 3.0, 3.0]);
        assert!(s.set_dimension("a", Dimension::Width, 6.0));
        let obj = s.object("a").unwrap();
        assert_eq!(obj.transform.scale, [1.0, 1.0, 1.0]);
        assert!(matches!(obj.properties, ShapeProperties::Box { width, .. } if width == 6.0));
        assert_eq!(s.undo_depth(), 1);
    }

    #[test]
    fn test_invalid_dimension_edit_is_history_neutral() {
        let mut s = SceneState::from_objects(table(vec![box_at("a", [0.0, 1.0, 0.0])]));
        assert!(!s.set_dimension("a", Dimension::Radius, 2.0));
        assert!(!s.set_dimension("a", Dimension::Width, -1.0));
        assert!(!s.set_dimension("a", Dimension::Width, f64::NAN));
        assert!(!s.set_dimension("ghost", Dimension::Width, 2.0));
        assert_eq!(s.undo_depth(), 0);
    }

    #[test]
    fn test_delete_cascades() {
        let mut s = SceneState::from_objects(table(vec![
            group_at("g", [0.0, 0.0, 0.0]),
            child_of(group_at("inner", [0.0, 0.0, 0.0]), "g"),
            child_of(box_at("leaf", [0.0, 1.0, 0.0]), "inner"),
            sphere_at("keep", [5.0, 1.0, 0.0]),
        ]));
        s.select(Some("leaf"), false);
        let removed = s.delete_selected();
        assert_eq!(removed.len(), 3);
        assert_eq!(s.objects().len(), 1);
        assert!(s.selection().is_empty());
        assert!(s
            .objects()
            .iter()
            .all(|o| !o.parent_id.as_ref().is_some_and(|p| !s.objects().contains(p))));
    }

    #[test]
    fn test_delete_empty_selection_is_noop() {
        let mut s = SceneState::from_objects(table(vec![box_at("a", [0.0, 1.0, 0.0])]));
        assert!(s.delete_selected().is_empty());
        assert_eq!(s.undo_depth(), 0);
    }

    #[test]
    fn test_mirror_flips_x_scale_only_on_selection() {
        let mut s = SceneState::from_objects(table(vec![
            group_at("g", [0.0, 0.0, 0.0]),
            child_of(box_at("c", [1.0, 1.0, 0.0]), "g"),
        ]));
        assert!(!s.mirror_selected());
        s.select(Some("g"), false);
        assert!(s.mirror_selected());
        assert_eq!(s.object("g").unwrap().transform.scale, [-1.0, 1.0, 1.0]);
        assert_eq!(s.object("c").unwrap().transform.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_material_edits() {
        let mut s = SceneState::from_objects(table(vec![box_at("a", [0.0, 1.0, 0.0])]));
        assert!(s.set_material("a", MaterialChannel::Roughness, 3.0));
        assert_eq!(s.object("a").unwrap().roughness, 1.0);
        assert_eq!(s.undo_depth(), 0);

        assert!(s.set_color("a", "#123456"));
        assert!(!s.set_color("a", "#123456"));
        assert!(s.set_hole("a", true));
        assert_eq!(s.undo_depth(), 2);
        assert!(s.object("a").unwrap().is_hole);
    }

    #[test]
    fn test_update_properties_merges_known_fields() {
        let mut s = SceneState::from_objects(table(vec![sphere_at("s", [0.0, 1.0, 0.0])]));
        let patch = PropertiesPatch {
            radius: Some(3.0),
            width: Some(9.0),
            ..Default::default()
        };
        assert!(s.update_properties("s", &patch));
        assert!(matches!(
            s.object("s").unwrap().properties,
            ShapeProperties::Sphere { radius, .. } if radius == 3.0
        ));
        assert!(!s.update_properties("s", &patch));
        assert_eq!(s.undo_depth(), 1);
    }
}
