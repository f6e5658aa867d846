//! Transform composition and world-space bounds

use std::collections::HashSet;

use glam::{DMat4, DQuat, DVec3, EulerRot};
use shared::{ChildIndex, ObjectTable, ShapeProperties, Transform};

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn from_center_size(center: DVec3, size: DVec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow every face outward by `amount`
    pub fn expanded(&self, amount: f64) -> Aabb {
        Aabb {
            min: self.min - DVec3::splat(amount),
            max: self.max + DVec3::splat(amount),
        }
    }

    pub fn translated(&self, offset: DVec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Touching faces count as intersecting
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }

    /// Bounds of the 8 transformed corners
    pub fn transformed(&self, matrix: &DMat4) -> Aabb {
        let corners = self.corners();
        let first = matrix.transform_point3(corners[0]);
        corners[1..].iter().fold(
            Aabb {
                min: first,
                max: first,
            },
            |acc, c| {
                let p = matrix.transform_point3(*c);
                Aabb {
                    min: acc.min.min(p),
                    max: acc.max.max(p),
                }
            },
        )
    }
}

fn merge(acc: Option<Aabb>, aabb: Aabb) -> Option<Aabb> {
    Some(match acc {
        Some(prev) => prev.union(&aabb),
        None => aabb,
    })
}

/// Translate ∘ rotate(XYZ Euler) ∘ scale
pub fn local_matrix(transform: &Transform) -> DMat4 {
    let [rx, ry, rz] = transform.rotation;
    DMat4::from_scale_rotation_translation(
        DVec3::from_array(transform.scale),
        DQuat::from_euler(EulerRot::XYZ, rx, ry, rz),
        DVec3::from_array(transform.position),
    )
}

/// Parent world matrix composed with a local transform
pub fn world_matrix(parent: &DMat4, local: &Transform) -> DMat4 {
    *parent * local_matrix(local)
}

/// World matrix of an object from its ancestor chain; `None` if the id is unknown
pub fn object_world_matrix(table: &ObjectTable, id: &str) -> Option<DMat4> {
    let chain = table.ancestry(id);
    if chain.is_empty() {
        return None;
    }
    Some(
        chain
            .iter()
            .rev()
            .fold(DMat4::IDENTITY, |m, obj| world_matrix(&m, &obj.transform)),
    )
}

/// Split an affine matrix back into position / XYZ Euler rotation / scale.
///
/// A negative determinant comes back as a negative X scale. A singular
/// matrix keeps its translation and axis lengths with zero rotation.
pub fn decompose(matrix: &DMat4) -> Transform {
    let axes = [
        matrix.x_axis.truncate().length(),
        matrix.y_axis.truncate().length(),
        matrix.z_axis.truncate().length(),
    ];
    // singularity test relative to the axis lengths
    let longest = axes[0].max(axes[1]).max(axes[2]);
    if longest == 0.0 || matrix.determinant().abs() <= f64::EPSILON * longest.powi(3) {
        return Transform {
            position: matrix.w_axis.truncate().to_array(),
            rotation: [0.0; 3],
            scale: axes,
        };
    }
    let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
    let (rx, ry, rz) = rotation.to_euler(EulerRot::XYZ);
    Transform {
        position: translation.to_array(),
        rotation: [rx, ry, rz],
        scale: scale.to_array(),
    }
}

/// World pose of an object
pub fn world_transform(table: &ObjectTable, id: &str) -> Option<Transform> {
    object_world_matrix(table, id).map(|m| decompose(&m))
}

/// Size of a shape's local box, centered at its origin; `None` for groups
pub fn shape_extents(properties: &ShapeProperties) -> Option<DVec3> {
    match *properties {
        ShapeProperties::Box {
            width,
            height,
            depth,
        } => Some(DVec3::new(width, height, depth)),
        ShapeProperties::Sphere { radius, .. } => Some(DVec3::splat(radius * 2.0)),
        ShapeProperties::Cylinder {
            radius_top,
            radius_bottom,
            height,
            ..
        } => {
            let d = radius_top.max(radius_bottom) * 2.0;
            Some(DVec3::new(d, height, d))
        }
        ShapeProperties::Cone { radius, height, .. }
        | ShapeProperties::Pyramid { radius, height, .. }
        | ShapeProperties::Gear { radius, height, .. } => {
            Some(DVec3::new(radius * 2.0, height, radius * 2.0))
        }
        // Ring lies in the XY plane
        ShapeProperties::Torus { radius, tube, .. } => {
            let outer = (radius + tube) * 2.0;
            Some(DVec3::new(outer, outer, tube * 2.0))
        }
        ShapeProperties::Group => None,
    }
}

/// World bounds of an object and all its descendants.
///
/// `root_offset` is added to the starting object's own position, which lets
/// callers probe a candidate placement without touching the table.
/// Returns `None` when the subtree carries no geometry.
pub fn subtree_aabb(
    table: &ObjectTable,
    index: &ChildIndex,
    id: &str,
    root_offset: DVec3,
) -> Option<Aabb> {
    table.get(id)?;
    let parent = table
        .parent_of(id)
        .and_then(|p| object_world_matrix(table, &p.id))
        .unwrap_or(DMat4::IDENTITY);

    let mut acc = None;
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<(&str, DMat4, DVec3)> = vec![(id, parent, root_offset)];

    while let Some((current, parent, offset)) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        let Some(obj) = table.get(current) else {
            continue;
        };
        let mut local = obj.transform.clone();
        let moved = DVec3::from_array(local.position) + offset;
        local.position = moved.to_array();
        let matrix = world_matrix(&parent, &local);

        if let Some(size) = shape_extents(&obj.properties) {
            let aabb = Aabb::from_center_size(DVec3::ZERO, size).transformed(&matrix);
            acc = merge(acc, aabb);
        }
        for child in index.children_of(current) {
            stack.push((child.as_str(), matrix, DVec3::ZERO));
        }
    }
    acc
}

/// Union of `subtree_aabb` over several roots, each shifted by `root_offset`
pub fn union_aabb<'a>(
    table: &ObjectTable,
    index: &ChildIndex,
    ids: impl IntoIterator<Item = &'a String>,
    root_offset: DVec3,
) -> Option<Aabb> {
    ids.into_iter()
        .filter_map(|id| subtree_aabb(table, index, id, root_offset))
        .fold(None, merge)
}
