//! Factory functions for creating test data.
//!
//! Builds `CadObject`s and tables directly, bypassing the editing
//! operations, so tests can start from any hierarchy.

use shared::*;

const TEST_COLOR: &str = "#cccccc";

// ── Object factories ────────────────────────────────────────────

/// A default 2×2×2 box at `pos`.
pub fn box_at(id: &str, pos: [f64; 3]) -> CadObject {
    CadObject::new(
        id.to_string(),
        ShapeType::Box,
        Transform::at(pos),
        TEST_COLOR.to_string(),
    )
}

/// A box with explicit dimensions.
pub fn sized_box_at(id: &str, pos: [f64; 3], size: [f64; 3]) -> CadObject {
    let mut obj = box_at(id, pos);
    obj.properties = ShapeProperties::Box {
        width: size[0],
        height: size[1],
        depth: size[2],
    };
    obj
}

/// A default radius-1 sphere at `pos`.
pub fn sphere_at(id: &str, pos: [f64; 3]) -> CadObject {
    CadObject::new(
        id.to_string(),
        ShapeType::Sphere,
        Transform::at(pos),
        TEST_COLOR.to_string(),
    )
}

pub fn shape_at(id: &str, shape: ShapeType, pos: [f64; 3]) -> CadObject {
    CadObject::new(
        id.to_string(),
        shape,
        Transform::at(pos),
        TEST_COLOR.to_string(),
    )
}

/// An empty group at `pos`.
pub fn group_at(id: &str, pos: [f64; 3]) -> CadObject {
    CadObject::group(id.to_string(), Transform::at(pos))
}

/// Re-parent `obj` under `parent` (local transform kept as is).
pub fn child_of(mut obj: CadObject, parent: &str) -> CadObject {
    obj.parent_id = Some(parent.to_string());
    obj
}

// ── Table factories ─────────────────────────────────────────────

pub fn table(objects: Vec<CadObject>) -> ObjectTable {
    objects.into_iter().collect()
}

/// Box at the origin and sphere at x = 3, both resting on the ground.
pub fn box_and_sphere() -> ObjectTable {
    table(vec![
        box_at("box", [0.0, 1.0, 0.0]),
        sphere_at("sphere", [3.0, 1.0, 0.0]),
    ])
}

/// Project JSON for `objects`
pub fn project_json(objects: Vec<CadObject>) -> String {
    ProjectFile {
        objects: table(objects),
    }
    .to_json()
    .unwrap_or_default()
}
