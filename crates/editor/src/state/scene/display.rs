//! Display helper functions for scene objects

use shared::{CadObject, ShapeType};

/// Get display name for an object, e.g. `Box (1a2b3c4d)`
pub fn object_display_name(obj: &CadObject) -> String {
    let label = shape_label(obj.shape_type());
    if obj.is_hole {
        format!("{} hole ({})", label, short_id(&obj.id))
    } else {
        format!("{} ({})", label, short_id(&obj.id))
    }
}

pub fn shape_label(shape: ShapeType) -> &'static str {
    match shape {
        ShapeType::Box => "Box",
        ShapeType::Sphere => "Sphere",
        ShapeType::Cylinder => "Cylinder",
        ShapeType::Cone => "Cone",
        ShapeType::Pyramid => "Pyramid",
        ShapeType::Torus => "Torus",
        ShapeType::Gear => "Gear",
        ShapeType::Group => "Group",
    }
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::box_at;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("1234567890abcdef"), "12345678");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("ääääääääää"), "ääääääää");
    }

    #[test]
    fn test_display_name() {
        let mut obj = box_at("deadbeef-0000", [0.0, 1.0, 0.0]);
        assert_eq!(object_display_name(&obj), "Box (deadbeef)");
        obj.is_hole = true;
        assert_eq!(object_display_name(&obj), "Box hole (deadbeef)");
    }
}
