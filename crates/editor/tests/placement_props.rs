//! Property tests for duplicate placement.

use fibercad_editor_lib::fixtures::{sized_box_at, table};
use fibercad_editor_lib::state::SceneState;
use proptest::prelude::*;

fn boxes() -> impl Strategy<Value = Vec<([f64; 3], [f64; 3])>> {
    prop::collection::vec(
        (
            (-10.0..10.0f64, 0.0..5.0f64, -10.0..10.0f64),
            (1.0..3.0f64, 1.0..3.0f64, 1.0..3.0f64),
        )
            .prop_map(|((x, y, z), (w, h, d))| ([x, y, z], [w, h, d])),
        1..8,
    )
}

proptest! {
    #[test]
    fn duplicate_never_overlaps_existing_roots(layout in boxes(), pick in any::<prop::sample::Index>()) {
        let objects = layout
            .iter()
            .enumerate()
            .map(|(i, (pos, size))| sized_box_at(&format!("b{i}"), *pos, *size))
            .collect();
        let mut s = SceneState::from_objects(table(objects));
        let source = format!("b{}", pick.index(layout.len()));
        s.select(Some(&source), false);

        let before: Vec<_> = s
            .objects()
            .ids()
            .filter_map(|id| s.world_aabb(id))
            .collect();
        let created = s.duplicate_selected();
        prop_assert_eq!(created.len(), 1);

        let placed = s.world_aabb(&created[0]).unwrap();
        prop_assert!(placed.min.y.abs() < 1e-9);
        for existing in &before {
            prop_assert!(!placed.intersects(existing), "{:?} overlaps {:?}", placed, existing);
        }
    }

    #[test]
    fn paste_lands_on_ground(layout in boxes(), target in (-20.0..20.0f64, -20.0..20.0f64)) {
        let objects = layout
            .iter()
            .enumerate()
            .map(|(i, (pos, size))| sized_box_at(&format!("b{i}"), *pos, *size))
            .collect();
        let mut s = SceneState::from_objects(table(objects));
        let ids: Vec<String> = s.objects().ids().cloned().collect();
        s.select_many(ids.iter().map(String::as_str));
        s.copy_selected();

        let pasted = s.paste([target.0, 0.0, target.1]);
        prop_assert_eq!(pasted.len(), layout.len());
        let bounds = s.selection_aabb().unwrap();
        prop_assert!(bounds.min.y.abs() < 1e-9);
    }
}
