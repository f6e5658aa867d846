//! Camera and screenshot collaborator hooks

use glam::DVec3;
use shared::ObjectId;

use crate::geometry;
use crate::state::view::{ScreenshotHandler, ViewControls};

use super::SceneState;

impl SceneState {
    /// Register (or drop with `None`) the camera controls
    pub fn set_view_controls(&mut self, view: Option<Box<dyn ViewControls>>) {
        self.view = view;
    }

    /// Frame the selection, or the whole scene when nothing is selected.
    /// Returns false when there is nothing with geometry to frame or no
    /// controls are registered.
    pub fn zoom_to_fit(&mut self) -> bool {
        let index = self.objects.child_index();
        let targets: Vec<ObjectId> = if self.selection.is_empty() {
            self.objects.roots().map(|obj| obj.id.clone()).collect()
        } else {
            self.selection.all().to_vec()
        };
        let Some(bounds) = geometry::union_aabb(&self.objects, &index, &targets, DVec3::ZERO)
        else {
            return false;
        };
        match self.view.as_mut() {
            Some(view) => {
                view.fit_to_box(&bounds);
                true
            }
            None => false,
        }
    }

    pub fn set_screenshot_handler(&mut self, handler: Option<ScreenshotHandler>) {
        self.screenshot = handler;
    }

    /// Ask the renderer for a screenshot; false if none is registered
    pub fn trigger_screenshot(&mut self) -> bool {
        match self.screenshot.as_mut() {
            Some(capture) => {
                capture();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use approx::assert_relative_eq;

    use crate::fixtures::{box_at, group_at, table};
    use crate::geometry::Aabb;
    use crate::state::{SceneState, ViewControls};

    struct Camera {
        framed: Rc<RefCell<Vec<Aabb>>>,
    }

    impl ViewControls for Camera {
        fn set_orbit_enabled(&mut self, _enabled: bool) {}
        fn fit_to_box(&mut self, bounds: &Aabb) {
            self.framed.borrow_mut().push(*bounds);
        }
    }

    fn with_camera(s: &mut SceneState) -> Rc<RefCell<Vec<Aabb>>> {
        let framed = Rc::new(RefCell::new(Vec::new()));
        s.set_view_controls(Some(Box::new(Camera {
            framed: Rc::clone(&framed),
        })));
        framed
    }

    #[test]
    fn test_zoom_frames_everything_without_selection() {
        let mut s = SceneState::from_objects(table(vec![
            box_at("a", [0.0, 1.0, 0.0]),
            box_at("b", [10.0, 1.0, 0.0]),
        ]));
        let framed = with_camera(&mut s);
        assert!(s.zoom_to_fit());
        let bounds = framed.borrow()[0];
        assert_relative_eq!(bounds.min.x, -1.0);
        assert_relative_eq!(bounds.max.x, 11.0);

        s.select(Some("b"), false);
        assert!(s.zoom_to_fit());
        assert_relative_eq!(framed.borrow()[1].min.x, 9.0);
    }

    #[test]
    fn test_zoom_skips_empty_bounds() {
        let mut s = SceneState::from_objects(table(vec![group_at("g", [0.0, 0.0, 0.0])]));
        let framed = with_camera(&mut s);
        assert!(!s.zoom_to_fit());
        assert!(framed.borrow().is_empty());

        let mut bare = SceneState::from_objects(table(vec![box_at("a", [0.0, 1.0, 0.0])]));
        assert!(!bare.zoom_to_fit());
    }

    #[test]
    fn test_screenshot_slot() {
        let mut s = SceneState::default();
        assert!(!s.trigger_screenshot());

        let shots = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&shots);
        s.set_screenshot_handler(Some(Box::new(move || *counter.borrow_mut() += 1)));
        assert!(s.trigger_screenshot());
        assert_eq!(*shots.borrow(), 1);

        s.set_screenshot_handler(None);
        assert!(!s.trigger_screenshot());
    }
}
