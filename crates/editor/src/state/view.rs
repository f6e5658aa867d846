//! Seams to the camera/view and renderer collaborators

use crate::geometry::Aabb;

/// Camera capabilities the engine may invoke; it never inspects camera state
pub trait ViewControls {
    /// Turn orbiting on or off (off while a handle is being dragged)
    fn set_orbit_enabled(&mut self, enabled: bool);
    /// Frame the given world-space box
    fn fit_to_box(&mut self, bounds: &Aabb);
}

/// Renderer-provided screenshot capture
pub type ScreenshotHandler = Box<dyn FnMut()>;
