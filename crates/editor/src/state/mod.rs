pub mod scene;
pub mod selection;
pub mod settings;
pub mod view;

pub use scene::{
    object_display_name, shape_label, short_id, Dimension, History, MaterialChannel,
    PendingShape, SceneState, Snapshot, HISTORY_LIMIT, PLACEMENT_MAX_ATTEMPTS,
};
pub use selection::SelectionState;
pub use settings::EditorSettings;
pub use view::{ScreenshotHandler, ViewControls};
