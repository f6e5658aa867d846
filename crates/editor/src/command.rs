//! JSON command protocol for driving the editor headlessly.

use serde::{Deserialize, Serialize};
use shared::{PropertiesPatch, ShapeType, Transform};

use crate::harness::TestHarness;
use crate::state::{object_display_name, Dimension, MaterialChannel};

/// A command the editor can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Arm (or disarm) the shape for the next `create`
    SetPendingShape {
        shape: Option<ShapeType>,
        #[serde(default)]
        color: Option<String>,
    },
    /// Create the pending shape at a ground position
    Create {
        position: [f64; 3],
    },
    Select {
        id: Option<String>,
        #[serde(default)]
        additive: bool,
    },
    SelectMany {
        ids: Vec<String>,
    },
    ClearSelection,
    SetPosition {
        id: String,
        position: [f64; 3],
    },
    SetRotation {
        id: String,
        rotation: [f64; 3],
    },
    SetScale {
        id: String,
        scale: [f64; 3],
    },
    SetTransform {
        id: String,
        transform: Transform,
    },
    SetDimension {
        id: String,
        dimension: Dimension,
        value: f64,
    },
    SetColor {
        id: String,
        color: String,
    },
    SetHole {
        id: String,
        is_hole: bool,
    },
    SetMaterial {
        id: String,
        channel: MaterialChannel,
        value: f64,
    },
    UpdateProperties {
        id: String,
        properties: PropertiesPatch,
    },
    /// Snapshot the current state (start of a gesture)
    Record,
    BeginDrag,
    EndDrag,
    Delete,
    Mirror,
    Group,
    Ungroup,
    Copy,
    /// Paste at `position`, or at the last pointer position
    Paste {
        #[serde(default)]
        position: Option<[f64; 3]>,
    },
    Duplicate,
    SetPointer {
        position: [f64; 3],
    },
    SetSnapSize {
        size: f64,
    },
    /// Undo the last operation.
    Undo,
    /// Redo the last undone operation.
    Redo,
    /// Replace the scene with a project document
    LoadProject {
        project: serde_json::Value,
    },
    /// Export the scene as project JSON.
    ExportProject,
    /// Inspect the scene: list all objects.
    Inspect,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    /// Report whether a targeted edit found its object
    fn applied(applied: bool) -> Self {
        Self::ok_with_data(serde_json::json!({ "applied": applied }))
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: EditorCommand) -> CommandResponse {
    let scene = &mut harness.scene;
    match cmd {
        EditorCommand::SetPendingShape { shape, color } => {
            if shape == Some(ShapeType::Group) {
                return CommandResponse::err("groups cannot be created directly");
            }
            scene.set_pending_shape(shape, color);
            CommandResponse::ok()
        }

        EditorCommand::Create { position } => match scene.create_object(position) {
            Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            None => CommandResponse::err("no pending shape"),
        },

        EditorCommand::Select { id, additive } => {
            scene.select(id.as_deref(), additive);
            CommandResponse::ok_with_data(serde_json::json!({ "selected": scene.selection() }))
        }

        EditorCommand::SelectMany { ids } => {
            scene.select_many(ids.iter().map(String::as_str));
            CommandResponse::ok_with_data(serde_json::json!({ "selected": scene.selection() }))
        }

        EditorCommand::ClearSelection => {
            scene.clear_selection();
            CommandResponse::ok()
        }

        EditorCommand::SetPosition { id, position } => {
            CommandResponse::applied(scene.set_position(&id, position))
        }
        EditorCommand::SetRotation { id, rotation } => {
            CommandResponse::applied(scene.set_rotation(&id, rotation))
        }
        EditorCommand::SetScale { id, scale } => {
            CommandResponse::applied(scene.set_scale(&id, scale))
        }
        EditorCommand::SetTransform { id, transform } => {
            CommandResponse::applied(scene.set_transform(&id, transform))
        }
        EditorCommand::SetDimension {
            id,
            dimension,
            value,
        } => CommandResponse::applied(scene.set_dimension(&id, dimension, value)),
        EditorCommand::SetColor { id, color } => {
            CommandResponse::applied(scene.set_color(&id, &color))
        }
        EditorCommand::SetHole { id, is_hole } => {
            CommandResponse::applied(scene.set_hole(&id, is_hole))
        }
        EditorCommand::SetMaterial { id, channel, value } => {
            CommandResponse::applied(scene.set_material(&id, channel, value))
        }
        EditorCommand::UpdateProperties { id, properties } => {
            CommandResponse::applied(scene.update_properties(&id, &properties))
        }

        EditorCommand::Record => {
            scene.record();
            CommandResponse::ok()
        }
        EditorCommand::BeginDrag => {
            scene.begin_drag();
            CommandResponse::ok()
        }
        EditorCommand::EndDrag => {
            scene.end_drag();
            CommandResponse::ok()
        }

        EditorCommand::Delete => {
            let removed = scene.delete_selected();
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        EditorCommand::Mirror => CommandResponse::applied(scene.mirror_selected()),

        EditorCommand::Group => {
            let group = scene.group_selected();
            CommandResponse::ok_with_data(serde_json::json!({ "group": group }))
        }

        EditorCommand::Ungroup => {
            let freed = scene.ungroup_selected();
            CommandResponse::ok_with_data(serde_json::json!({ "freed": freed }))
        }

        EditorCommand::Copy => {
            let copied = scene.copy_selected();
            CommandResponse::ok_with_data(serde_json::json!({ "copied": copied }))
        }

        EditorCommand::Paste { position } => {
            let pasted = match position {
                Some(target) => scene.paste(target),
                None => scene.paste_at_pointer(),
            };
            CommandResponse::ok_with_data(serde_json::json!({ "pasted": pasted }))
        }

        EditorCommand::Duplicate => {
            let created = scene.duplicate_selected();
            CommandResponse::ok_with_data(serde_json::json!({ "created": created }))
        }

        EditorCommand::SetPointer { position } => {
            scene.set_last_pointer(position);
            CommandResponse::ok()
        }

        EditorCommand::SetSnapSize { size } => {
            if !(size.is_finite() && size > 0.0) {
                return CommandResponse::err(format!("invalid snap size {size}"));
            }
            scene.set_snap_size(size);
            CommandResponse::ok()
        }

        EditorCommand::Undo => {
            let success = scene.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        EditorCommand::Redo => {
            let success = scene.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        EditorCommand::LoadProject { project } => match scene.load_project(&project.to_string()) {
            Ok(()) => CommandResponse::ok_with_data(
                serde_json::json!({ "object_count": scene.objects().len() }),
            ),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        EditorCommand::ExportProject => match scene.export_project() {
            Ok(json) => CommandResponse::ok_with_data(serde_json::json!({ "project_json": json })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        EditorCommand::Inspect => {
            let objects: Vec<serde_json::Value> = scene
                .objects()
                .iter()
                .map(|obj| {
                    let world = scene.world_transform(&obj.id);
                    let bounds = scene.world_aabb(&obj.id);
                    serde_json::json!({
                        "id": obj.id,
                        "name": object_display_name(obj),
                        "type": obj.shape_type(),
                        "parent_id": obj.parent_id,
                        "world_position": world.map(|t| t.position),
                        "aabb": bounds.map(|b| serde_json::json!({
                            "min": b.min.to_array(),
                            "max": b.max.to_array(),
                        })),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "object_count": objects.len(),
                "objects": objects,
                "selection": scene.selection(),
                "can_undo": scene.can_undo(),
                "can_redo": scene.can_redo(),
            }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
