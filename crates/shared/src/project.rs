//! Project file codec: `{ "objects": { "<id>": CadObject } }`

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::{CadObject, ObjectTable};

/// File name used when exporting a project
pub const PROJECT_FILE_NAME: &str = "fibercad-design.json";

/// Errors raised while reading or writing a project file
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("project file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("project file has no `objects` map")]
    MissingObjects,

    #[error("object `{id}` is invalid: {source}")]
    InvalidObject {
        id: String,
        source: serde_json::Error,
    },

    #[error("project file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A decoded project
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectFile {
    pub objects: ObjectTable,
}

impl ProjectFile {
    /// Decode a project. Missing optional object fields get their defaults;
    /// the map key is the authoritative object id.
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let value: Value = serde_json::from_str(json)?;
        let entries = value
            .get("objects")
            .and_then(Value::as_object)
            .ok_or(ProjectError::MissingObjects)?;

        let mut objects = ObjectTable::new();
        for (key, entry) in entries {
            let mut obj: CadObject =
                serde_json::from_value(entry.clone()).map_err(|source| {
                    ProjectError::InvalidObject {
                        id: key.clone(),
                        source,
                    }
                })?;
            obj.id = key.clone();
            objects.insert(obj);
        }
        Ok(Self { objects })
    }

    /// Encode with 2-space indentation
    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ShapeProperties, ShapeType};

    #[test]
    fn test_rejects_invalid_json() {
        let err = ProjectFile::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ProjectError::Json(_)));
    }

    #[test]
    fn test_rejects_missing_or_non_map_objects() {
        assert!(matches!(
            ProjectFile::from_json(r#"{"things": {}}"#).unwrap_err(),
            ProjectError::MissingObjects
        ));
        assert!(matches!(
            ProjectFile::from_json(r#"{"objects": [1, 2]}"#).unwrap_err(),
            ProjectError::MissingObjects
        ));
        assert!(matches!(
            ProjectFile::from_json(r#"{"objects": null}"#).unwrap_err(),
            ProjectError::MissingObjects
        ));
    }

    #[test]
    fn test_rejects_unknown_shape() {
        let json = r##"{"objects": {"w": {
            "type": "wedge",
            "transform": {"position": [0,0,0], "rotation": [0,0,0], "scale": [1,1,1]},
            "color": "#fff"
        }}}"##;
        match ProjectFile::from_json(json).unwrap_err() {
            ProjectError::InvalidObject { id, .. } => assert_eq!(id, "w"),
            other => panic!("Expected InvalidObject, got {other:?}"),
        }
    }

    #[test]
    fn test_fills_defaults_and_uses_key_as_id() {
        let json = r##"{"objects": {"k1": {
            "id": "stale",
            "type": "cylinder",
            "transform": {"position": [0,1,0], "rotation": [0,0,0], "scale": [1,1,1]},
            "color": "#abcdef",
            "properties": {"height": 4}
        }}}"##;
        let project = ProjectFile::from_json(json).unwrap();
        let obj = project.objects.get("k1").unwrap();
        assert_eq!(obj.id, "k1");
        assert_eq!(obj.shape_type(), ShapeType::Cylinder);
        assert_eq!(
            obj.properties,
            ShapeProperties::Cylinder {
                radius_top: 1.0,
                radius_bottom: 1.0,
                height: 4.0,
                radial_segments: 32,
            }
        );
        assert_eq!(obj.roughness, 1.0);
        assert_eq!(obj.metalness, 0.0);
    }

    #[test]
    fn test_export_uses_two_space_indent() {
        let json = r##"{"objects": {"b": {
            "type": "box",
            "transform": {"position": [0,1,0], "rotation": [0,0,0], "scale": [1,1,1]},
            "color": "#cccccc"
        }}}"##;
        let out = ProjectFile::from_json(json).unwrap().to_json().unwrap();
        assert!(out.starts_with("{\n  \"objects\": {\n    \"b\": {"));

        let reloaded = ProjectFile::from_json(&out).unwrap();
        assert_eq!(reloaded, ProjectFile::from_json(json).unwrap());
    }
}
