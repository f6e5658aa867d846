use serde::{Deserialize, Serialize};

mod project;
mod table;

pub use project::{ProjectError, ProjectFile, PROJECT_FILE_NAME};
pub use table::{ChildIndex, ObjectTable};

/// Unique object identifier in the scene
pub type ObjectId = String;

/// Closed set of object kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Pyramid,
    Torus,
    Gear,
    /// Transform-only container without geometry
    Group,
}

impl ShapeType {
    /// Every shape that carries geometry
    pub fn primitives() -> &'static [ShapeType] {
        &[
            ShapeType::Box,
            ShapeType::Sphere,
            ShapeType::Cylinder,
            ShapeType::Cone,
            ShapeType::Pyramid,
            ShapeType::Torus,
            ShapeType::Gear,
        ]
    }
}

/// Object transform, local to the parent (or world for roots)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    /// Euler angles in radians, XYZ order
    pub rotation: [f64; 3],
    /// Negative components express mirroring
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape dimensions; each variant carries only the fields its shape uses
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeProperties {
    Box {
        width: f64,
        height: f64,
        depth: f64,
    },
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
    Cylinder {
        radius_top: f64,
        radius_bottom: f64,
        height: f64,
        radial_segments: u32,
    },
    Cone {
        radius: f64,
        height: f64,
        radial_segments: u32,
    },
    Pyramid {
        radius: f64,
        height: f64,
        radial_segments: u32,
    },
    Torus {
        radius: f64,
        tube: f64,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Gear {
        radius: f64,
        height: f64,
        teeth: u32,
    },
    Group,
}

impl ShapeProperties {
    /// Default dimensions for a shape type
    pub fn defaults(shape: ShapeType) -> Self {
        match shape {
            ShapeType::Box => ShapeProperties::Box {
                width: 2.0,
                height: 2.0,
                depth: 2.0,
            },
            ShapeType::Sphere => ShapeProperties::Sphere {
                radius: 1.0,
                width_segments: 32,
                height_segments: 16,
            },
            ShapeType::Cylinder => ShapeProperties::Cylinder {
                radius_top: 1.0,
                radius_bottom: 1.0,
                height: 2.0,
                radial_segments: 32,
            },
            ShapeType::Cone => ShapeProperties::Cone {
                radius: 1.0,
                height: 2.0,
                radial_segments: 32,
            },
            ShapeType::Pyramid => ShapeProperties::Pyramid {
                radius: 1.0,
                height: 2.0,
                radial_segments: 4,
            },
            ShapeType::Torus => ShapeProperties::Torus {
                radius: 1.0,
                tube: 0.2,
                radial_segments: 16,
                tubular_segments: 32,
            },
            ShapeType::Gear => ShapeProperties::Gear {
                radius: 1.0,
                height: 0.4,
                teeth: 12,
            },
            ShapeType::Group => ShapeProperties::Group,
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            ShapeProperties::Box { .. } => ShapeType::Box,
            ShapeProperties::Sphere { .. } => ShapeType::Sphere,
            ShapeProperties::Cylinder { .. } => ShapeType::Cylinder,
            ShapeProperties::Cone { .. } => ShapeType::Cone,
            ShapeProperties::Pyramid { .. } => ShapeType::Pyramid,
            ShapeProperties::Torus { .. } => ShapeType::Torus,
            ShapeProperties::Gear { .. } => ShapeType::Gear,
            ShapeProperties::Group => ShapeType::Group,
        }
    }

    /// Build the variant for `shape`, taking present fields from `patch`
    /// and defaults for the rest
    pub fn from_patch(shape: ShapeType, patch: Option<&PropertiesPatch>) -> Self {
        let mut props = Self::defaults(shape);
        if let Some(patch) = patch {
            props.apply_patch(patch);
        }
        props
    }

    /// Merge the fields of `patch` that this variant carries.
    /// Non-finite or non-positive values are skipped. Returns true if anything changed.
    pub fn apply_patch(&mut self, patch: &PropertiesPatch) -> bool {
        let before = self.clone();
        match self {
            ShapeProperties::Box {
                width,
                height,
                depth,
            } => {
                merge_len(width, patch.width);
                merge_len(height, patch.height);
                merge_len(depth, patch.depth);
            }
            ShapeProperties::Sphere {
                radius,
                width_segments,
                height_segments,
            } => {
                merge_len(radius, patch.radius);
                merge_count(width_segments, patch.width_segments);
                merge_count(height_segments, patch.height_segments);
            }
            ShapeProperties::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => {
                merge_radius(radius_top, patch.radius_top);
                merge_radius(radius_bottom, patch.radius_bottom);
                merge_len(height, patch.height);
                merge_count(radial_segments, patch.radial_segments);
            }
            ShapeProperties::Cone {
                radius,
                height,
                radial_segments,
            }
            | ShapeProperties::Pyramid {
                radius,
                height,
                radial_segments,
            } => {
                merge_len(radius, patch.radius);
                merge_len(height, patch.height);
                merge_count(radial_segments, patch.radial_segments);
            }
            ShapeProperties::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => {
                merge_len(radius, patch.radius);
                merge_len(tube, patch.tube);
                merge_count(radial_segments, patch.radial_segments);
                merge_count(tubular_segments, patch.tubular_segments);
            }
            ShapeProperties::Gear {
                radius,
                height,
                teeth,
            } => {
                merge_len(radius, patch.radius);
                merge_len(height, patch.height);
                merge_count(teeth, patch.teeth);
            }
            ShapeProperties::Group => {}
        }
        *self != before
    }

    /// Loose form with exactly the fields of this variant set
    pub fn to_patch(&self) -> PropertiesPatch {
        let mut patch = PropertiesPatch::default();
        match *self {
            ShapeProperties::Box {
                width,
                height,
                depth,
            } => {
                patch.width = Some(width);
                patch.height = Some(height);
                patch.depth = Some(depth);
            }
            ShapeProperties::Sphere {
                radius,
                width_segments,
                height_segments,
            } => {
                patch.radius = Some(radius);
                patch.width_segments = Some(width_segments);
                patch.height_segments = Some(height_segments);
            }
            ShapeProperties::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => {
                patch.radius_top = Some(radius_top);
                patch.radius_bottom = Some(radius_bottom);
                patch.height = Some(height);
                patch.radial_segments = Some(radial_segments);
            }
            ShapeProperties::Cone {
                radius,
                height,
                radial_segments,
            }
            | ShapeProperties::Pyramid {
                radius,
                height,
                radial_segments,
            } => {
                patch.radius = Some(radius);
                patch.height = Some(height);
                patch.radial_segments = Some(radial_segments);
            }
            ShapeProperties::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => {
                patch.radius = Some(radius);
                patch.tube = Some(tube);
                patch.radial_segments = Some(radial_segments);
                patch.tubular_segments = Some(tubular_segments);
            }
            ShapeProperties::Gear {
                radius,
                height,
                teeth,
            } => {
                patch.radius = Some(radius);
                patch.height = Some(height);
                patch.teeth = Some(teeth);
            }
            ShapeProperties::Group => {}
        }
        patch
    }
}

fn merge_len(field: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        if v.is_finite() && v > 0.0 {
            *field = v;
        }
    }
}

/// Cylinder ends may close to a point
fn merge_radius(field: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        if v.is_finite() && v >= 0.0 {
            *field = v;
        }
    }
}

fn merge_count(field: &mut u32, value: Option<u32>) {
    if let Some(v) = value {
        if v > 0 {
            *field = v;
        }
    }
}

/// Loose property map as it appears in project files; also used for
/// partial property updates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_segments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_segments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radial_segments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tube: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tubular_segments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teeth: Option<u32>,
}

fn default_roughness() -> f64 {
    1.0
}

/// Wire form of a scene object (project file layout)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCadObject {
    #[serde(default)]
    id: ObjectId,
    #[serde(rename = "type")]
    shape: ShapeType,
    transform: Transform,
    #[serde(default)]
    properties: Option<PropertiesPatch>,
    color: String,
    #[serde(default)]
    metalness: f64,
    #[serde(default = "default_roughness")]
    roughness: f64,
    #[serde(default)]
    is_hole: bool,
    #[serde(default)]
    parent_id: Option<ObjectId>,
}

/// A scene object: a shape or a group, placed relative to its parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCadObject", into = "RawCadObject")]
pub struct CadObject {
    pub id: ObjectId,
    pub transform: Transform,
    pub properties: ShapeProperties,
    pub color: String,
    pub metalness: f64,
    pub roughness: f64,
    /// Rendering flag only; no geometric subtraction happens
    pub is_hole: bool,
    pub parent_id: Option<ObjectId>,
}

impl CadObject {
    /// New root object with default dimensions for `shape`
    pub fn new(id: ObjectId, shape: ShapeType, transform: Transform, color: String) -> Self {
        Self {
            id,
            transform,
            properties: ShapeProperties::defaults(shape),
            color,
            metalness: 0.1,
            roughness: 0.8,
            is_hole: false,
            parent_id: None,
        }
    }

    /// New empty group
    pub fn group(id: ObjectId, transform: Transform) -> Self {
        Self {
            id,
            transform,
            properties: ShapeProperties::Group,
            color: "#ffffff".to_string(),
            metalness: 0.0,
            roughness: 1.0,
            is_hole: false,
            parent_id: None,
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        self.properties.shape_type()
    }

    pub fn is_group(&self) -> bool {
        matches!(self.properties, ShapeProperties::Group)
    }
}

impl From<RawCadObject> for CadObject {
    fn from(raw: RawCadObject) -> Self {
        Self {
            id: raw.id,
            transform: raw.transform,
            properties: ShapeProperties::from_patch(raw.shape, raw.properties.as_ref()),
            color: raw.color,
            metalness: raw.metalness,
            roughness: raw.roughness,
            is_hole: raw.is_hole,
            parent_id: raw.parent_id,
        }
    }
}

impl From<CadObject> for RawCadObject {
    fn from(obj: CadObject) -> Self {
        Self {
            id: obj.id,
            shape: obj.properties.shape_type(),
            transform: obj.transform,
            properties: Some(obj.properties.to_patch()),
            color: obj.color,
            metalness: obj.metalness,
            roughness: obj.roughness,
            is_hole: obj.is_hole,
            parent_id: obj.parent_id,
        }
    }
}
