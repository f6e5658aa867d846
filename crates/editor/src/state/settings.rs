//! Editor settings

use serde::{Deserialize, Serialize};

fn default_snap_size() -> f64 {
    0.1
}

fn default_color() -> String {
    "#cccccc".to_string()
}

/// All editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Grid snap unit; also the minimum duplicate step and padding basis
    #[serde(default = "default_snap_size")]
    pub snap_size: f64,
    /// Color given to newly created shapes
    #[serde(default = "default_color")]
    pub default_color: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            snap_size: default_snap_size(),
            default_color: default_color(),
        }
    }
}

impl EditorSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "fibercad", "fibercad")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match Self::from_json(&json) {
                    Some(settings) => return settings,
                    None => tracing::warn!("Ignoring unreadable settings at {}", path.display()),
                }
            }
        }
        Self::default()
    }

    /// Parse settings, rejecting a non-positive snap unit
    pub fn from_json(json: &str) -> Option<Self> {
        let settings: Self = serde_json::from_str(json).ok()?;
        (settings.snap_size.is_finite() && settings.snap_size > 0.0).then_some(settings)
    }
}
