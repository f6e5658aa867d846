//! Project import/export

use std::path::{Path, PathBuf};

use shared::{ProjectError, ProjectFile, PROJECT_FILE_NAME};

use super::SceneState;

impl SceneState {
    /// Replace the scene with a decoded project.
    ///
    /// The replacement is undoable and clears the selection. On error the
    /// scene and history are untouched.
    pub fn load_project(&mut self, json: &str) -> Result<(), ProjectError> {
        let project = ProjectFile::from_json(json)?;
        self.record();
        self.objects = project.objects;
        self.selection.clear();
        self.version += 1;
        tracing::info!("Loaded project with {} objects", self.objects.len());
        Ok(())
    }

    /// Serialize the object table as a project file
    pub fn export_project(&self) -> Result<String, ProjectError> {
        ProjectFile {
            objects: self.objects.clone(),
        }
        .to_json()
    }

    /// Write the export into `dir` under the standard project file name
    pub fn save_project(&self, dir: &Path) -> Result<PathBuf, ProjectError> {
        let json = self.export_project()?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(PROJECT_FILE_NAME);
        std::fs::write(&path, json)?;
        tracing::info!("Saved project to {}", path.display());
        Ok(path)
    }

    pub fn load_project_file(&mut self, path: &Path) -> Result<(), ProjectError> {
        let json = std::fs::read_to_string(path)?;
        self.load_project(&json)
    }
}
