use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::storage::DataBaseStorage;

/// Default file name of a dataset's storage archive
pub const DEFAULT_STORAGE_FILE: &str = "databases.zip";

/// Project-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectParameter {
    /// Folder holding the project's datasets
    pub project_folder: PathBuf,
    /// Storage file name used for new datasets
    pub storage_file_name: String,
    /// Worker threads for per-dataset save/load (0 = rayon default)
    pub num_threads: usize,
}

impl Default for ProjectParameter {
    fn default() -> Self {
        Self {
            project_folder: PathBuf::from("."),
            storage_file_name: DEFAULT_STORAGE_FILE.to_string(),
            num_threads: 0,
        }
    }
}

impl ProjectParameter {
    /// Dataset `name` under this project, stored in `<folder>/<name>/<file>`
    pub fn dataset(&self, name: impl Into<String>) -> ProjectDataset {
        let name = name.into();
        ProjectDataset {
            project_folder: self.project_folder.clone(),
            storage_file: PathBuf::from(&name).join(&self.storage_file_name),
            name,
        }
    }
}

/// Where one dataset's storage archive lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDataset {
    /// Dataset name, used in fault reports
    pub name: String,
    /// Project folder recorded when the dataset was saved
    pub project_folder: PathBuf,
    /// Storage archive, relative to the project folder or absolute
    pub storage_file: PathBuf,
}

impl ProjectDataset {
    /// Create a dataset entry
    pub fn new(
        name: impl Into<String>,
        project_folder: impl Into<PathBuf>,
        storage_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            project_folder: project_folder.into(),
            storage_file: storage_file.into(),
        }
    }

    /// Full path of the storage archive
    pub fn storage_path(&self) -> PathBuf {
        self.project_folder.join(&self.storage_file)
    }

    /// The same dataset after its project moved to `new_project_folder`.
    ///
    /// Relative storage paths are kept. Absolute paths inside the old project
    /// folder keep their part below it; other absolute paths keep only the
    /// file name.
    pub fn relocated(&self, new_project_folder: &Path) -> Self {
        let storage_file = if self.storage_file.is_relative() {
            self.storage_file.clone()
        } else if let Ok(rest) = self.storage_file.strip_prefix(&self.project_folder) {
            rest.to_path_buf()
        } else {
            self.storage_file
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_default()
        };
        Self {
            name: self.name.clone(),
            project_folder: new_project_folder.to_path_buf(),
            storage_file,
        }
    }
}

/// A dataset together with its loaded storage
#[derive(Debug)]
pub struct LoadedDataset {
    /// Where the storage came from
    pub dataset: ProjectDataset,
    /// Its databases
    pub storage: DataBaseStorage,
}
