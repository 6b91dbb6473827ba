//! The folder layout of a requirements project.
//!
//! A project root holds a [`CONFIG_FILE_NAME`] file and a main folder with
//! one subfolder per database plus a folder of references:
//!
//! ```text
//! <root>/
//! ├── reqdb.toml
//! └── SRS/
//!     ├── requirements/
//!     ├── definitions/
//!     └── references/
//! ```

use std::path::{Path, PathBuf};

use nonempty::NonEmpty;
use serde::Serialize;

use crate::{
    domain::{Config, FileStatusList, RecordKind, CONFIG_FILE_NAME},
    storage::{
        aggregator::{NoopReporter, Reporter},
        directory::MARKER_FILE,
        Database, DatabaseError, DirectoryPolicy, NotFoundError,
    },
};

/// Folder holding requirement records.
pub const REQUIREMENTS_FOLDER: &str = "requirements";

/// Folder holding definition records.
pub const DEFINITIONS_FOLDER: &str = "definitions";

/// Folder holding reference material, copied verbatim on export.
pub const REFERENCES_FOLDER: &str = "references";

const FOLDERS: [&str; 3] = [REQUIREMENTS_FOLDER, DEFINITIONS_FOLDER, REFERENCES_FOLDER];

/// A requirements project on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Create the folder skeleton under `root`, writing a default
    /// configuration if there is none.
    ///
    /// Existing folders and files are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a folder or file cannot be created.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        let root = root.into();
        create_dir_all(&root)?;

        let config_path = root.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            Config::default()
                .save(&config_path)
                .map_err(DatabaseError::Config)?;
            tracing::info!("Created {}", config_path.display());
        }

        let project = Self::open(root)?;
        project.create_skeleton()?;
        Ok(project)
    }

    /// Open the project rooted at `root`.
    ///
    /// A missing or unreadable configuration file falls back to the default
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, NotFoundError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(NotFoundError::directory(root));
        }
        let config = load_config(&root);
        Ok(Self { root, config })
    }

    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The project configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The folder holding every database.
    #[must_use]
    pub fn main_folder(&self) -> PathBuf {
        self.root.join(self.config.main_folder())
    }

    /// The folder holding reference material.
    #[must_use]
    pub fn references_folder(&self) -> PathBuf {
        self.main_folder().join(REFERENCES_FOLDER)
    }

    /// Expected folders that do not exist.
    #[must_use]
    pub fn missing_folders(&self) -> Vec<PathBuf> {
        FOLDERS
            .iter()
            .map(|folder| self.main_folder().join(folder))
            .filter(|path| !path.is_dir())
            .collect()
    }

    /// Delete the main folder and everything in it, then recreate the empty
    /// skeleton. The configuration file is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be deleted or recreated.
    pub fn reset(&self) -> Result<(), DatabaseError> {
        let main = self.main_folder();
        if main.exists() {
            std::fs::remove_dir_all(&main).map_err(|source| DatabaseError::Io {
                path: main.clone(),
                source,
            })?;
            tracing::warn!("Deleted {}", main.display());
        }
        self.create_skeleton()
    }

    /// The requirements database.
    ///
    /// # Errors
    ///
    /// Returns an error if the requirements folder does not exist.
    pub fn requirements(&self) -> Result<Database, NotFoundError> {
        Database::open(
            self.main_folder().join(REQUIREMENTS_FOLDER),
            RecordKind::Requirement,
            self.config.requirements,
        )
    }

    /// The definitions database.
    ///
    /// # Errors
    ///
    /// Returns an error if the definitions folder does not exist.
    pub fn definitions(&self) -> Result<Database, NotFoundError> {
        Database::open(
            self.main_folder().join(DEFINITIONS_FOLDER),
            RecordKind::Definition,
            self.config.definitions,
        )
    }

    /// Validate both databases.
    ///
    /// # Errors
    ///
    /// Returns an error if a database folder is missing or breaks its
    /// structural rules.
    pub fn validate(&self) -> Result<ProjectReport, DatabaseError> {
        self.validate_with(&NoopReporter)
    }

    /// Like [`Project::validate`], reporting progress to `reporter`.
    ///
    /// # Errors
    ///
    /// Returns an error if a database folder is missing or breaks its
    /// structural rules.
    pub fn validate_with(&self, reporter: &dyn Reporter) -> Result<ProjectReport, DatabaseError> {
        Ok(ProjectReport {
            requirements: self.requirements()?.validate_with(reporter, None)?,
            definitions: self.definitions()?.validate_with(reporter, None)?,
        })
    }

    /// Export both databases as markdown documents, and the references
    /// verbatim, under `target`.
    ///
    /// Returns the paths of the documents written.
    ///
    /// # Errors
    ///
    /// Returns an error if either database is invalid or a file cannot be
    /// written. Nothing is written unless both databases are valid.
    pub fn export(&self, target: &Path) -> Result<Vec<PathBuf>, DatabaseError> {
        let report = self.validate()?;
        let invalid: Vec<_> = report
            .requirements
            .invalid_files()
            .chain(report.definitions.invalid_files())
            .map(|status| status.path().to_path_buf())
            .collect();
        if let Some(invalid) = NonEmpty::from_vec(invalid) {
            return Err(DatabaseError::InvalidContent { invalid });
        }

        let requirements = self.requirements()?;
        let definitions = self.definitions()?;

        let mut written = requirements.export_as_documents(&target.join(REQUIREMENTS_FOLDER))?;
        written.extend(definitions.export_as_documents(&target.join(DEFINITIONS_FOLDER))?);

        let references = self.references_folder();
        if references.is_dir() {
            DirectoryPolicy::new(references, true, true)?
                .copy_all_into(&target.join(REFERENCES_FOLDER))?;
        }

        Ok(written)
    }

    fn create_skeleton(&self) -> Result<(), DatabaseError> {
        for folder in FOLDERS {
            let path = self.main_folder().join(folder);
            create_dir_all(&path)?;

            let marker = path.join(MARKER_FILE);
            if !marker.exists() {
                std::fs::write(&marker, "").map_err(|source| DatabaseError::Io {
                    path: marker.clone(),
                    source,
                })?;
            }
        }
        tracing::info!("Initialised project layout in {}", self.main_folder().display());
        Ok(())
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE_NAME);
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

fn create_dir_all(path: &Path) -> Result<(), DatabaseError> {
    std::fs::create_dir_all(path).map_err(|source| DatabaseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Validation results of both databases of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectReport {
    /// Report of the requirements database.
    pub requirements: FileStatusList,
    /// Report of the definitions database.
    pub definitions: FileStatusList,
}

impl ProjectReport {
    /// Whether every file of both databases passed every check.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.requirements.is_all_files_valid() && self.definitions.is_all_files_valid()
    }

    /// Total number of files checked.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.requirements.len() + self.definitions.len()
    }

    /// Number of files with at least one failing check.
    #[must_use]
    pub fn invalid_count(&self) -> usize {
        self.requirements.invalid_files().count() + self.definitions.invalid_files().count()
    }
}
