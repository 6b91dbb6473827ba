use std::path::Path;

use serde::{Deserialize, Serialize};

/// Name of the configuration file at the root of a project.
pub const CONFIG_FILE_NAME: &str = "reqdb.toml";

/// Directory rules applied to one database folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRules {
    /// Whether the folder may contain subfolders.
    #[serde(default)]
    pub allow_subfolders: bool,

    /// Whether the folder may contain files that are not records (images,
    /// references, ...). These are copied verbatim on export.
    #[serde(default)]
    pub allow_additional_files: bool,
}

impl FolderRules {
    const fn permissive() -> Self {
        Self {
            allow_subfolders: true,
            allow_additional_files: true,
        }
    }

    const fn strict() -> Self {
        Self {
            allow_subfolders: false,
            allow_additional_files: false,
        }
    }
}

/// Configuration of a requirements project.
///
/// This struct holds the name of the folder the databases live in and the
/// directory rules of each database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Folder, relative to the project root, holding every database.
    main_folder: String,

    /// Rules of the requirements database.
    pub requirements: FolderRules,

    /// Rules of the definitions database.
    pub definitions: FolderRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            main_folder: default_main_folder(),
            requirements: FolderRules::permissive(),
            definitions: FolderRules::strict(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The folder holding every database, relative to the project root.
    #[must_use]
    pub fn main_folder(&self) -> &str {
        &self.main_folder
    }

    /// Sets the folder holding every database.
    pub fn set_main_folder(&mut self, folder: impl Into<String>) {
        self.main_folder = folder.into();
    }
}

fn default_main_folder() -> String {
    "SRS".to_string()
}

const fn default_requirements() -> FolderRules {
    FolderRules::permissive()
}

const fn default_definitions() -> FolderRules {
    FolderRules::strict()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_main_folder")]
        main_folder: String,

        #[serde(default = "default_requirements")]
        requirements: FolderRules,

        #[serde(default = "default_definitions")]
        definitions: FolderRules,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                main_folder,
                requirements,
                definitions,
            } => Self {
                main_folder,
                requirements,
                definitions,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            main_folder: config.main_folder,
            requirements: config.requirements,
            definitions: config.definitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nmain_folder = \"docs\"\n\n[requirements]\nallow_subfolders = false\nallow_additional_files = true\n\n[definitions]\nallow_subfolders = true\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.main_folder(), "docs");
        assert!(!config.requirements.allow_subfolders);
        assert!(config.requirements.allow_additional_files);
        assert!(config.definitions.allow_subfolders);
        assert!(!config.definitions.allow_additional_files);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nmain_folder = 3\n").unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        // Tests that deserialising an empty file returns the default configuration.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.set_main_folder("specs");
        config.definitions.allow_additional_files = true;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
