//! Structural rules of a database folder.
//!
//! A [`DirectoryPolicy`] decides whether a folder may hold subfolders and
//! files that are not records. It knows nothing about record content; see
//! [`Database`](crate::storage::Database) for that.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use nonempty::NonEmpty;
use walkdir::WalkDir;

use crate::{
    domain::{
        identity::{has_extension, ACCEPTED_EXTENSIONS},
        CheckStatus, CheckStatusList, FolderRules,
    },
    storage::DatabaseError,
};

/// Marker file kept in every database folder so that version control tracks
/// empty folders. It is never listed.
pub const MARKER_FILE: &str = ".gitignore";

/// Name of the subfolder check.
pub const SUBFOLDER_CHECK: &str = "Subfolder existence";

/// Name of the additional file check.
pub const ADDITIONAL_FILE_CHECK: &str = "Additional file existence";

/// The structural rules of one database folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPolicy {
    root: PathBuf,
    allow_subfolders: bool,
    allow_additional_files: bool,
}

impl DirectoryPolicy {
    /// Apply a policy to an existing folder.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not an existing directory.
    pub fn new(
        root: impl Into<PathBuf>,
        allow_subfolders: bool,
        allow_additional_files: bool,
    ) -> Result<Self, NotFoundError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(NotFoundError::directory(root));
        }
        Ok(Self {
            root,
            allow_subfolders,
            allow_additional_files,
        })
    }

    /// Apply configured folder rules to an existing folder.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not an existing directory.
    pub fn with_rules(root: impl Into<PathBuf>, rules: FolderRules) -> Result<Self, NotFoundError> {
        Self::new(root, rules.allow_subfolders, rules.allow_additional_files)
    }

    /// The folder the policy applies to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether subfolders are allowed.
    #[must_use]
    pub const fn allows_subfolders(&self) -> bool {
        self.allow_subfolders
    }

    /// Whether files that are not records are allowed.
    #[must_use]
    pub const fn allows_additional_files(&self) -> bool {
        self.allow_additional_files
    }

    /// The direct subfolders of the root, sorted by name.
    #[must_use]
    pub fn list_subdirectories(&self) -> Vec<PathBuf> {
        walk(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(readable)
            .filter(|entry| entry.file_type().is_dir())
            .map(walkdir::DirEntry::into_path)
            .collect()
    }

    /// Every file below the root, at any depth, except those named in
    /// `ignore`. Sorted by path.
    #[must_use]
    pub fn list_all_files(&self, ignore: &[&str]) -> Vec<PathBuf> {
        walk(&self.root)
            .into_iter()
            .filter_map(readable)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_none_or(|name| !ignore.contains(&name))
            })
            .map(walkdir::DirEntry::into_path)
            .collect()
    }

    /// Files whose extension is one of `extensions` (case-insensitive).
    #[must_use]
    pub fn list_files_with_extension(&self, extensions: &[&str]) -> Vec<PathBuf> {
        self.list_all_files(&[MARKER_FILE])
            .into_iter()
            .filter(|path| has_extension(path, extensions))
            .collect()
    }

    /// Files whose extension is not one of `extensions` (case-insensitive).
    #[must_use]
    pub fn list_files_without_extension(&self, extensions: &[&str]) -> Vec<PathBuf> {
        self.list_all_files(&[MARKER_FILE])
            .into_iter()
            .filter(|path| !has_extension(path, extensions))
            .collect()
    }

    /// True if there are no subfolders, or subfolders are allowed.
    #[must_use]
    pub fn is_structure_valid(&self) -> bool {
        self.allow_subfolders || self.list_subdirectories().is_empty()
    }

    /// True if every file is a record file, or additional files are allowed.
    #[must_use]
    pub fn is_file_set_valid(&self, extensions: &[&str]) -> bool {
        self.allow_additional_files || self.list_files_without_extension(extensions).is_empty()
    }

    /// Run both structural checks against the folder.
    ///
    /// The result always holds exactly two checks: subfolder existence, then
    /// additional file existence. A failing check lists the offending paths.
    #[must_use]
    pub fn validate(&self) -> CheckStatusList {
        let subfolders = if self.allow_subfolders {
            Ok(())
        } else {
            offending(
                "subfolders are not allowed",
                &self.root,
                self.list_subdirectories(),
            )
        };

        let additional_files = if self.allow_additional_files {
            Ok(())
        } else {
            offending(
                "additional files are not allowed",
                &self.root,
                self.list_files_without_extension(ACCEPTED_EXTENSIONS),
            )
        };

        [
            CheckStatus::from_outcome(SUBFOLDER_CHECK, subfolders),
            CheckStatus::from_outcome(ADDITIONAL_FILE_CHECK, additional_files),
        ]
        .into_iter()
        .collect()
    }

    /// Fail with [`DatabaseError::Structure`] unless both structural checks
    /// pass.
    ///
    /// # Errors
    ///
    /// Returns the failing checks.
    pub fn ensure_valid(&self) -> Result<(), DatabaseError> {
        let failures = self.validate().extract_errors();
        NonEmpty::from_vec(failures.into_iter().collect()).map_or(Ok(()), |failures| {
            Err(DatabaseError::Structure {
                root: self.root.clone(),
                failures,
            })
        })
    }

    /// Recreate the folder tree under `destination` and copy every
    /// additional file into it, byte for byte.
    ///
    /// Record files are not copied. Nothing is rolled back if a copy fails
    /// midway.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder is not structurally valid, or if a
    /// folder cannot be created or a file cannot be copied.
    pub fn copy_into(&self, destination: &Path) -> Result<(), DatabaseError> {
        self.ensure_valid()?;
        self.copy_files(
            destination,
            self.list_files_without_extension(ACCEPTED_EXTENSIONS),
        )
    }

    /// Recreate the folder tree under `destination` and copy every file
    /// into it, records included. Only the marker file is left behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder is not structurally valid, or if a
    /// folder cannot be created or a file cannot be copied.
    pub fn copy_all_into(&self, destination: &Path) -> Result<(), DatabaseError> {
        self.ensure_valid()?;
        self.copy_files(destination, self.list_all_files(&[MARKER_FILE]))
    }

    fn copy_files(&self, destination: &Path, files: Vec<PathBuf>) -> Result<(), DatabaseError> {
        create_dir_all(destination)?;

        let subfolders = walk(&self.root)
            .into_iter()
            .filter_map(readable)
            .filter(|entry| entry.file_type().is_dir());
        for entry in subfolders {
            create_dir_all(&destination.join(self.relative(entry.path())))?;
        }

        for source in files {
            let target = destination.join(self.relative(&source));
            if let Some(parent) = target.parent() {
                create_dir_all(parent)?;
            }
            std::fs::copy(&source, &target).map_err(|source_error| DatabaseError::Io {
                path: source.clone(),
                source: source_error,
            })?;
            tracing::info!("Copied {} to {}", source.display(), target.display());
        }

        Ok(())
    }

    /// `path` relative to the root.
    pub(crate) fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

fn walk(root: &Path) -> WalkDir {
    WalkDir::new(root).min_depth(1).sort_by_file_name()
}

fn readable(entry: walkdir::Result<walkdir::DirEntry>) -> Option<walkdir::DirEntry> {
    entry
        .inspect_err(|e| tracing::debug!("Skipping unreadable entry: {e}"))
        .ok()
}

fn create_dir_all(path: &Path) -> Result<(), DatabaseError> {
    std::fs::create_dir_all(path).map_err(|source| DatabaseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn offending(what: &str, root: &Path, paths: Vec<PathBuf>) -> Result<(), String> {
    if paths.is_empty() {
        return Ok(());
    }
    let relative: Vec<_> = paths
        .iter()
        .map(|p| p.strip_prefix(root).unwrap_or(p).to_path_buf())
        .collect();
    Err(format!(
        "{what} in '{}': {}",
        root.display(),
        PathList(&relative)
    ))
}

/// Displays at most five paths, followed by a count of the rest.
pub(crate) struct PathList<'a>(pub &'a [PathBuf]);

impl fmt::Display for PathList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_DISPLAY: usize = 5;

        let total = self.0.len();

        let displayed_paths: Vec<String> = self
            .0
            .iter()
            .take(MAX_DISPLAY)
            .map(|p| p.display().to_string())
            .collect();

        let msg = displayed_paths.join(", ");

        if total <= MAX_DISPLAY {
            write!(f, "{msg}")
        } else {
            write!(f, "{msg}... (and {} more)", total - MAX_DISPLAY)
        }
    }
}

/// An expected file or folder does not exist.
#[derive(Debug, thiserror::Error)]
#[error("the {kind} '{}' does not exist", path.display())]
pub struct NotFoundError {
    kind: &'static str,
    path: PathBuf,
}

impl NotFoundError {
    /// A missing file.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: "file",
            path: path.into(),
        }
    }

    /// A missing folder.
    #[must_use]
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: "folder",
            path: path.into(),
        }
    }

    /// The missing path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use test_case::test_case;

    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, "content").unwrap();
    }

    #[test]
    fn new_requires_existing_directory() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        let error = DirectoryPolicy::new(&missing, true, true).unwrap_err();
        assert_eq!(error.path(), missing);

        let file = tmp.path().join("file.yml");
        touch(&file);
        assert!(DirectoryPolicy::new(&file, true, true).is_err());
    }

    #[test_case(false; "subfolders forbidden")]
    #[test_case(true; "subfolders allowed")]
    fn empty_directory_is_structurally_valid(allow_subfolders: bool) {
        let tmp = TempDir::new().unwrap();
        let policy = DirectoryPolicy::new(tmp.path(), allow_subfolders, false).unwrap();
        assert!(policy.is_structure_valid());
        assert!(policy.is_file_set_valid(ACCEPTED_EXTENSIONS));
        assert!(policy.validate().is_valid());
    }

    #[test]
    fn subdirectories_are_listed_non_recursively() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("b/nested")).unwrap();
        std::fs::create_dir_all(tmp.path().join("a")).unwrap();
        touch(&tmp.path().join("file.yml"));

        let policy = DirectoryPolicy::new(tmp.path(), true, true).unwrap();
        assert_eq!(
            policy.list_subdirectories(),
            [tmp.path().join("a"), tmp.path().join("b")]
        );
    }

    #[test]
    fn files_are_listed_recursively_and_partitioned() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(&root.join("A.yml"));
        touch(&root.join("sub/B.YAML"));
        touch(&root.join("sub/image.png"));
        touch(&root.join("sub").join(MARKER_FILE));
        touch(&root.join(MARKER_FILE));

        let policy = DirectoryPolicy::new(root, true, true).unwrap();

        assert_eq!(policy.list_all_files(&[]).len(), 5);
        assert_eq!(
            policy.list_files_with_extension(ACCEPTED_EXTENSIONS),
            [root.join("A.yml"), root.join("sub/B.YAML")]
        );
        assert_eq!(
            policy.list_files_without_extension(ACCEPTED_EXTENSIONS),
            [root.join("sub/image.png")]
        );
    }

    #[test]
    fn forbidden_subfolder_is_named_in_the_failing_check() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("forbidden")).unwrap();

        let policy = DirectoryPolicy::new(tmp.path(), false, false).unwrap();
        let checks = policy.validate();

        assert_eq!(checks.len(), 2);
        let errors = checks.extract_errors();
        assert_eq!(errors.len(), 1);
        let failure = errors.iter().next().unwrap();
        assert_eq!(failure.name(), SUBFOLDER_CHECK);
        assert!(failure.message().contains("forbidden"));
    }

    #[test]
    fn additional_files_fail_only_when_forbidden() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("notes.txt"));

        let strict = DirectoryPolicy::new(tmp.path(), false, false).unwrap();
        let checks = strict.validate();
        let errors = checks.extract_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.iter().next().unwrap().name(), ADDITIONAL_FILE_CHECK);

        let lenient = DirectoryPolicy::new(tmp.path(), false, true).unwrap();
        assert!(lenient.validate().is_valid());
    }

    #[test]
    fn copy_into_copies_additional_files_and_tree() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("db");
        touch(&root.join("A.yml"));
        touch(&root.join("sub/image.png"));
        std::fs::create_dir_all(root.join("empty/deeper")).unwrap();
        let dest = tmp.path().join("out");

        let policy = DirectoryPolicy::new(&root, true, true).unwrap();
        policy.copy_into(&dest).unwrap();

        assert!(dest.join("empty/deeper").is_dir());
        assert_eq!(
            std::fs::read_to_string(dest.join("sub/image.png")).unwrap(),
            "content"
        );
        assert!(!dest.join("A.yml").exists());
    }

    #[test]
    fn copy_all_into_keeps_yaml_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("references");
        touch(&root.join("paper.pdf"));
        touch(&root.join("standards/standard.yml"));
        touch(&root.join(MARKER_FILE));
        let dest = tmp.path().join("out");

        let policy = DirectoryPolicy::new(&root, true, true).unwrap();
        policy.copy_all_into(&dest).unwrap();

        assert!(dest.join("paper.pdf").is_file());
        assert_eq!(
            std::fs::read_to_string(dest.join("standards/standard.yml")).unwrap(),
            "content"
        );
        assert!(!dest.join(MARKER_FILE).exists());
    }

    #[test]
    fn unreadable_entries_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let entry = WalkDir::new(tmp.path().join("gone"))
            .into_iter()
            .next()
            .unwrap();

        assert!(entry.is_err());
        assert!(readable(entry).is_none());
    }

    #[test]
    fn copy_into_refuses_non_compliant_directory() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("db");
        touch(&root.join("sub/A.yml"));
        let dest = tmp.path().join("out");

        let policy = DirectoryPolicy::new(&root, false, true).unwrap();
        let error = policy.copy_into(&dest).unwrap_err();

        assert!(matches!(error, DatabaseError::Structure { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn path_list_truncates_after_five() {
        let paths: Vec<_> = (0..7).map(|i| PathBuf::from(format!("p{i}"))).collect();
        assert_eq!(
            PathList(&paths).to_string(),
            "p0, p1, p2, p3, p4... (and 2 more)"
        );
        assert_eq!(PathList(&paths[..2]).to_string(), "p0, p1");
    }
}
