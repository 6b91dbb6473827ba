//! A folder of records of one kind.

use std::{
    fmt, io,
    path::{Path, PathBuf},
    sync::atomic::AtomicBool,
};

use nonempty::NonEmpty;

use crate::{
    domain::{
        identity::ACCEPTED_EXTENSIONS, CheckStatus, FileStatusList, FolderRules, LoadError,
        Record, RecordKind, ValidationError,
    },
    storage::{
        aggregator::{Aggregator, Cancelled, NoopReporter, Reporter},
        codec::CodecError,
        directory::PathList,
        fixture, DirectoryPolicy, NotFoundError,
    },
};

/// Extension of exported documents.
pub const DOCUMENT_EXTENSION: &str = "md";

/// A database of records of one kind, stored in one folder.
///
/// Validation runs in two stages. The structural rules of the
/// [`DirectoryPolicy`] are checked first; content is only checked once the
/// folder is structurally valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    policy: DirectoryPolicy,
    kind: RecordKind,
}

impl Database {
    /// A database of `kind` records governed by `policy`.
    #[must_use]
    pub const fn new(policy: DirectoryPolicy, kind: RecordKind) -> Self {
        Self { policy, kind }
    }

    /// Open the database stored in `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not an existing directory.
    pub fn open(
        root: impl Into<PathBuf>,
        kind: RecordKind,
        rules: FolderRules,
    ) -> Result<Self, NotFoundError> {
        Ok(Self::new(DirectoryPolicy::with_rules(root, rules)?, kind))
    }

    /// The structural rules of the database folder.
    #[must_use]
    pub const fn policy(&self) -> &DirectoryPolicy {
        &self.policy
    }

    /// The kind of record stored in the database.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        self.kind
    }

    /// The database folder.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.policy.root()
    }

    /// Every record file in the database, sorted by path.
    #[must_use]
    pub fn record_files(&self) -> Vec<PathBuf> {
        self.policy.list_files_with_extension(ACCEPTED_EXTENSIONS)
    }

    /// Validate the folder structure, then every record file.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Structure`] if the folder breaks its
    /// structural rules. Invalid record files do not cause an error; they are
    /// reported in the returned list.
    pub fn validate(&self) -> Result<FileStatusList, DatabaseError> {
        self.validate_with(&NoopReporter, None)
    }

    /// Like [`Database::validate`], reporting progress to `reporter` and
    /// stopping early once `cancel` is set.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Structure`] if the folder breaks its
    /// structural rules, or [`DatabaseError::Cancelled`] if the pass was
    /// cancelled.
    pub fn validate_with(
        &self,
        reporter: &dyn Reporter,
        cancel: Option<&AtomicBool>,
    ) -> Result<FileStatusList, DatabaseError> {
        self.policy.ensure_valid()?;

        let mut aggregator = Aggregator::new(self.kind).with_reporter(reporter);
        if let Some(flag) = cancel {
            aggregator = aggregator.with_cancellation(flag);
        }

        let files = self.record_files();
        tracing::debug!(
            "Validating {} {} files in {}",
            files.len(),
            self.kind,
            self.root().display()
        );
        Ok(aggregator.run(&files)?)
    }

    /// Write every record as a markdown document under `target`, mirroring
    /// the folder layout, after copying the additional files.
    ///
    /// Returns the paths of the documents written.
    ///
    /// # Errors
    ///
    /// Nothing is exported unless the whole database is valid. A failure
    /// while writing aborts the export and leaves what was already written.
    pub fn export_as_documents(&self, target: &Path) -> Result<Vec<PathBuf>, DatabaseError> {
        let report = self.validate()?;
        let invalid: Vec<_> = report
            .invalid_files()
            .map(|status| status.path().to_path_buf())
            .collect();
        if let Some(invalid) = NonEmpty::from_vec(invalid) {
            return Err(DatabaseError::InvalidContent { invalid });
        }

        self.policy.copy_into(target)?;

        let mut written = Vec::with_capacity(report.len());
        for path in self.record_files() {
            let record = Record::load(self.kind, &path).map_err(|source| DatabaseError::Load {
                path: path.clone(),
                source,
            })?;

            let directory = path
                .parent()
                .map_or_else(|| target.to_path_buf(), |p| target.join(self.policy.relative(p)));
            std::fs::create_dir_all(&directory).map_err(|source| DatabaseError::Io {
                path: directory.clone(),
                source,
            })?;

            let document = directory
                .join(record.canonical_stem())
                .with_extension(DOCUMENT_EXTENSION);
            std::fs::write(&document, record.to_markdown_document().to_string()).map_err(
                |source| DatabaseError::Io {
                    path: document.clone(),
                    source,
                },
            )?;

            tracing::info!("Exported {} to {}", path.display(), document.display());
            written.push(document);
        }

        Ok(written)
    }

    /// Populate the database with `file_count` generated records spread over
    /// `folder_count` new subfolders.
    ///
    /// Subfolders are only created when the policy allows them. Returns the
    /// paths of the records written.
    ///
    /// # Errors
    ///
    /// Returns an error if a folder or a record file cannot be written.
    pub fn generate_fixture_set(
        &self,
        file_count: usize,
        folder_count: usize,
    ) -> Result<Vec<PathBuf>, DatabaseError> {
        fixture::generate(&self.policy, self.kind, file_count, folder_count)
    }
}

/// Errors raised by database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The database folder breaks its structural rules.
    #[error("the folder '{}' is not compliant: {}", root.display(), Failures(failures))]
    Structure {
        /// The database folder.
        root: PathBuf,
        /// The failing structural checks.
        failures: NonEmpty<CheckStatus>,
    },

    /// Some record files are invalid.
    #[error("invalid record files: {}", PathList(&invalid.iter().cloned().collect::<Vec<_>>()))]
    InvalidContent {
        /// The invalid files.
        invalid: NonEmpty<PathBuf>,
    },

    /// A record could not be read.
    #[error("failed to load '{}': {source}", path.display())]
    Load {
        /// The record file.
        path: PathBuf,
        /// The underlying failure.
        source: LoadError,
    },

    /// A record could not be written.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A generated record was rejected.
    #[error("generated record is invalid: {0}")]
    Generated(#[from] ValidationError),

    /// A folder could not be created or a file could not be copied.
    #[error("I/O failure on '{}': {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// An expected folder does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The project configuration could not be written.
    #[error("{0}")]
    Config(String),

    /// The validation pass was cancelled.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

struct Failures<'a>(&'a NonEmpty<CheckStatus>);

impl fmt::Display for Failures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<_> = self.0.iter().map(CheckStatus::message).collect();
        f.write_str(&messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        domain::Requirement,
        storage::aggregator::{NAME_CHECK, RECORD_CHECK},
    };

    fn requirements(root: &Path, allow_subfolders: bool) -> Database {
        let policy = DirectoryPolicy::new(root, allow_subfolders, true).unwrap();
        Database::new(policy, RecordKind::Requirement)
    }

    #[test]
    fn conformant_file_passes_every_check() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("Valid_Title.yml"), "title: Valid Title\n").unwrap();

        let report = requirements(tmp.path(), false).validate().unwrap();

        assert_eq!(report.len(), 1);
        let status = report.iter().next().unwrap();
        let names: Vec<_> = status.checks().iter().map(CheckStatus::name).collect();
        assert_eq!(names, [RECORD_CHECK, NAME_CHECK]);
        assert!(report.is_all_files_valid());
    }

    #[test]
    fn misnamed_file_fails_the_name_check() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("wrong_name.yml"), "title: Valid Title\n").unwrap();

        let report = requirements(tmp.path(), false).validate().unwrap();

        assert!(!report.is_all_files_valid());
        let checks: Vec<_> = report.iter().next().unwrap().checks().iter().collect();
        assert!(checks[0].is_valid());
        assert!(!checks[1].is_valid());
        assert!(checks[1].message().contains("Valid_Title"));
    }

    #[test]
    fn forbidden_subfolder_short_circuits_content_checks() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("nested")).unwrap();
        std::fs::write(tmp.path().join("broken.yml"), "title: [unclosed\n").unwrap();

        let error = requirements(tmp.path(), false).validate().unwrap_err();

        let DatabaseError::Structure { failures, .. } = &error else {
            panic!("expected a structural error, got {error:?}");
        };
        assert_eq!(failures.len(), 1);
        assert!(failures.head.message().contains("nested"));
    }

    #[test]
    fn every_file_failing_still_yields_a_full_report() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.yml", "b.yml", "c.yaml"] {
            std::fs::write(tmp.path().join(name), "title: lowercase title\n").unwrap();
        }

        let report = requirements(tmp.path(), false).validate().unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report.invalid_files().count(), 3);
    }

    #[test]
    fn cancelled_validation_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("Valid_Title.yml"), "title: Valid Title\n").unwrap();
        let flag = AtomicBool::new(true);

        let error = requirements(tmp.path(), false)
            .validate_with(&NoopReporter, Some(&flag))
            .unwrap_err();

        assert!(matches!(error, DatabaseError::Cancelled(_)));
    }

    #[test]
    fn export_mirrors_layout_and_copies_additional_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("db");
        let nested = root.join("chapter");
        std::fs::create_dir_all(&nested).unwrap();
        Record::from(Requirement::new("Top Level Requirement").unwrap())
            .save(&root)
            .unwrap();
        Record::from(Requirement::new("Nested Requirement").unwrap())
            .save(&nested)
            .unwrap();
        std::fs::write(nested.join("diagram.svg"), "<svg/>").unwrap();
        let target = tmp.path().join("docs");

        let written = requirements(&root, true)
            .export_as_documents(&target)
            .unwrap();

        assert_eq!(
            written,
            [
                target.join("Top_Level_Requirement.md"),
                target.join("chapter/Nested_Requirement.md"),
            ]
        );
        let document = std::fs::read_to_string(target.join("Top_Level_Requirement.md")).unwrap();
        assert!(document.starts_with("# Top Level Requirement"));
        assert!(document.contains("## RATIONALE"));
        assert_eq!(
            std::fs::read_to_string(target.join("chapter/diagram.svg")).unwrap(),
            "<svg/>"
        );
    }

    #[test]
    fn export_refuses_invalid_content() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("wrong_name.yml"), "title: Valid Title\n").unwrap();
        let target = tmp.path().join("docs");

        let error = requirements(tmp.path(), false)
            .export_as_documents(&target)
            .unwrap_err();

        assert!(matches!(error, DatabaseError::InvalidContent { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn export_refuses_records_that_would_share_a_document() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("requirements");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("Valid_Title.yml"), "title: Valid Title\n").unwrap();
        std::fs::write(
            root.join("Valid_Title.yaml"),
            "title: Valid Title\ndescription: Other content\n",
        )
        .unwrap();
        let target = tmp.path().join("docs");
        let database = requirements(&root, false);

        assert!(!database.validate().unwrap().is_all_files_valid());
        let error = database.export_as_documents(&target).unwrap_err();

        let DatabaseError::InvalidContent { invalid } = error else {
            panic!("expected invalid content, got {error:?}");
        };
        assert_eq!(invalid.len(), 2);
        assert!(!target.exists());
    }

    #[test]
    fn generated_fixtures_pass_validation() {
        let tmp = TempDir::new().unwrap();
        let policy = DirectoryPolicy::new(tmp.path(), true, false).unwrap();
        let database = Database::new(policy, RecordKind::Definition);

        let written = database.generate_fixture_set(25, 4).unwrap();

        assert_eq!(written.len(), 25);
        assert!(database.policy().list_subdirectories().len() <= 4);
        let report = database.validate().unwrap();
        assert_eq!(report.len(), 25);
        assert!(report.is_all_files_valid());
        for path in &written {
            let record = Record::load(RecordKind::Definition, path).unwrap();
            assert_eq!(record.kind(), RecordKind::Definition);
        }
    }
}
