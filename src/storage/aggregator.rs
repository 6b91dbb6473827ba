//! Content validation of record files.
//!
//! Every record file is decoded and validated on its own, so the per-file
//! work runs on the `rayon` pool. A failure in one file becomes a failing
//! [`CheckStatus`] in that file's [`FileStatus`] and never stops the pass.

use std::{
    collections::BTreeMap,
    ffi::OsString,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::domain::{
    identity::canonical_stem, CheckStatus, CheckStatusList, FileStatus, FileStatusList, Record,
    RecordKind,
};

/// Name of the decode and field validation check.
pub const RECORD_CHECK: &str = "Record file validity";

/// Name of the file naming check.
pub const NAME_CHECK: &str = "File name conformity";

/// Name of the check that no two record files in a folder share a stem.
pub const UNIQUE_NAME_CHECK: &str = "Record name uniqueness";

/// Receives progress notifications from a validation pass.
///
/// Methods may be called from several threads at once.
pub trait Reporter: Sync {
    /// A pass over `total` files is starting.
    fn started(&self, _total: usize) {}

    /// One file has been checked.
    fn file_checked(&self, _status: &FileStatus) {}

    /// The pass is over.
    fn finished(&self) {}
}

/// A [`Reporter`] that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {}

/// The pass was cancelled before every file was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("validation was cancelled")]
pub struct Cancelled;

/// Check a single record file.
///
/// The result always holds the [`RECORD_CHECK`]. When the file decodes into
/// a valid record, the [`NAME_CHECK`] is added as well.
#[must_use]
pub fn check_file(kind: RecordKind, path: &Path) -> FileStatus {
    let mut checks = CheckStatusList::new();

    match Record::load(kind, path) {
        Ok(record) => {
            checks.push(CheckStatus::from_outcome::<String>(RECORD_CHECK, Ok(())));
            checks.push(CheckStatus::from_outcome(NAME_CHECK, check_name(&record, path)));
        }
        Err(e) => {
            tracing::debug!("Invalid {kind} file {}: {e}", path.display());
            checks.push(CheckStatus::from_outcome(RECORD_CHECK, Err(e)));
        }
    }

    FileStatus::new(path.to_path_buf(), checks)
}

fn check_name(record: &Record, path: &Path) -> Result<(), String> {
    if record.is_conformant_name(path) {
        return Ok(());
    }
    let current = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    Err(format!(
        "the file name '{current}' does not match the title '{}', expected '{}'",
        record.title(),
        canonical_stem(record.title())
    ))
}

/// Fail every file whose stem is shared with another record file in the same
/// folder, such as `A.yml` and `A.yaml`. Both would export to the same
/// document.
fn flag_shared_stems(statuses: &mut [FileStatus]) {
    let mut groups: BTreeMap<(PathBuf, OsString), Vec<usize>> = BTreeMap::new();
    for (index, status) in statuses.iter().enumerate() {
        let path = status.path();
        if let (Some(parent), Some(stem)) = (path.parent(), path.file_stem()) {
            groups
                .entry((parent.to_path_buf(), stem.to_os_string()))
                .or_default()
                .push(index);
        }
    }

    for indices in groups.into_values().filter(|indices| indices.len() > 1) {
        let names: Vec<String> = indices
            .iter()
            .map(|&i| file_name(statuses[i].path()))
            .collect();
        for &i in &indices {
            let own = file_name(statuses[i].path());
            let others: Vec<&str> = names
                .iter()
                .map(String::as_str)
                .filter(|name| *name != own)
                .collect();
            tracing::debug!("{own} shares its stem with {}", others.join(", "));
            statuses[i].push(CheckStatus::from_outcome(
                UNIQUE_NAME_CHECK,
                Err(format!(
                    "the file '{own}' shares its name with '{}' in the same folder",
                    others.join("', '")
                )),
            ));
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Validates a set of record files of one kind.
pub struct Aggregator<'a> {
    kind: RecordKind,
    reporter: &'a dyn Reporter,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Aggregator<'a> {
    /// An aggregator with no progress reporting and no cancellation.
    #[must_use]
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            reporter: &NoopReporter,
            cancel: None,
        }
    }

    /// Send progress notifications to `reporter`.
    #[must_use]
    pub fn with_reporter(mut self, reporter: &'a dyn Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Stop the pass once `flag` is set. The flag is checked before each
    /// file.
    #[must_use]
    pub const fn with_cancellation(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Check every file, in the order given.
    ///
    /// Files that share a stem with another record file in the same folder
    /// also get a failing [`UNIQUE_NAME_CHECK`].
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if the cancellation flag was set during the
    /// pass. No partial report is returned.
    pub fn run(&self, files: &[PathBuf]) -> Result<FileStatusList, Cancelled> {
        self.reporter.started(files.len());

        let statuses: Option<Vec<FileStatus>> = files
            .par_iter()
            .map(|path| {
                if self.is_cancelled() {
                    return None;
                }
                let status = check_file(self.kind, path);
                self.reporter.file_checked(&status);
                Some(status)
            })
            .collect();

        self.reporter.finished();

        let mut statuses = statuses.ok_or_else(|| {
            tracing::warn!("Validation of {} files was cancelled", files.len());
            Cancelled
        })?;
        flag_shared_stems(&mut statuses);

        Ok(statuses.into_iter().collect())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
