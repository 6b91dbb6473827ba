//! Structured pass/fail reports.
//!
//! A [`CheckStatus`] is the outcome of one named check. A passing check
//! carries no message and a failing check always carries one; the type makes
//! any other combination unrepresentable. Checks are grouped per file in a
//! [`FileStatus`] and per directory in a [`FileStatusList`].

use std::{
    fmt,
    path::{Path, PathBuf},
};

use non_empty_string::NonEmptyString;
use serde::{ser::SerializeStruct, Serialize, Serializer};

const MAX_COLUMN_WIDTH: usize = 50;

/// The outcome of one named check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckStatus {
    name: NonEmptyString,
    failure: Option<NonEmptyString>,
}

/// A [`CheckStatus`] would violate its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckStatusError {
    /// The check name is empty.
    #[error("empty string for check name is not permitted")]
    EmptyName,
    /// A passing check was given a message.
    #[error("a message is not permitted for a valid check")]
    MessageOnPass,
    /// A failing check was given no message.
    #[error("empty rationale for a failed check is not permitted")]
    MissingMessage,
}

impl CheckStatus {
    /// Construct a check status, enforcing that `valid` implies an empty
    /// message and `!valid` a non-empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the message contradicts
    /// `valid`.
    pub fn new(
        name: impl Into<String>,
        valid: bool,
        message: impl Into<String>,
    ) -> Result<Self, CheckStatusError> {
        let name = NonEmptyString::new(name.into()).map_err(|_| CheckStatusError::EmptyName)?;
        let message = message.into();

        match (valid, message.is_empty()) {
            (true, true) => Ok(Self::pass(name)),
            (true, false) => Err(CheckStatusError::MessageOnPass),
            (false, true) => Err(CheckStatusError::MissingMessage),
            (false, false) => NonEmptyString::new(message)
                .map(|message| Self::fail(name, message))
                .map_err(|_| CheckStatusError::MissingMessage),
        }
    }

    /// A passing check.
    #[must_use]
    pub const fn pass(name: NonEmptyString) -> Self {
        Self {
            name,
            failure: None,
        }
    }

    /// A failing check with its rationale.
    #[must_use]
    pub const fn fail(name: NonEmptyString, message: NonEmptyString) -> Self {
        Self {
            name,
            failure: Some(message),
        }
    }

    /// Pass if `outcome` is `Ok`, otherwise fail with the error's message.
    pub(crate) fn from_outcome<E: fmt::Display>(name: &str, outcome: Result<(), E>) -> Self {
        let name = non_empty(name.to_string(), "unnamed check");
        match outcome {
            Ok(()) => Self::pass(name),
            Err(e) => Self::fail(name, non_empty(e.to_string(), "check failed")),
        }
    }

    /// The name of the check.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Whether the check passed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.failure.is_none()
    }

    /// The failure rationale, or `""` for a passing check.
    #[must_use]
    pub fn message(&self) -> &str {
        self.failure.as_ref().map_or("", NonEmptyString::as_str)
    }
}

fn non_empty(value: String, fallback: &str) -> NonEmptyString {
    NonEmptyString::new(value).unwrap_or_else(|_| {
        let mut text = NonEmptyString::from('<');
        text.push_str(fallback);
        text.push('>');
        text
    })
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Check   : {}", self.name())?;
        writeln!(f, "Valid   : {}", self.is_valid())?;
        if !self.is_valid() {
            writeln!(f, "Messages: {}", self.message())?;
        }
        Ok(())
    }
}

impl Serialize for CheckStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CheckStatus", 3)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("message", self.message())?;
        state.end()
    }
}

/// An ordered list of check outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CheckStatusList(Vec<CheckStatus>);

impl CheckStatusList {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a check.
    pub fn push(&mut self, check: CheckStatus) {
        self.0.push(check);
    }

    /// Whether every check passed. An empty list is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(CheckStatus::is_valid)
    }

    /// The failing checks, in order.
    #[must_use]
    pub fn extract_errors(&self) -> Self {
        self.0.iter().filter(|c| !c.is_valid()).cloned().collect()
    }

    /// The messages of the failing checks, in order.
    #[must_use]
    pub fn error_messages(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|c| !c.is_valid())
            .map(CheckStatus::message)
            .collect()
    }

    /// Iterate over the checks.
    pub fn iter(&self) -> std::slice::Iter<'_, CheckStatus> {
        self.0.iter()
    }

    /// Number of checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list holds no checks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the list as a three-column text table.
    #[must_use]
    pub fn to_table(&self) -> String {
        let rows: Vec<[Vec<String>; 3]> = self
            .0
            .iter()
            .map(|c| {
                [
                    wrap(c.name(), MAX_COLUMN_WIDTH),
                    vec![c.is_valid().to_string()],
                    wrap(c.message(), MAX_COLUMN_WIDTH),
                ]
            })
            .collect();

        let headers = ["Check", "Is Valid", "Rationale"];
        let mut widths = headers.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                let longest = cell.iter().map(|l| l.chars().count()).max().unwrap_or(0);
                *width = (*width).max(longest);
            }
        }

        let separator = format!(
            "+{}+",
            widths
                .iter()
                .map(|w| "-".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("+")
        );

        let mut out = String::new();
        out.push_str(&separator);
        out.push('\n');
        push_line(&mut out, &headers.map(String::from), &widths);
        out.push_str(&separator);
        out.push('\n');
        for row in &rows {
            let height = row.iter().map(Vec::len).max().unwrap_or(1);
            for line in 0..height {
                let cells =
                    [0, 1, 2].map(|col| row[col].get(line).cloned().unwrap_or_default());
                push_line(&mut out, &cells, &widths);
            }
        }
        out.push_str(&separator);
        out
    }
}

fn push_line(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width - cell.chars().count();
        out.push_str("| ");
        out.push_str(cell);
        out.push_str(&" ".repeat(pad + 1));
    }
    out.push_str("|\n");
}

/// Greedy word wrap at `width` characters; words longer than `width` are
/// split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..width).collect());
            }
            let word: String = word.into_iter().collect();
            let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

impl fmt::Display for CheckStatusList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_table())
    }
}

impl FromIterator<CheckStatus> for CheckStatusList {
    fn from_iter<I: IntoIterator<Item = CheckStatus>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<CheckStatus> for CheckStatusList {
    fn extend<I: IntoIterator<Item = CheckStatus>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for CheckStatusList {
    type Item = CheckStatus;
    type IntoIter = std::vec::IntoIter<CheckStatus>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CheckStatusList {
    type Item = &'a CheckStatus;
    type IntoIter = std::slice::Iter<'a, CheckStatus>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The checks performed on one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    path: PathBuf,
    checks: CheckStatusList,
}

impl FileStatus {
    /// Group `checks` under `path`.
    #[must_use]
    pub const fn new(path: PathBuf, checks: CheckStatusList) -> Self {
        Self { path, checks }
    }

    /// The checked file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The checks performed on the file.
    #[must_use]
    pub const fn checks(&self) -> &CheckStatusList {
        &self.checks
    }

    /// Add a check result.
    pub fn push(&mut self, check: CheckStatus) {
        self.checks.push(check);
    }

    /// Whether every check on the file passed.
    #[must_use]
    pub fn is_valid_file(&self) -> bool {
        self.checks.is_valid()
    }

    /// The file path relative to `base`, or the full path if it is not
    /// inside `base`.
    #[must_use]
    pub fn relative_to(&self, base: &Path) -> String {
        self.path
            .strip_prefix(base)
            .unwrap_or(&self.path)
            .display()
            .to_string()
    }
}

/// The per-file reports of a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileStatusList(Vec<FileStatus>);

impl FileStatusList {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a file report.
    pub fn push(&mut self, status: FileStatus) {
        self.0.push(status);
    }

    /// Whether every file passed every check. An empty list is valid.
    #[must_use]
    pub fn is_all_files_valid(&self) -> bool {
        self.0.iter().all(FileStatus::is_valid_file)
    }

    /// The files with at least one failing check.
    pub fn invalid_files(&self) -> impl Iterator<Item = &FileStatus> {
        self.0.iter().filter(|s| !s.is_valid_file())
    }

    /// Iterate over the file reports.
    pub fn iter(&self) -> std::slice::Iter<'_, FileStatus> {
        self.0.iter()
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FileStatusList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for status in &self.0 {
            writeln!(
                f,
                "File: {} - {}",
                status.path().display(),
                status.is_valid_file()
            )?;
        }
        Ok(())
    }
}

impl FromIterator<FileStatus> for FileStatusList {
    fn from_iter<I: IntoIterator<Item = FileStatus>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FileStatusList {
    type Item = FileStatus;
    type IntoIter = std::vec::IntoIter<FileStatus>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileStatusList {
    type Item = &'a FileStatus;
    type IntoIter = std::slice::Iter<'a, FileStatus>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn passed(name: &str) -> CheckStatus {
        CheckStatus::new(name, true, "").unwrap()
    }

    fn failed(name: &str, message: &str) -> CheckStatus {
        CheckStatus::new(name, false, message).unwrap()
    }

    #[test]
    fn outcome_with_blank_texts_keeps_the_invariants() {
        let status = CheckStatus::from_outcome("", Err(""));
        assert_eq!(status.name(), "<unnamed check>");
        assert!(!status.is_valid());
        assert_eq!(status.message(), "<check failed>");
    }

    #[test_case("check", true, "unexpected", CheckStatusError::MessageOnPass; "message on pass")]
    #[test_case("check", false, "", CheckStatusError::MissingMessage; "missing message")]
    #[test_case("", true, "", CheckStatusError::EmptyName; "empty name")]
    fn invariants_are_enforced(name: &str, valid: bool, message: &str, expected: CheckStatusError) {
        assert_eq!(CheckStatus::new(name, valid, message), Err(expected));
    }

    #[test]
    fn accessors_reflect_construction() {
        let ok = passed("subfolders");
        assert!(ok.is_valid());
        assert_eq!(ok.message(), "");

        let ko = failed("subfolders", "no subfolder permitted");
        assert!(!ko.is_valid());
        assert_eq!(ko.message(), "no subfolder permitted");
        assert_eq!(ko.name(), "subfolders");
    }

    #[test]
    fn list_validity_is_conjunction() {
        let mut list = CheckStatusList::new();
        assert!(list.is_valid());

        list.push(passed("a"));
        assert!(list.is_valid());

        list.push(failed("b", "broken"));
        list.push(passed("c"));
        assert!(!list.is_valid());

        let errors = list.extract_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(list.error_messages(), ["broken"]);
    }

    #[test]
    fn extend_appends_in_order() {
        let mut list: CheckStatusList = [passed("a")].into_iter().collect();
        list.extend([failed("b", "x"), passed("c")]);
        let names: Vec<_> = list.iter().map(CheckStatus::name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn table_lists_every_check() {
        let list: CheckStatusList = [passed("First check"), failed("Second check", "it failed")]
            .into_iter()
            .collect();
        let table = list.to_table();

        assert!(table.contains("| Check "));
        assert!(table.contains("Rationale"));
        assert!(table.contains("| First check  | true     |"));
        assert!(table.contains("| Second check | false    | it failed |"));
    }

    #[test]
    fn table_wraps_long_messages() {
        let message = "word ".repeat(30);
        let list: CheckStatusList = [failed("check", message.trim())].into_iter().collect();
        let table = list.to_table();
        assert!(table.lines().all(|l| l.chars().count() <= 4 + 8 + 11 + 50 + 8));
        assert!(table.lines().count() > 5);
    }

    #[test]
    fn wrap_splits_long_words() {
        let lines = wrap(&"x".repeat(120), 50);
        assert_eq!(lines.iter().map(String::len).collect::<Vec<_>>(), [50, 50, 20]);
    }

    #[test]
    fn file_list_validity() {
        let good = FileStatus::new(PathBuf::from("a.yml"), [passed("x")].into_iter().collect());
        let bad = FileStatus::new(
            PathBuf::from("b.yml"),
            [passed("x"), failed("y", "bad")].into_iter().collect(),
        );

        let list: FileStatusList = [good.clone()].into_iter().collect();
        assert!(list.is_all_files_valid());

        let list: FileStatusList = [good, bad].into_iter().collect();
        assert!(!list.is_all_files_valid());
        assert_eq!(list.invalid_files().count(), 1);
    }

    #[test]
    fn relative_path_display() {
        let status = FileStatus::new(PathBuf::from("/db/sub/a.yml"), CheckStatusList::new());
        assert_eq!(status.relative_to(Path::new("/db")), "sub/a.yml");
        assert_eq!(status.relative_to(Path::new("/other")), "/db/sub/a.yml");
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(failed("check", "broken")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "check", "valid": false, "message": "broken"})
        );
    }
}
